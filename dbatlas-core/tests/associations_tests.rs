//! Weak-association analyzer integration tests.

mod common;

use common::BooksSource;
use dbatlas_core::associations::{AssociationOptions, WeakAssociationAnalyzer};
use dbatlas_core::crawl::{self, CrawlOptions};
use dbatlas_core::tiers::RetrievalTier;
use dbatlas_core::Catalog;

async fn detailed_catalog() -> Catalog {
    let options = CrawlOptions::new().with_tier(RetrievalTier::detailed());
    crawl::crawl(&BooksSource::new(), &options).await.unwrap()
}

#[tokio::test]
async fn unconstrained_authorid_yields_exactly_one_proposal() {
    let catalog = detailed_catalog().await;
    let analyzer = WeakAssociationAnalyzer::new(&catalog, AssociationOptions::default());
    let proposals = analyzer.analyze().unwrap();

    // BOOKAUTHORS.AUTHORID and BOOKAUTHORS.BOOKID are covered by real
    // foreign keys and must never be re-proposed; REVIEWS.AUTHORID is the
    // only unconstrained match, via the singularized table-name prefix.
    assert_eq!(proposals.len(), 1);
    let proposal = &proposals[0];
    assert_eq!(proposal.foreign_key_column.full_name(), "PUBLIC.REVIEWS.AUTHORID");
    assert_eq!(proposal.primary_key_column.full_name(), "PUBLIC.AUTHORS.ID");
}

#[tokio::test]
async fn proposals_are_deterministic() {
    let catalog = detailed_catalog().await;
    let analyzer = WeakAssociationAnalyzer::new(&catalog, AssociationOptions::default());
    let first = analyzer.analyze().unwrap();
    for _ in 0..4 {
        assert_eq!(analyzer.analyze().unwrap(), first);
    }
}

#[tokio::test]
async fn prefix_convention_can_be_disabled() {
    let catalog = detailed_catalog().await;
    let options = AssociationOptions {
        table_prefix_convention: false,
    };
    let analyzer = WeakAssociationAnalyzer::new(&catalog, options);

    // Without the prefix convention nothing matches: AUTHORID is not an
    // exact key-column name anywhere.
    assert!(analyzer.analyze().unwrap().is_empty());
}

#[tokio::test]
async fn analysis_requires_relationship_detail() {
    let options = CrawlOptions::new().with_tier(RetrievalTier::standard());
    let catalog = crawl::crawl(&BooksSource::new(), &options).await.unwrap();

    let analyzer = WeakAssociationAnalyzer::new(&catalog, AssociationOptions::default());
    // Foreign keys and indexes were never fetched: the analyzer surfaces
    // the not-loaded signal instead of silently proposing against real keys.
    assert!(analyzer.analyze().unwrap_err().is_not_loaded());
}

#[tokio::test]
async fn proposals_are_reported_not_merged() {
    let catalog = detailed_catalog().await;
    let analyzer = WeakAssociationAnalyzer::new(&catalog, AssociationOptions::default());
    let proposals = analyzer.analyze().unwrap();
    assert_eq!(proposals.len(), 1);

    // The model itself is untouched: REVIEWS still has no foreign keys.
    let reviews = catalog.lookup_table("PUBLIC.REVIEWS").unwrap().unwrap();
    assert!(reviews.foreign_keys().unwrap().is_empty());
}
