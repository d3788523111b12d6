//! Grep engine integration tests: secondary-attribute matching, inversion,
//! sibling pruning, and foreign-key neighborhood expansion.

mod common;

use common::BooksSource;
use dbatlas_core::crawl::{self, CrawlOptions};
use dbatlas_core::filter::InclusionRule;
use dbatlas_core::grep::{GrepEngine, GrepOptions};
use dbatlas_core::models::{NamedObject, NamedObjectSort};
use dbatlas_core::tiers::RetrievalTier;
use dbatlas_core::Catalog;

async fn detailed_catalog() -> Catalog {
    let options = CrawlOptions::new().with_tier(RetrievalTier::detailed());
    crawl::crawl(&BooksSource::new(), &options).await.unwrap()
}

fn kept_tables(catalog: &Catalog) -> Vec<String> {
    catalog
        .tables_sorted(NamedObjectSort::Natural)
        .unwrap()
        .iter()
        .map(|t| t.full_name())
        .collect()
}

#[tokio::test]
async fn remarks_match_keeps_the_owning_table() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(GrepOptions::new(
        InclusionRule::including("Reader reviews").unwrap(),
    ));
    let reduced = engine.reduce(&catalog).unwrap();
    assert_eq!(kept_tables(&reduced), vec!["PUBLIC.REVIEWS"]);
}

#[tokio::test]
async fn view_definition_text_is_a_grep_target() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(GrepOptions::new(
        InclusionRule::including(".*FROM AUTHORS.*").unwrap(),
    ));
    let reduced = engine.reduce(&catalog).unwrap();
    assert_eq!(kept_tables(&reduced), vec!["PUBLIC.AUTHORSLIST"]);
}

#[tokio::test]
async fn inverted_match_keeps_the_complement() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(
        GrepOptions::new(InclusionRule::including(r".*\.BOOKID").unwrap()).inverted(),
    );
    let reduced = engine.reduce(&catalog).unwrap();
    assert_eq!(
        kept_tables(&reduced),
        vec![
            "PUBLIC.AUTHORS",
            "PUBLIC.REVIEWS",
            "PUBLIC.AUTHORSLIST",
            "INTERNAL.AUDITLOG",
        ]
    );
}

#[tokio::test]
async fn only_matching_drops_non_matching_siblings() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(
        GrepOptions::new(InclusionRule::including(r".*\.BOOKID").unwrap()).only_matching(),
    );
    let reduced = engine.reduce(&catalog).unwrap();

    let bookauthors = reduced.lookup_table("PUBLIC.BOOKAUTHORS").unwrap().unwrap();
    let names: Vec<&str> = bookauthors
        .columns()
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["BOOKID"]);
}

#[tokio::test]
async fn neighborhood_expansion_follows_foreign_keys_both_ways() {
    let catalog = detailed_catalog().await;
    // "Contributing authors" matches only the AUTHORS table's remarks.
    let rule = InclusionRule::including("Contributing authors").unwrap();

    let depth0 = GrepEngine::new(GrepOptions::new(rule.clone()).with_relationship_depth(0));
    assert_eq!(
        kept_tables(&depth0.reduce(&catalog).unwrap()),
        vec!["PUBLIC.AUTHORS"]
    );

    let depth1 = GrepEngine::new(GrepOptions::new(rule.clone()).with_relationship_depth(1));
    assert_eq!(
        kept_tables(&depth1.reduce(&catalog).unwrap()),
        vec!["PUBLIC.AUTHORS", "PUBLIC.BOOKAUTHORS"]
    );

    let depth2 = GrepEngine::new(GrepOptions::new(rule.clone()).with_relationship_depth(2));
    assert_eq!(
        kept_tables(&depth2.reduce(&catalog).unwrap()),
        vec!["PUBLIC.AUTHORS", "PUBLIC.BOOKS", "PUBLIC.BOOKAUTHORS"]
    );

    // Unlimited reachability equals the transitive closure.
    let unlimited = GrepEngine::new(GrepOptions::new(rule).with_relationship_depth(-1));
    assert_eq!(
        kept_tables(&unlimited.reduce(&catalog).unwrap()),
        vec!["PUBLIC.AUTHORS", "PUBLIC.BOOKS", "PUBLIC.BOOKAUTHORS"]
    );
}

#[tokio::test]
async fn dropped_referenced_tables_become_detached() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(GrepOptions::new(
        InclusionRule::including("Contributing authors").unwrap(),
    ));
    let reduced = engine.reduce(&catalog).unwrap();
    assert_eq!(kept_tables(&reduced), vec!["PUBLIC.AUTHORS"]);

    // AUTHORS exports a key to BOOKAUTHORS, which the grep dropped; the
    // reference still resolves, to a detached stub.
    let authors = reduced.lookup_table("PUBLIC.AUTHORS").unwrap().unwrap();
    let fk = &authors.exported_foreign_keys().unwrap()[0];
    assert!(reduced.lookup_table("PUBLIC.BOOKAUTHORS").unwrap().is_none());
    let stub = reduced.referencing_table(fk).unwrap().unwrap();
    assert!(stub.is_detached());
    assert_eq!(stub.full_name(), "PUBLIC.BOOKAUTHORS");
}

#[tokio::test]
async fn routine_parameter_names_are_grep_targets() {
    let catalog = detailed_catalog().await;
    let engine = GrepEngine::new(GrepOptions::new(InclusionRule::including("TITLE").unwrap()));
    let reduced = engine.reduce(&catalog).unwrap();

    let routines: Vec<&str> = reduced
        .routines()
        .unwrap()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(routines, vec!["NEW_BOOK"]);

    // No table has a secondary attribute that is exactly "TITLE".
    assert!(kept_tables(&reduced).is_empty());
}
