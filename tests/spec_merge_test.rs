//! Specification aggregation and merge determinism.

use partscrape::extract::specs::{SpecMap, collect_specs};
use scraper::Html;

#[test]
fn table_then_definition_list_merge_is_deterministic() {
    // Table yields {A:1, B:2}; definition list yields {B:3, C:4}.
    // The definition list wins on B, but B keeps its original position.
    let doc = Html::parse_document(
        r#"
        <table>
          <caption>Specifications</caption>
          <tr><th>A</th><td>1</td></tr>
          <tr><th>B</th><td>2</td></tr>
        </table>
        <dl>
          <dt>B</dt><dd>3</dd>
          <dt>C</dt><dd>4</dd>
        </dl>
        "#,
    );

    let specs = collect_specs(&doc);
    assert_eq!(specs.render(), "A: 1 | B: 3 | C: 4");
}

#[test]
fn only_the_first_spec_table_contributes() {
    let doc = Html::parse_document(
        r#"
        <table><caption>Specs</caption><tr><td>Bore</td><td>52mm</td></tr></table>
        <table><caption>More specs</caption><tr><td>Bore</td><td>99mm</td></tr></table>
        "#,
    );

    let specs = collect_specs(&doc);
    assert_eq!(specs.render(), "Bore: 52mm");
}

#[test]
fn short_rows_and_empty_keys_are_skipped() {
    let doc = Html::parse_document(
        r#"
        <table>
          <caption>Specifications</caption>
          <tr><td>only one cell</td></tr>
          <tr><td></td><td>orphan value</td></tr>
          <tr><td>Material</td><td>Steel</td></tr>
        </table>
        <dl><dt></dt><dd>skipped</dd></dl>
        "#,
    );

    let specs = collect_specs(&doc);
    assert_eq!(specs.render(), "Material: Steel");
}

#[test]
fn definition_terms_alone_are_collected() {
    let doc = Html::parse_document(
        r#"<dl><dt>Weight</dt><dd>2.4 kg</dd><dt>Finish</dt><dd>Zinc</dd></dl>"#,
    );

    let specs = collect_specs(&doc);
    assert_eq!(specs.render(), "Weight: 2.4 kg | Finish: Zinc");
    assert_eq!(specs.len(), 2);
}

#[test]
fn no_sources_yields_empty_map() {
    let doc = Html::parse_document("<p>No specifications anywhere.</p>");
    let specs = collect_specs(&doc);
    assert!(specs.is_empty());
    assert_eq!(specs.render(), "");
}

#[test]
fn non_spec_tables_are_ignored() {
    let doc = Html::parse_document(
        r#"<table><tr><td>Vehicle</td><td>Engine</td></tr></table>"#,
    );
    assert!(collect_specs(&doc).is_empty());
}

#[test]
fn spec_map_preserves_insertion_order() {
    let mut specs = SpecMap::new();
    specs.insert("Z", "last letter");
    specs.insert("A", "first letter");
    let keys: Vec<&str> = specs.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["Z", "A"]);
}
