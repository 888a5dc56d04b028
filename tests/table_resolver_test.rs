//! Guide table and row-set resolution against representative markup shapes.

use partscrape::extract::table::{
    RowStrategy, TableStrategy, resolve_rows, resolve_table, row_field,
};
use partscrape::extract::parse_guide;
use scraper::Html;

#[test]
fn header_match_wins_and_maps_columns() {
    let doc = Html::parse_document(
        r#"
        <table>
          <thead><tr><th>Vehicle</th><th>Engine</th><th>SKP</th><th>Interchange</th></tr></thead>
          <tbody>
            <tr><td>2016 Honda Accord</td><td>2.4L L4</td><td><a href="/p/1">SKP 1</a></td><td></td></tr>
          </tbody>
        </table>
        "#,
    );

    let plan = resolve_table(&doc);
    assert_eq!(plan.strategy, TableStrategy::HeaderMatch);
    assert_eq!(plan.table_index, Some(0));
    assert_eq!(plan.vehicle_col, Some(0));
    assert_eq!(plan.engine_col, Some(1));

    let (strategy, rows) = resolve_rows(&doc, &plan);
    assert_eq!(strategy, RowStrategy::TableBody);
    assert_eq!(rows.len(), 1);
    assert_eq!(row_field(rows[0], plan.vehicle_col, 0), "2016 Honda Accord");
    assert_eq!(row_field(rows[0], plan.engine_col, 1), "2.4L L4");
}

#[test]
fn header_variants_still_match() {
    let doc = Html::parse_document(
        r#"
        <table>
          <tr><th>Notes</th><th>Vehicle Application</th><th>Engine Size</th></tr>
          <tr><td>-</td><td>2019 Civic</td><td>1.5L Turbo</td></tr>
        </table>
        "#,
    );

    let plan = resolve_table(&doc);
    assert_eq!(plan.strategy, TableStrategy::HeaderMatch);
    assert_eq!(plan.vehicle_col, Some(1));
    assert_eq!(plan.engine_col, Some(2));
}

#[test]
fn text_match_fallback_without_named_headers() {
    let doc = Html::parse_document(
        r#"
        <table><tr><th>Model</th><th>Motor</th></tr>
               <tr><td>Fits most vehicle trims</td><td>V6</td></tr></table>
        "#,
    );

    let plan = resolve_table(&doc);
    assert_eq!(plan.strategy, TableStrategy::TextMatch);
    assert_eq!(plan.table_index, Some(0));
    assert_eq!(plan.vehicle_col, None);
    assert_eq!(plan.engine_col, None);
}

#[test]
fn first_header_matching_table_is_preferred_over_earlier_text_match() {
    // The first table only mentions vehicles in passing; the second carries
    // real headers. Header match outranks document order.
    let doc = Html::parse_document(
        r#"
        <table><tr><td>About vehicle coverage</td></tr></table>
        <table>
          <tr><th>Vehicle</th><th>Engine</th></tr>
          <tr><td>2014 F-150</td><td>5.0L V8</td></tr>
        </table>
        "#,
    );

    let plan = resolve_table(&doc);
    assert_eq!(plan.strategy, TableStrategy::HeaderMatch);
    assert_eq!(plan.table_index, Some(1));
}

#[test]
fn no_table_falls_back_to_role_rows() {
    let doc = Html::parse_document(
        r#"
        <div role="row"><div>2019 Civic</div><div>1.5L Turbo</div></div>
        <div role="row"><div>2020 CR-V</div><div>1.5L Turbo</div></div>
        "#,
    );

    let plan = resolve_table(&doc);
    assert_eq!(plan.strategy, TableStrategy::None);

    let (strategy, rows) = resolve_rows(&doc, &plan);
    assert_eq!(strategy, RowStrategy::RoleMarker);
    assert_eq!(rows.len(), 2);

    // Positional fallback: first line is the vehicle, second the engine.
    assert_eq!(row_field(rows[0], None, 0), "2019 Civic");
    assert_eq!(row_field(rows[0], None, 1), "1.5L Turbo");
}

#[test]
fn row_class_marker_is_recognized() {
    let doc = Html::parse_document(
        r#"<ul><li class="row"><span>2012 Camry</span><span>2.5L</span></li></ul>"#,
    );

    let plan = resolve_table(&doc);
    let (strategy, rows) = resolve_rows(&doc, &plan);
    assert_eq!(strategy, RowStrategy::RowClass);
    assert_eq!(rows.len(), 1);
    assert_eq!(row_field(rows[0], None, 0), "2012 Camry");
}

#[test]
fn empty_document_yields_zero_rows_without_error() {
    let doc = Html::parse_document("<p>Nothing tabular here.</p>");
    let plan = resolve_table(&doc);
    let (strategy, rows) = resolve_rows(&doc, &plan);
    assert_eq!(strategy, RowStrategy::Empty);
    assert!(rows.is_empty());

    assert!(parse_guide("<p>Nothing tabular here.</p>").is_empty());
}

#[test]
fn missing_cell_reads_as_empty_field() {
    let doc = Html::parse_document(
        r#"
        <table>
          <tr><th>Vehicle</th><th>Engine</th></tr>
          <tr><td>2016 Accord</td></tr>
        </table>
        "#,
    );

    let plan = resolve_table(&doc);
    let (_, rows) = resolve_rows(&doc, &plan);
    assert_eq!(rows.len(), 1);
    assert_eq!(row_field(rows[0], plan.engine_col, 1), "");
}

#[test]
fn parse_guide_composes_fields_and_links() {
    let guide = parse_guide(
        r#"
        <table>
          <thead><tr><th>Vehicle</th><th>Engine</th><th>Parts</th></tr></thead>
          <tbody>
            <tr>
              <td>2016 Accord</td><td>2.4L</td>
              <td><a href="/skp/9">SKP 9</a> <a href="/int/9">Interchange 9</a></td>
            </tr>
            <tr><td>2017 Accord</td><td>3.5L</td><td>no links</td></tr>
          </tbody>
        </table>
        "#,
    );

    assert_eq!(guide.len(), 2);
    assert_eq!(guide[0].vehicle, "2016 Accord");
    assert_eq!(guide[0].engine, "2.4L");
    assert_eq!(guide[0].skp.as_ref().unwrap().text, "SKP 9");
    assert_eq!(
        guide[0].interchange.as_ref().unwrap().href.as_deref(),
        Some("/int/9")
    );
    assert!(guide[1].skp.is_none());
    assert!(guide[1].interchange.is_none());
}
