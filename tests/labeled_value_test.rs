//! Labeled-value fallback chain across the markup shapes detail pages use.

use partscrape::extract::DESCRIPTION_PATTERN;
use partscrape::extract::labeled::labeled_value;
use scraper::Html;

fn value_of(html: &str) -> String {
    labeled_value(&Html::parse_document(html), &DESCRIPTION_PATTERN)
}

#[test]
fn inline_sibling_after_label_text() {
    // Value follows the label inside the same element.
    assert_eq!(
        value_of(r#"<td>Description: <span>Front wheel bearing</span></td>"#),
        "Front wheel bearing"
    );
}

#[test]
fn label_element_followed_by_text() {
    assert_eq!(
        value_of(r#"<div><b>Description:</b> Premium hub assembly</div>"#),
        "Premium hub assembly"
    );
}

#[test]
fn definition_list_pair() {
    assert_eq!(
        value_of(r#"<dl><dt>Description</dt><dd>Sealed unit bearing</dd></dl>"#),
        "Sealed unit bearing"
    );
}

#[test]
fn table_row_last_cell() {
    // The label sits in a nested element with no siblings, so resolution
    // climbs to the enclosing row and takes its last cell.
    assert_eq!(
        value_of(
            r#"<table><tr>
                 <td><span>Description</span></td>
                 <td>ignored middle</td>
                 <td>Wheel hub, front axle</td>
               </tr></table>"#
        ),
        "Wheel hub, front axle"
    );
}

#[test]
fn container_value_marker() {
    // Value-marked sibling precedes the label; only the container fallback
    // can reach it.
    assert_eq!(
        value_of(
            r#"<div class="field">
                 <div class="value">Ceramic coated rotor</div>
                 <span>Description</span>
               </div>"#
        ),
        "Ceramic coated rotor"
    );
}

#[test]
fn no_label_yields_empty_string() {
    assert_eq!(value_of(r#"<p>Just some copy about bearings.</p>"#), "");
}

#[test]
fn label_without_any_value_yields_empty_string() {
    assert_eq!(value_of(r#"<p>Description</p>"#), "");
}

#[test]
fn whitespace_is_normalized() {
    assert_eq!(
        value_of("<div><b>Description:</b>   Premium \n\t hub   assembly </div>"),
        "Premium hub assembly"
    );
}

#[test]
fn case_insensitive_label_match() {
    assert_eq!(
        value_of(r#"<dl><dt>DESCRIPTION</dt><dd>Rear bearing kit</dd></dl>"#),
        "Rear bearing kit"
    );
}
