//! Part-link, disclosure, and info-affordance resolution.

use partscrape::extract::links::{disclosure_labels, find_part_link};
use partscrape::extract::{INTERCHANGE_PATTERN, SKP_PATTERN};
use partscrape::navigator::find_info_affordance;
use scraper::{ElementRef, Html, Selector};

fn first_row(doc: &Html) -> ElementRef<'_> {
    let tr = Selector::parse("tr").unwrap();
    doc.select(&tr).next().expect("fixture has a row")
}

#[test]
fn anchor_with_href_is_found() {
    let doc = Html::parse_document(
        r#"<table><tr>
             <td>2016 Accord</td>
             <td><a href="/parts/skp-123">SKP 123</a></td>
           </tr></table>"#,
    );

    let link = find_part_link(first_row(&doc), &SKP_PATTERN).unwrap();
    assert_eq!(link.text, "SKP 123");
    assert_eq!(link.href.as_deref(), Some("/parts/skp-123"));
}

#[test]
fn button_is_a_fallback_without_target() {
    let doc = Html::parse_document(
        r#"<table><tr><td><button>Interchange lookup</button></td></tr></table>"#,
    );

    let link = find_part_link(first_row(&doc), &INTERCHANGE_PATTERN).unwrap();
    assert_eq!(link.text, "Interchange lookup");
    assert!(link.href.is_none());
}

#[test]
fn anchors_outrank_buttons_regardless_of_position() {
    let doc = Html::parse_document(
        r#"<table><tr>
             <td><button>SKP quick view</button></td>
             <td><a href="/skp/7">SKP 7</a></td>
           </tr></table>"#,
    );

    let link = find_part_link(first_row(&doc), &SKP_PATTERN).unwrap();
    assert_eq!(link.text, "SKP 7");
    assert!(link.href.is_some());
}

#[test]
fn matching_is_whole_word_and_case_insensitive() {
    let doc = Html::parse_document(
        r#"<table><tr>
             <td><a href="/a">skips ahead</a></td>
             <td><a href="/b">view skp part</a></td>
           </tr></table>"#,
    );

    let link = find_part_link(first_row(&doc), &SKP_PATTERN).unwrap();
    assert_eq!(link.text, "view skp part");
}

#[test]
fn absent_link_is_none_not_an_error() {
    let doc = Html::parse_document(
        r#"<table><tr><td>2016 Accord</td><td>2.4L</td></tr></table>"#,
    );
    assert!(find_part_link(first_row(&doc), &SKP_PATTERN).is_none());
    assert!(find_part_link(first_row(&doc), &INTERCHANGE_PATTERN).is_none());
}

#[test]
fn disclosure_affordances_are_reported_by_label() {
    let doc = Html::parse_document(
        r##"<table><tr>
             <td><button>Expand</button></td>
             <td><a href="#" aria-expanded="false">More fitment</a></td>
             <td><button>Expand</button></td>
           </tr></table>"##,
    );

    let labels = disclosure_labels(first_row(&doc));
    assert_eq!(labels, ["More fitment", "Expand"]);
}

#[test]
fn plain_rows_expose_no_disclosures() {
    let doc = Html::parse_document(
        r#"<table><tr><td>2016 Accord</td><td><a href="/x">SKP 1</a></td></tr></table>"#,
    );
    assert!(disclosure_labels(first_row(&doc)).is_empty());
}

#[test]
fn info_affordance_is_detected_case_insensitively() {
    assert_eq!(
        find_info_affordance(r#"<a href="/more">More Info</a>"#).as_deref(),
        Some("More Info")
    );
    assert_eq!(
        find_info_affordance(r#"<button>INFO</button>"#).as_deref(),
        Some("INFO")
    );
    assert!(find_info_affordance(r#"<a href="/buy">Buy now</a>"#).is_none());
}
