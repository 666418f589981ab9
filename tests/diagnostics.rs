use cslmap::{ConversionOptions, Converter, Creator, CslItem, Diagnostic, Item};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_export_drops_nameless_creators() {
    let converter = Converter::new();
    let mut item = Item::new("book");
    item.set_field("title", "Anthology");
    item.creators = vec![
        Creator::two_field("", "", "author"),
        Creator::two_field("Borges", "Jorge Luis", "author"),
        Creator::single_field("", "editor"),
    ];

    let (csl, diagnostics) = converter
        .to_csl_with_diagnostics(&item, &ConversionOptions::default())
        .unwrap();
    assert_eq!(csl.names("author").len(), 1);
    assert!(csl.names("editor").is_empty());
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::InvalidCreator {
                variable: "author".to_string(),
                index: 0
            },
            Diagnostic::InvalidCreator {
                variable: "editor".to_string(),
                index: 2
            },
        ]
    );
}

#[test]
fn test_import_collects_every_anomaly() {
    let converter = Converter::new();
    let csl = CslItem::from_json(
        r#"{
            "type": "webpage",
            "title": "Home",
            "dimensions": "10 cm",
            "references": "none",
            "interviewer": [{"family": "Terkel", "given": "Studs"}],
            "author": [{"literal": "ACME"}, {}],
            "issued": {"literal": "sometime"},
            "curator": [{"literal": "Museum"}]
        }"#,
    )
    .unwrap();

    let (item, diagnostics) = converter
        .from_csl_with_diagnostics(&csl, &ConversionOptions::default())
        .unwrap();
    assert_eq!(item.field("title"), Some("Home"));
    assert_eq!(item.field("date"), Some("sometime"));
    assert_eq!(
        item.creators,
        vec![
            Creator::single_field("ACME", "author"),
            Creator::two_field("Terkel", "Studs", "author"),
        ]
    );
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::UnknownField {
                field: "curator".to_string()
            },
            Diagnostic::InvalidCreator {
                variable: "author".to_string(),
                index: 1
            },
            Diagnostic::InvalidCreatorType {
                creator_type: "interviewer".to_string(),
                item_type: "webpage".to_string()
            },
            Diagnostic::UnparseableDate {
                field: "date".to_string(),
                value: "sometime".to_string()
            },
        ]
    );
}

#[test]
fn test_diagnostics_do_not_change_result() {
    let converter = Converter::new();
    let json = r#"{"type": "book", "title": "T", "author": [{}], "foo": "bar"}"#;
    let csl = CslItem::from_json(json).unwrap();
    let options = ConversionOptions::default();
    let (item, diagnostics) = converter.from_csl_with_diagnostics(&csl, &options).unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(converter.from_csl(&csl, &options).unwrap(), item);
}

#[rstest]
#[case(
    Diagnostic::InvalidCreator { variable: "author".to_string(), index: 2 },
    "Dropped creator 2 of author: no name"
)]
#[case(
    Diagnostic::UnmappedCreatorType { creator_type: "contributor".to_string(), index: 1 },
    "Dropped creator 1: creator type contributor has no CSL name variable"
)]
#[case(
    Diagnostic::UnparseableDate { field: "date".to_string(), value: "soon".to_string() },
    "Could not parse date for date: \"soon\""
)]
#[case(
    Diagnostic::UnknownField { field: "curator".to_string() },
    "Dropped unknown field curator"
)]
#[case(
    Diagnostic::TypeFallback { csl_type: "dataset".to_string() },
    "Unknown CSL type \"dataset\"; using 'document'"
)]
fn test_diagnostic_display(#[case] diagnostic: Diagnostic, #[case] expected: &str) {
    assert_eq!(diagnostic.to_string(), expected);
}
