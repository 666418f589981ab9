use cslmap::csl::portable::{HEADER_PREFIX, decode_note};
use cslmap::{ConversionOptions, Converter, Creator, CreatorVariant, Item};
use pretty_assertions::assert_eq;

fn multilingual_article() -> Item {
    let mut item = Item::new("journalArticle");
    item.id = Some("p1".to_string());
    item.set_field("title", "Über das Verhalten")
        .set_field("publicationTitle", "Zeitschrift")
        .set_field("seriesText", "Neue Folge")
        .set_field("extra", "original-date: 1850")
        .set_main_language("title", "de")
        .set_field_variant("title", "en", "On the Behaviour");

    let mut author = Creator::two_field("Müller", "Hans", "author");
    author.multi.main = Some("de".to_string());
    author.multi.key.insert(
        "ru".to_string(),
        CreatorVariant {
            last_name: Some("Мюллер".to_string()),
            first_name: Some("Ганс".to_string()),
            name: None,
        },
    );
    item.creators = vec![
        author,
        Creator::single_field("Akademie der Wissenschaften", "editor"),
    ];
    item
}

#[test]
fn test_portable_roundtrip_is_lossless() {
    let converter = Converter::new();
    let options = ConversionOptions::portable();
    let item = multilingual_article();

    let csl = converter.to_csl(&item, &options).unwrap();
    let back = converter.from_csl(&csl, &options).unwrap();
    assert_eq!(back, item);
}

#[test]
fn test_portable_record_shape() {
    let converter = Converter::new();
    let csl = converter
        .to_csl(&multilingual_article(), &ConversionOptions::portable())
        .unwrap();

    assert_eq!(csl.multi, None);
    assert_eq!(csl.names("author")[0].multi, None);
    assert_eq!(
        csl.names("editor")[0].literal.as_deref(),
        Some("Akademie der Wissenschaften")
    );
    assert_eq!(csl.field("title"), Some("Über das Verhalten"));

    let note = csl.field("note").unwrap();
    assert!(note.starts_with(HEADER_PREFIX));
    let (payload, rest) = decode_note(note).unwrap();
    assert_eq!(rest.as_deref(), Some("original-date: 1850"));
    assert_eq!(payload.extrafields["seriesText"], "Neue Folge");
    assert_eq!(payload.multifields.keys["title"]["en"], "On the Behaviour");
    assert_eq!(
        payload.multicreators["author:0"].main.as_deref(),
        Some("de")
    );
}

#[test]
fn test_plain_import_keeps_header() {
    let converter = Converter::new();
    let csl = converter
        .to_csl(&multilingual_article(), &ConversionOptions::portable())
        .unwrap();
    let item = converter
        .from_csl(&csl, &ConversionOptions::default())
        .unwrap();

    assert!(item.field("extra").unwrap().starts_with(HEADER_PREFIX));
    assert_eq!(item.field("seriesText"), None);
    assert!(item.multi.is_empty());
}

#[test]
fn test_portable_normalizes_multipart_dates() {
    let converter = Converter::new();
    let options = ConversionOptions::portable();
    let mut item = Item::new("book");
    item.set_field("title", "Dated")
        .set_field("date", "2020-03-05 March 5, 2020");

    let csl = converter.to_csl(&item, &options).unwrap();
    assert_eq!(csl.field("note"), None);
    let back = converter.from_csl(&csl, &options).unwrap();
    assert_eq!(back.field("date"), Some("2020-03-05"));
}

#[test]
fn test_portable_without_payload_leaves_note() {
    let converter = Converter::new();
    let options = ConversionOptions::portable();
    let mut item = Item::new("book");
    item.set_field("title", "Plain")
        .set_field("extra", "just a note");

    let csl = converter.to_csl(&item, &options).unwrap();
    assert_eq!(csl.field("note"), Some("just a note"));
    assert_eq!(converter.from_csl(&csl, &options).unwrap(), item);
}
