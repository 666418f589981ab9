use cslmap::{ConversionConfig, ConversionOptions, Converter, Creator, Item};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn roundtrip(item: &Item) -> Item {
    let converter = Converter::new();
    let options = ConversionOptions::default();
    let csl = converter.to_csl(item, &options).unwrap();
    converter.from_csl(&csl, &options).unwrap()
}

fn journal_article() -> Item {
    let mut item = Item::new("journalArticle");
    item.id = Some("ja1".to_string());
    item.set_field("title", "On the Electrodynamics of Moving Bodies")
        .set_field("publicationTitle", "Annalen der Physik")
        .set_field("volume", "17")
        .set_field("issue", "10")
        .set_field("pages", "891-921")
        .set_field("date", "1905-06-30")
        .set_field("accessDate", "2021-01-02")
        .set_field("DOI", "10.1002/andp.19053221004")
        .set_field("ISSN", "0003-3804")
        .set_field("language", "de");
    item.creators = vec![
        Creator::two_field("Einstein", "Albert", "author"),
        Creator::two_field("van der Berg", "Anna", "author"),
        Creator::single_field("Royal Society", "editor"),
    ];
    item
}

#[test]
fn test_journal_article_roundtrip() {
    let item = journal_article();
    assert_eq!(roundtrip(&item), item);
}

#[test]
fn test_journal_article_csl_shape() {
    let converter = Converter::new();
    let csl = converter
        .to_csl(&journal_article(), &ConversionOptions::default())
        .unwrap();
    let text = converter.csl_to_json(&csl).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["id"], "ja1");
    assert_eq!(json["type"], "article-journal");
    assert_eq!(json["container-title"], "Annalen der Physik");
    assert_eq!(json["page"], "891-921");
    assert_eq!(
        json["issued"]["date-parts"],
        serde_json::json!([[1905, 6, 30]])
    );
    assert_eq!(json["accessed"]["raw"], "2021-01-02");
    assert_eq!(json["author"][1]["family"], "Berg");
    assert_eq!(json["author"][1]["non-dropping-particle"], "van der");
    assert_eq!(json["editor"][0]["literal"], "Royal Society");
}

#[test]
fn test_book_section_roundtrip() {
    let mut item = Item::new("bookSection");
    item.set_field("title", "Chapter One")
        .set_field("bookTitle", "Collected Essays")
        .set_field("place", "London")
        .set_field("publisher", "Faber")
        .set_field("pages", "1-20")
        .set_field("date", "1999-03");
    item.creators = vec![
        Creator::two_field("Eliot", "T. S.", "author"),
        Creator::two_field("Hayward", "John", "editor"),
        Creator::two_field("Eliot", "Valerie", "bookAuthor"),
    ];
    assert_eq!(roundtrip(&item), item);
}

#[test]
fn test_case_roundtrip() {
    let mut item = Item::new("case");
    item.set_field("caseName", "Marbury v. Madison")
        .set_field("court", "Supreme Court")
        .set_field("reporter", "U.S.")
        .set_field("reporterVolume", "5")
        .set_field("firstPage", "137")
        .set_field("dateDecided", "1803-02-24")
        .set_field("jurisdiction", "us");
    assert_eq!(roundtrip(&item), item);
}

#[test]
fn test_computer_program_roundtrip() {
    let mut item = Item::new("computerProgram");
    item.set_field("title", "ripgrep")
        .set_field("versionNumber", "14.1.0")
        .set_field("programmingLanguage", "Rust")
        .set_field("company", "BurntSushi");
    item.creators = vec![Creator::two_field("Gallant", "Andrew", "programmer")];
    assert_eq!(roundtrip(&item), item);
}

#[rstest]
#[case("email", "subject", "email")]
#[case("instantMessage", "title", "instant message")]
fn test_personal_communication_roundtrip(
    #[case] item_type: &str,
    #[case] title_field: &str,
    #[case] genre: &str,
) {
    let mut item = Item::new(item_type);
    item.set_field(title_field, "Re: lunch");
    item.creators = vec![
        Creator::two_field("Doe", "Jane", "author"),
        Creator::two_field("Roe", "Richard", "recipient"),
    ];

    let converter = Converter::new();
    let options = ConversionOptions::default();
    let csl = converter.to_csl(&item, &options).unwrap();
    assert_eq!(csl.csl_type(), Some("personal_communication"));
    assert_eq!(csl.field("genre"), Some(genre));
    assert_eq!(csl.field("title"), Some("Re: lunch"));
    assert_eq!(roundtrip(&item), item);
}

#[test]
fn test_multilingual_roundtrip() {
    let mut item = Item::new("book");
    item.set_field("title", "吾輩は猫である")
        .set_main_language("title", "ja")
        .set_field_variant("title", "en", "I Am a Cat")
        .set_field_variant("title", "ja-Latn", "Wagahai wa Neko de Aru");
    let mut author = Creator::two_field("夏目", "漱石", "author");
    author.multi.main = Some("ja".to_string());
    author.multi.key.insert(
        "en".to_string(),
        cslmap::CreatorVariant {
            last_name: Some("Natsume".to_string()),
            first_name: Some("Soseki".to_string()),
            name: None,
        },
    );
    item.creators.push(author);
    assert_eq!(roundtrip(&item), item);
}

#[rstest]
#[case("1998-00-00 Spring 1998", "Spring 1998")]
#[case("2001-09-00 September 2001", "2001-09")]
#[case("2020-03-05 5 March 2020", "2020-03-05")]
fn test_multipart_dates_normalize(#[case] stored: &str, #[case] imported: &str) {
    let mut item = Item::new("book");
    item.set_field("date", stored);
    assert_eq!(roundtrip(&item).field("date"), Some(imported));
}

#[test]
fn test_particles_survive_roundtrip() {
    let names = [
        ("van Gogh", "Vincent"),
        ("d'Alembert", "Jean"),
        ("Fontaine", "Jean de"),
        ("King", "Martin Luther, Jr."),
        ("de la Cruz", "Juana Inés"),
    ];
    let mut item = Item::new("book");
    item.creators = names
        .into_iter()
        .map(|(last, first)| Creator::two_field(last, first, "author"))
        .collect();
    assert_eq!(roundtrip(&item).creators, item.creators);
}

#[test]
fn test_day_first_locale_roundtrip() {
    let mut config = ConversionConfig::new();
    config.set_locale("en-GB");
    let converter = Converter::with_config(config);
    let options = ConversionOptions::default();

    let mut item = Item::new("book");
    item.set_field("date", "3/5/2020");
    let csl = converter.to_csl(&item, &options).unwrap();
    assert_eq!(
        csl.date("issued").unwrap().date_parts,
        Some(vec![vec![2020, 5, 3]])
    );
    let back = converter.from_csl(&csl, &options).unwrap();
    assert_eq!(back.field("date"), Some("2020-05-03"));
}
