//! Re-keying of `Field Name: value` lines in the extra field.
//!
//! Citation processors read `variable: value` lines out of the CSL `note`
//! variable. Users write them with human-readable names ("Original Date",
//! "Publication Title"), so each line's name is normalized to a CSL
//! variable on export.

use crate::mappings::CslMappings;
use crate::regex::{Captures, Regex};
use std::sync::LazyLock;

static EXTRA_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([A-Za-z \-]+)(:\s*.+)").unwrap());

/// CSL variables kept as written once lowercased and hyphenated.
const CSL_VARIABLES: &[&str] = &[
    "abstract",
    "accessed",
    "annote",
    "archive",
    "archive-place",
    "author",
    "authority",
    "call-number",
    "chapter-number",
    "citation-label",
    "citation-number",
    "collection-editor",
    "collection-number",
    "collection-title",
    "composer",
    "container",
    "container-author",
    "container-title",
    "container-title-short",
    "dimensions",
    "director",
    "edition",
    "editor",
    "editorial-director",
    "event",
    "event-date",
    "event-place",
    "first-reference-note-number",
    "genre",
    "illustrator",
    "interviewer",
    "issue",
    "issued",
    "jurisdiction",
    "keyword",
    "language",
    "locator",
    "medium",
    "note",
    "number",
    "number-of-pages",
    "number-of-volumes",
    "original-author",
    "original-date",
    "original-publisher",
    "original-publisher-place",
    "original-title",
    "page",
    "page-first",
    "publisher",
    "publisher-place",
    "recipient",
    "references",
    "reviewed-author",
    "reviewed-title",
    "scale",
    "section",
    "source",
    "status",
    "submitted",
    "title",
    "title-short",
    "translator",
    "type",
    "version",
    "volume",
    "year-suffix",
];

/// CSL variables written in upper case.
const UPPERCASE_VARIABLES: &[&str] = &["doi", "isbn", "issn", "pmcid", "pmid", "url"];

/// Normalizes the names of `Field Name: value` lines to CSL variables.
///
/// Names are matched case-insensitively with spaces read as hyphens.
/// Names of item fields ("Publication Title") map to the CSL variable of
/// that field. Lines with unrecognized names pass through unchanged.
///
/// # Examples
///
/// ```
/// use cslmap::{CslMappings, Schema};
/// use cslmap::csl::extra_to_csl;
///
/// let mappings = CslMappings::build(&Schema::builtin());
/// let extra = "Original Date: 1850\nPublication Title: Punch\nDoi: 10.1000/1\nsome note";
/// assert_eq!(
///     extra_to_csl(extra, &mappings),
///     "original-date: 1850\ncontainer-title: Punch\nDOI: 10.1000/1\nsome note"
/// );
/// ```
pub fn extra_to_csl(extra: &str, mappings: &CslMappings) -> String {
    EXTRA_LINE_REGEX
        .replace_all(extra, |caps: &Captures| {
            let name = &caps[1];
            format!("{}{}", csl_variable_name(name, mappings), &caps[2])
        })
        .into_owned()
}

fn csl_variable_name(name: &str, mappings: &CslMappings) -> String {
    let variable = name.to_lowercase().replace(' ', "-");
    if CSL_VARIABLES.contains(&variable.as_str()) {
        return variable;
    }
    if UPPERCASE_VARIABLES.contains(&variable.as_str()) {
        return variable.to_uppercase();
    }
    if variable == "archive-location" {
        return "archive_location".to_string();
    }

    let field = field_name(name);
    match mappings.variable_for_field(&field) {
        Some(variable) => variable.to_string(),
        None => name.to_string(),
    }
}

/// "Publication Title" -> "publicationTitle". Only the first space is
/// collapsed; acronyms such as "DOI" keep their case.
fn field_name(name: &str) -> String {
    let mut field = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut collapsed = false;
    while let Some(c) = chars.next() {
        if c == ' ' && !collapsed && chars.peek().is_some_and(char::is_ascii_uppercase) {
            collapsed = true;
            continue;
        }
        field.push(c);
    }

    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if !second.is_uppercase() => {
            let mut lowered = first.to_lowercase().to_string();
            lowered.push_str(&field[first.len_utf8()..]);
            lowered
        }
        _ => field,
    }
}
