//! Correspondence tables between item fields and CSL variables.
//!
//! [`CslMappings`] is built once from a [`FieldRegistry`] and never mutated
//! afterwards. Entries naming fields or item types the registry does not
//! know are dropped at build time, so lookups never have to re-check them.

mod tables;

use crate::schema::FieldRegistry;
use compact_str::CompactString;
use std::collections::HashMap;
use tables::{DATE_MAPPINGS, FORCED_OPS, NAME_MAPPINGS, TEXT_MAPPINGS, TYPE_MAPPINGS};

/// An override applied to an exported CSL record after generic conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedOp {
    /// Set a text variable to a fixed value.
    Set {
        variable: &'static str,
        value: &'static str,
    },
    /// Move a variable's value to another variable.
    Rename {
        from: &'static str,
        to: &'static str,
    },
}

type VariableTable = Vec<(CompactString, Vec<CompactString>)>;

/// Process-wide correspondence tables.
#[derive(Debug, Clone)]
pub struct CslMappings {
    text: VariableTable,
    dates: VariableTable,
    names: Vec<(CompactString, CompactString)>,
    types: HashMap<CompactString, CompactString>,
    types_reverse: HashMap<CompactString, Vec<CompactString>>,
    forced: HashMap<CompactString, &'static [ForcedOp]>,
    fields_reverse: HashMap<CompactString, CompactString>,
}

impl CslMappings {
    /// Builds the tables, keeping only entries the registry knows.
    pub fn build<R: FieldRegistry + ?Sized>(registry: &R) -> Self {
        let text = build_variable_table(registry, TEXT_MAPPINGS);
        let dates = build_variable_table(registry, DATE_MAPPINGS);

        let names = NAME_MAPPINGS
            .iter()
            .filter(|(creator_type, variable)| {
                let exists = registry.creator_type_exists(creator_type);
                if !exists {
                    tracing::debug!(
                        variable,
                        creator_type,
                        "skipping name mapping for unknown creator type"
                    );
                }
                exists
            })
            .map(|(creator_type, variable)| {
                (CompactString::from(*creator_type), CompactString::from(*variable))
            })
            .collect();

        let mut types = HashMap::new();
        let mut types_reverse: HashMap<CompactString, Vec<CompactString>> = HashMap::new();
        for (csl_type, item_types) in TYPE_MAPPINGS {
            for item_type in item_types.iter() {
                if !registry.item_type_exists(item_type) {
                    tracing::debug!(
                        csl_type,
                        item_type,
                        "skipping type mapping for unknown item type"
                    );
                    continue;
                }
                types
                    .entry(CompactString::from(*item_type))
                    .or_insert_with(|| CompactString::from(*csl_type));
                types_reverse
                    .entry(CompactString::from(*csl_type))
                    .or_default()
                    .push(CompactString::from(*item_type));
            }
        }

        let forced = FORCED_OPS
            .iter()
            .filter(|(item_type, _)| registry.item_type_exists(item_type))
            .map(|(item_type, ops)| (CompactString::from(*item_type), *ops))
            .collect();

        // Later variables win, so `place` ends up as `publisher-place`
        let mut fields_reverse = HashMap::new();
        for (variable, fields) in text.iter().chain(dates.iter()) {
            for field in fields {
                fields_reverse.insert(field.clone(), variable.clone());
            }
        }

        Self {
            text,
            dates,
            names,
            types,
            types_reverse,
            forced,
            fields_reverse,
        }
    }

    /// Text variables with their candidate fields, in table order.
    pub fn text_mappings(&self) -> impl Iterator<Item = (&str, &[CompactString])> {
        self.text
            .iter()
            .map(|(v, fields)| (v.as_str(), fields.as_slice()))
    }

    /// Date variables with their candidate fields, in table order.
    pub fn date_mappings(&self) -> impl Iterator<Item = (&str, &[CompactString])> {
        self.dates
            .iter()
            .map(|(v, fields)| (v.as_str(), fields.as_slice()))
    }

    /// `(creator type, name variable)` pairs, in table order.
    pub fn name_mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// The CSL name variable for a creator type.
    pub fn name_variable(&self, creator_type: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(c, _)| c == creator_type)
            .map(|(_, v)| v.as_str())
    }

    /// The CSL type an item type exports as.
    pub fn csl_type(&self, item_type: &str) -> Option<&str> {
        self.types.get(item_type).map(CompactString::as_str)
    }

    /// Item types exporting as a CSL type, in registration order.
    pub fn item_types_for(&self, csl_type: &str) -> &[CompactString] {
        self.types_reverse
            .get(csl_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Overrides for an item type, in application order.
    pub fn forced_ops(&self, item_type: &str) -> &[ForcedOp] {
        self.forced.get(item_type).copied().unwrap_or_default()
    }

    /// The CSL variable an item field (or date field) maps to.
    pub fn variable_for_field(&self, field: &str) -> Option<&str> {
        self.fields_reverse.get(field).map(CompactString::as_str)
    }

    /// Whether any table names the CSL variable.
    pub fn is_known_variable(&self, variable: &str) -> bool {
        self.text.iter().any(|(v, _)| v == variable)
            || self.dates.iter().any(|(v, _)| v == variable)
            || self.names.iter().any(|(_, v)| v == variable)
    }
}

fn build_variable_table<R: FieldRegistry + ?Sized>(
    registry: &R,
    source: &[(&str, &[&str])],
) -> VariableTable {
    source
        .iter()
        .filter_map(|(variable, fields)| {
            let known: Vec<CompactString> = fields
                .iter()
                .filter(|field| {
                    let exists = registry.field_exists(field);
                    if !exists {
                        tracing::debug!(variable, field, "skipping mapping for unknown field");
                    }
                    exists
                })
                .map(|field| CompactString::from(*field))
                .collect();
            (!known.is_empty()).then(|| (CompactString::from(*variable), known))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, SchemaData};
    use pretty_assertions::assert_eq;

    fn mappings() -> CslMappings {
        CslMappings::build(&Schema::builtin())
    }

    #[test]
    fn test_text_mappings_keep_order() {
        let mappings = mappings();
        let variables: Vec<&str> = mappings.text_mappings().map(|(v, _)| v).take(4).collect();
        assert_eq!(
            variables,
            vec!["abstract", "archive", "archive_location", "authority"]
        );

        let (_, fields) = mappings
            .text_mappings()
            .find(|(v, _)| *v == "container-title")
            .unwrap();
        assert_eq!(fields, ["publicationTitle", "reporter", "code"]);
    }

    #[test]
    fn test_type_lookup() {
        let mappings = mappings();
        assert_eq!(mappings.csl_type("book"), Some("book"));
        assert_eq!(mappings.csl_type("computerProgram"), Some("book"));
        assert_eq!(mappings.csl_type("journalArticle"), Some("article-journal"));
        assert_eq!(mappings.csl_type("gizmo"), None);
        assert_eq!(
            mappings.item_types_for("broadcast"),
            ["tvBroadcast", "radioBroadcast", "podcast"]
        );
        assert!(mappings.item_types_for("gizmo").is_empty());
    }

    #[test]
    fn test_name_lookup() {
        let mappings = mappings();
        assert_eq!(mappings.name_variable("cosponsor"), Some("author"));
        assert_eq!(
            mappings.name_variable("scriptwriter"),
            Some("script-writer")
        );
        assert_eq!(mappings.name_variable("contributor"), None);
    }

    #[test]
    fn test_forced_ops() {
        let mappings = mappings();
        assert_eq!(
            mappings.forced_ops("email"),
            [ForcedOp::Set {
                variable: "genre",
                value: "email"
            }]
        );
        assert!(mappings.forced_ops("book").is_empty());
    }

    #[test]
    fn test_reverse_field_lookup() {
        let mappings = mappings();
        assert_eq!(
            mappings.variable_for_field("publicationTitle"),
            Some("container-title")
        );
        assert_eq!(
            mappings.variable_for_field("place"),
            Some("publisher-place")
        );
        assert_eq!(
            mappings.variable_for_field("shortTitle"),
            Some("title-short")
        );
        assert_eq!(mappings.variable_for_field("accessDate"), Some("accessed"));
        assert_eq!(mappings.variable_for_field("nonexistent"), None);
    }

    #[test]
    fn test_unknown_registry_entries_skipped() {
        let schema = Schema::from_data(&SchemaData::default());
        let mappings = CslMappings::build(&schema);
        assert_eq!(mappings.text_mappings().count(), 0);
        assert_eq!(mappings.csl_type("book"), None);
        assert!(mappings.forced_ops("email").is_empty());
        assert_eq!(mappings.name_mappings().count(), 0);
        assert!(!mappings.is_known_variable("author"));
        assert!(!mappings.is_known_variable("title"));
    }

    #[test]
    fn test_name_mappings_follow_registry() {
        let schema = Schema::from_json(
            r#"{"itemTypes": [{
                "itemType": "book",
                "fields": [{"field": "title"}],
                "creatorTypes": [{"creatorType": "author", "primary": true}, {"creatorType": "editor"}]
            }]}"#,
        )
        .unwrap();
        let mappings = CslMappings::build(&schema);
        assert_eq!(
            mappings.name_mappings().collect::<Vec<_>>(),
            vec![("author", "author"), ("editor", "editor")]
        );
        assert_eq!(mappings.name_variable("translator"), None);
        assert!(mappings.is_known_variable("editor"));
        assert!(!mappings.is_known_variable("translator"));
    }
}
