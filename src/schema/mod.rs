//! Item field and creator type registry.
//!
//! Conversion never hardcodes which fields an item type carries. It asks a
//! [`FieldRegistry`] instead: which fields exist, which are valid for a type,
//! which are base fields with type-specific aliases, and which creator types
//! a type accepts. [`Schema`] is the built-in registry; it can also be loaded
//! from a JSON schema document.
//!
//! # Example
//!
//! ```
//! use cslmap::{FieldRegistry, Schema};
//!
//! let schema = Schema::builtin();
//! assert_eq!(schema.typed_field("bookSection", "publicationTitle"), Some("bookTitle"));
//! assert_eq!(schema.primary_creator_type("film"), Some("director"));
//! assert!(!schema.is_valid_for_type("ISBN", "journalArticle"));
//! ```

mod data;

use crate::error::ConversionError;
use data::{COMMON_FIELDS, DATE_FIELDS, FieldDef, ITEM_TYPES};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Lookups the converters need from an item field registry.
pub trait FieldRegistry {
    /// Whether the item type is known.
    fn item_type_exists(&self, item_type: &str) -> bool;

    /// Whether the field is known, on any item type.
    fn field_exists(&self, field: &str) -> bool;

    /// Whether the field has type-specific aliases.
    fn is_base_field(&self, field: &str) -> bool;

    /// The alias of `base_field` on `item_type`, if the type has one.
    fn typed_field(&self, item_type: &str, base_field: &str) -> Option<&str>;

    /// The base field `field` is an alias of on `item_type`, if any.
    fn base_field(&self, item_type: &str, field: &str) -> Option<&str>;

    /// Whether the field may be set on items of this type.
    fn is_valid_for_type(&self, field: &str, item_type: &str) -> bool;

    /// The primary creator type of an item type. `None` for types without creators.
    fn primary_creator_type(&self, item_type: &str) -> Option<&str>;

    /// Whether the creator type may be used on items of this type.
    fn is_valid_creator_type(&self, creator_type: &str, item_type: &str) -> bool;

    /// Whether any item type accepts the creator type.
    fn creator_type_exists(&self, creator_type: &str) -> bool;

    /// All fields valid for the item type, in display order.
    fn item_type_fields(&self, item_type: &str) -> Vec<&str>;

    /// Whether the field holds a date.
    fn is_date_field(&self, field: &str) -> bool;
}

/// Serialized form of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaData {
    pub item_types: Vec<ItemTypeData>,
    /// Base fields holding dates. Their aliases are date fields too.
    #[serde(default)]
    pub date_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeData {
    pub item_type: String,
    #[serde(default)]
    pub fields: Vec<FieldData>,
    #[serde(default)]
    pub creator_types: Vec<CreatorTypeData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorTypeData {
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary: bool,
}

#[derive(Debug, Clone, Default)]
struct TypeEntry {
    fields: Vec<String>,
    /// alias -> base
    bases: HashMap<String, String>,
    /// base -> alias
    aliases: HashMap<String, String>,
    creator_types: Vec<String>,
    primary: Option<String>,
}

/// An item field registry backed by in-memory tables.
#[derive(Debug, Clone)]
pub struct Schema {
    types: HashMap<String, TypeEntry>,
    fields: HashSet<String>,
    base_fields: HashSet<String>,
    date_fields: HashSet<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Schema {
    /// The built-in registry.
    pub fn builtin() -> Self {
        Self::from_data(&builtin_data())
    }

    /// Builds a registry from its serialized form.
    pub fn from_data(data: &SchemaData) -> Self {
        let mut types = HashMap::new();
        let mut fields = HashSet::new();
        let mut base_fields = HashSet::new();
        let mut date_fields: HashSet<String> = data.date_fields.iter().cloned().collect();

        for item_type in &data.item_types {
            let mut entry = TypeEntry::default();
            for field in &item_type.fields {
                entry.fields.push(field.field.clone());
                fields.insert(field.field.clone());
                if let Some(base) = &field.base_field {
                    entry.bases.insert(field.field.clone(), base.clone());
                    entry.aliases.insert(base.clone(), field.field.clone());
                    fields.insert(base.clone());
                    base_fields.insert(base.clone());
                }
            }
            entry.creator_types = item_type
                .creator_types
                .iter()
                .map(|c| c.creator_type.clone())
                .collect();
            entry.primary = item_type
                .creator_types
                .iter()
                .find(|c| c.primary)
                .or_else(|| item_type.creator_types.first())
                .map(|c| c.creator_type.clone());
            types.insert(item_type.item_type.clone(), entry);
        }

        let aliased_dates: Vec<String> = types
            .values()
            .flat_map(|entry| entry.bases.iter())
            .filter(|(_, base)| date_fields.contains(*base))
            .map(|(alias, _)| alias.clone())
            .collect();
        date_fields.extend(aliased_dates);

        Self {
            types,
            fields,
            base_fields,
            date_fields,
        }
    }

    /// Loads a registry from a JSON schema document.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        let data: SchemaData = serde_json::from_str(json)?;
        Ok(Self::from_data(&data))
    }

    /// Names of all known item types, sorted.
    pub fn item_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creator types valid for an item type, primary first.
    pub fn creator_types(&self, item_type: &str) -> &[String] {
        self.types
            .get(item_type)
            .map(|entry| entry.creator_types.as_slice())
            .unwrap_or_default()
    }
}

impl FieldRegistry for Schema {
    fn item_type_exists(&self, item_type: &str) -> bool {
        self.types.contains_key(item_type)
    }

    fn field_exists(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    fn is_base_field(&self, field: &str) -> bool {
        self.base_fields.contains(field)
    }

    fn typed_field(&self, item_type: &str, base_field: &str) -> Option<&str> {
        self.types
            .get(item_type)?
            .aliases
            .get(base_field)
            .map(String::as_str)
    }

    fn base_field(&self, item_type: &str, field: &str) -> Option<&str> {
        self.types
            .get(item_type)?
            .bases
            .get(field)
            .map(String::as_str)
    }

    fn is_valid_for_type(&self, field: &str, item_type: &str) -> bool {
        self.types
            .get(item_type)
            .is_some_and(|entry| entry.fields.iter().any(|f| f == field))
    }

    fn primary_creator_type(&self, item_type: &str) -> Option<&str> {
        self.types.get(item_type)?.primary.as_deref()
    }

    fn is_valid_creator_type(&self, creator_type: &str, item_type: &str) -> bool {
        self.types
            .get(item_type)
            .is_some_and(|entry| entry.creator_types.iter().any(|c| c == creator_type))
    }

    fn creator_type_exists(&self, creator_type: &str) -> bool {
        self.types
            .values()
            .any(|entry| entry.creator_types.iter().any(|c| c == creator_type))
    }

    fn item_type_fields(&self, item_type: &str) -> Vec<&str> {
        self.types
            .get(item_type)
            .map(|entry| entry.fields.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn is_date_field(&self, field: &str) -> bool {
        self.date_fields.contains(field)
    }
}

fn builtin_data() -> SchemaData {
    let item_types = ITEM_TYPES
        .iter()
        .map(|def| {
            let mut fields: Vec<FieldData> = def
                .fields
                .iter()
                .map(|field| match *field {
                    FieldDef::Plain(name) => FieldData {
                        field: name.to_string(),
                        base_field: None,
                    },
                    FieldDef::Typed(name, base) => FieldData {
                        field: name.to_string(),
                        base_field: Some(base.to_string()),
                    },
                })
                .collect();

            if def.common {
                let shadowed = |common: &str| {
                    def.fields.iter().any(|field| match *field {
                        FieldDef::Plain(name) => name == common,
                        FieldDef::Typed(_, base) => base == common,
                    })
                };
                fields.extend(
                    COMMON_FIELDS
                        .iter()
                        .filter(|common| !shadowed(**common))
                        .map(|common| FieldData {
                            field: common.to_string(),
                            base_field: None,
                        }),
                );
            }

            ItemTypeData {
                item_type: def.name.to_string(),
                fields,
                creator_types: def
                    .creator_types
                    .iter()
                    .enumerate()
                    .map(|(index, creator_type)| CreatorTypeData {
                        creator_type: creator_type.to_string(),
                        primary: index == 0,
                    })
                    .collect(),
            }
        })
        .collect();

    SchemaData {
        item_types,
        date_fields: DATE_FIELDS.iter().map(|f| f.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("bookSection", "publicationTitle", Some("bookTitle"))]
    #[case("case", "title", Some("caseName"))]
    #[case("case", "date", Some("dateDecided"))]
    #[case("film", "publisher", Some("distributor"))]
    #[case("tvBroadcast", "number", Some("episodeNumber"))]
    #[case("book", "publisher", None)]
    #[case("nonexistent", "title", None)]
    fn test_typed_field(
        #[case] item_type: &str,
        #[case] base: &str,
        #[case] expected: Option<&str>,
    ) {
        let schema = Schema::builtin();
        assert_eq!(schema.typed_field(item_type, base), expected);
    }

    #[test]
    fn test_common_fields_shadowed_by_alias() {
        let schema = Schema::builtin();
        assert!(schema.is_valid_for_type("caseName", "case"));
        assert!(!schema.is_valid_for_type("title", "case"));
        assert!(schema.is_valid_for_type("title", "book"));
        assert!(schema.is_valid_for_type("extra", "film"));
        assert!(!schema.is_valid_for_type("place", "film"));
        assert!(!schema.is_valid_for_type("title", "note"));
    }

    #[test]
    fn test_base_fields() {
        let schema = Schema::builtin();
        assert!(schema.is_base_field("publisher"));
        assert!(schema.is_base_field("title"));
        assert!(!schema.is_base_field("ISBN"));
        assert!(schema.field_exists("authority"));
        assert_eq!(schema.base_field("thesis", "university"), Some("publisher"));
        assert_eq!(schema.base_field("thesis", "place"), None);
    }

    #[test]
    fn test_creator_types() {
        let schema = Schema::builtin();
        assert_eq!(schema.primary_creator_type("book"), Some("author"));
        assert_eq!(schema.primary_creator_type("artwork"), Some("artist"));
        assert_eq!(schema.primary_creator_type("note"), None);
        assert!(schema.is_valid_creator_type("bookAuthor", "bookSection"));
        assert!(!schema.is_valid_creator_type("bookAuthor", "book"));
        assert_eq!(
            schema.creator_types("email"),
            ["author", "contributor", "recipient"]
        );
    }

    #[test]
    fn test_date_fields() {
        let schema = Schema::builtin();
        assert!(schema.is_date_field("date"));
        assert!(schema.is_date_field("accessDate"));
        assert!(schema.is_date_field("dateDecided"));
        assert!(schema.is_date_field("issueDate"));
        assert!(!schema.is_date_field("title"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "itemTypes": [
                {
                    "itemType": "gadget",
                    "fields": [
                        {"field": "title"},
                        {"field": "maker", "baseField": "publisher"},
                        {"field": "built", "baseField": "date"}
                    ],
                    "creatorTypes": [
                        {"creatorType": "contributor"},
                        {"creatorType": "designer", "primary": true}
                    ]
                }
            ],
            "dateFields": ["date"]
        }"#;
        let schema = Schema::from_json(json).unwrap();
        assert!(schema.item_type_exists("gadget"));
        assert_eq!(schema.typed_field("gadget", "publisher"), Some("maker"));
        assert_eq!(schema.primary_creator_type("gadget"), Some("designer"));
        assert!(schema.creator_type_exists("designer"));
        assert!(!schema.creator_type_exists("author"));
        assert!(schema.is_date_field("built"));
        assert_eq!(
            schema.item_type_fields("gadget"),
            vec!["title", "maker", "built"]
        );
        assert_eq!(schema.item_types(), vec!["gadget"]);
    }

    #[test]
    fn test_from_json_error() {
        let result = Schema::from_json("{\"itemTypes\": 5}");
        assert!(matches!(result, Err(ConversionError::Json(_))));
    }
}
