//! Convert bibliographic items to and from CSL-JSON.
//!
//! `cslmap` maps between an internal "item" representation (a typed set of
//! fields, ordered creators, free-text dates and per-field language
//! overlays) and CSL-JSON, the interchange format consumed by citation
//! processors. The mapping is driven by correspondence tables built once from
//! a field registry and shared, read-only, by every conversion.
//!
//! # Features
//!
//! - `regex` - Use the `regex` crate (enabled by default)
//! - `lite` - Use `regex-lite` instead, for smaller binaries
//!
//! # Basic Usage
//!
//! ```rust
//! use cslmap::{Converter, ConversionOptions, Creator, Item};
//!
//! let converter = Converter::new();
//!
//! let mut item = Item::new("book");
//! item.set_field("title", "The Name of the Rose");
//! item.set_field("date", "1980");
//! item.creators.push(Creator::two_field("Eco", "Umberto", "author"));
//!
//! let csl = converter.to_csl(&item, &ConversionOptions::default()).unwrap();
//! assert_eq!(csl.csl_type(), Some("book"));
//! assert_eq!(csl.field("title"), Some("The Name of the Rose"));
//!
//! let back = converter.from_csl(&csl, &ConversionOptions::default()).unwrap();
//! assert_eq!(back.item_type, "book");
//! assert_eq!(back.field("title"), Some("The Name of the Rose"));
//! ```
//!
//! # Type Inference
//!
//! CSL types are coarser than item types, so importing infers the item type
//! from the CSL type plus the variables that only make sense for one of the
//! candidates:
//!
//! ```rust
//! use cslmap::{Converter, CslItem};
//!
//! let converter = Converter::new();
//! let csl = CslItem::from_json(r#"{"type": "book", "version": "2.1"}"#).unwrap();
//! assert_eq!(converter.infer_item_type(&csl).unwrap(), "computerProgram");
//! ```
//!
//! # Error Handling
//!
//! Structural problems (a record without `type`, an item type with no CSL
//! counterpart) are returned as [`ConversionError`]. Everything else degrades
//! gracefully and is reported as a [`Diagnostic`]:
//!
//! ```rust
//! use cslmap::{Converter, ConversionOptions, CslItem, Diagnostic};
//!
//! let converter = Converter::new();
//! let csl = CslItem::from_json(r#"{"type": "book", "author": [{}]}"#).unwrap();
//! let (item, diagnostics) = converter
//!     .from_csl_with_diagnostics(&csl, &ConversionOptions::default())
//!     .unwrap();
//! assert!(item.creators.is_empty());
//! assert!(matches!(diagnostics[0], Diagnostic::InvalidCreator { .. }));
//! ```
//!
//! # Thread Safety
//!
//! A [`Converter`] is immutable once built. Share it between threads by
//! reference or in an `Arc`; every conversion reads the tables and the
//! configured locale without synchronisation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod config;
pub mod csl;
pub mod date;
pub mod error;
pub mod mappings;
pub mod schema;
pub mod utils;

mod regex;

// Reexports
pub use config::{ConversionConfig, ConversionOptions, DateParser, Locale};
pub use csl::{Converter, CslDate, CslItem, CslName, CslNameMulti, StringOrNumber};
pub use date::{DateOrder, StructuredDate};
pub use error::{ConversionError, Diagnostic};
pub use mappings::{CslMappings, ForcedOp};
pub use schema::{FieldRegistry, Schema};

/// Per-field language overlay.
///
/// `main` names the language of a field's default value; `keys` holds
/// alternate values of that field keyed by language tag. Items key the
/// overlay by field name, CSL records by CSL variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiFields {
    #[serde(default)]
    pub main: BTreeMap<String, String>,
    #[serde(rename = "_keys", default)]
    pub keys: BTreeMap<String, BTreeMap<String, String>>,
}

impl MultiFields {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the overlay holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.keys.is_empty()
    }
}

/// A bibliographic item in the internal representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Caller-supplied identifier, copied to the CSL `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Item type tag, e.g. "book" or "film".
    pub item_type: String,
    /// Ordered creators. The first creator of the primary type is the first author.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
    /// Language overlay keyed by field name.
    #[serde(default, skip_serializing_if = "MultiFields::is_empty")]
    pub multi: MultiFields,
    /// Note body, for `note` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Related item identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,
    /// Field values keyed by field name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Item {
    /// Create an empty item of the given type.
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            ..Self::default()
        }
    }

    /// Get a field value, treating empty strings as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the preferred language of a field.
    pub fn set_main_language(
        &mut self,
        field: impl Into<String>,
        lang: impl Into<String>,
    ) -> &mut Self {
        self.multi.main.insert(field.into(), lang.into());
        self
    }

    /// Add an alternate value of a field in another language.
    pub fn set_field_variant(
        &mut self,
        field: impl Into<String>,
        lang: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.multi
            .keys
            .entry(field.into())
            .or_default()
            .insert(lang.into(), value.into());
        self
    }
}

/// A creator of an item.
///
/// A creator either carries the two-field form (`last_name`/`first_name`)
/// or the single-field `name` form. A creator with neither is invalid and
/// is dropped by the converters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Single-field ("literal") name, e.g. an institution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "CreatorMulti::is_empty")]
    pub multi: CreatorMulti,
}

impl Creator {
    /// Create a two-field creator.
    pub fn two_field(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        creator_type: impl Into<String>,
    ) -> Self {
        Self {
            last_name: Some(last_name.into()),
            first_name: Some(first_name.into()),
            creator_type: creator_type.into(),
            ..Self::default()
        }
    }

    /// Create a single-field creator.
    pub fn single_field(name: impl Into<String>, creator_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            creator_type: creator_type.into(),
            ..Self::default()
        }
    }

    /// True if the creator carries any name at all.
    pub fn has_name(&self) -> bool {
        has_any_name(self)
    }
}

/// Language variants of a creator's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorMulti {
    /// Language of the creator's default name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    /// Alternate names keyed by language tag.
    #[serde(rename = "_key", default)]
    pub key: BTreeMap<String, CreatorVariant>,
}

impl CreatorMulti {
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.key.is_empty()
    }
}

/// A creator's name in one alternate language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Name parts shared by [`Creator`] and [`CreatorVariant`].
pub(crate) trait NameParts {
    fn last_name(&self) -> Option<&str>;
    fn first_name(&self) -> Option<&str>;
    fn single_name(&self) -> Option<&str>;
}

impl NameParts for Creator {
    fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref().filter(|s| !s.is_empty())
    }
    fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref().filter(|s| !s.is_empty())
    }
    fn single_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}

impl NameParts for CreatorVariant {
    fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref().filter(|s| !s.is_empty())
    }
    fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref().filter(|s| !s.is_empty())
    }
    fn single_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}

pub(crate) fn has_any_name<N: NameParts>(name: &N) -> bool {
    name.last_name().is_some() || name.first_name().is_some() || name.single_name().is_some()
}
