//! Conversion between items and CSL-JSON.
//!
//! [`Converter`] is the entry point. It owns a field registry, the
//! correspondence tables built from it and the conversion settings, and
//! exposes export ([`Converter::to_csl`]), import ([`Converter::from_csl`])
//! and type inference.
//!
//! # Example
//!
//! ```
//! use cslmap::{Converter, ConversionOptions, Creator, Item};
//!
//! let converter = Converter::new();
//!
//! let mut item = Item::new("film");
//! item.set_field("title", "Stalker");
//! item.creators.push(Creator::two_field("Tarkovsky", "Andrei", "director"));
//!
//! let csl = converter.to_csl(&item, &ConversionOptions::default()).unwrap();
//! assert_eq!(csl.csl_type(), Some("motion_picture"));
//! assert_eq!(csl.names("author")[0].family.as_deref(), Some("Tarkovsky"));
//!
//! let back = converter.from_csl(&csl, &ConversionOptions::default()).unwrap();
//! assert_eq!(back.item_type, "film");
//! assert_eq!(back.creators[0].creator_type, "director");
//! ```

mod export;
mod extra;
mod import;
mod infer;
mod particles;
pub mod portable;
mod structure;

use crate::config::{ConversionConfig, ConversionOptions};
use crate::error::{ConversionError, Diagnostic, Diagnostics};
use crate::mappings::CslMappings;
use crate::schema::{FieldRegistry, Schema};
use crate::{Creator, Item};
use std::collections::BTreeSet;

pub use extra::extra_to_csl;
pub use particles::parse_particles;
pub use structure::{CslDate, CslItem, CslName, CslNameMulti, StringOrNumber};

/// Converts items to and from CSL-JSON.
///
/// The converter is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Converter<R: FieldRegistry = Schema> {
    registry: R,
    mappings: CslMappings,
    config: ConversionConfig,
}

impl Converter<Schema> {
    /// Creates a converter over the built-in schema with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use cslmap::Converter;
    /// let converter = Converter::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ConversionConfig::default())
    }

    /// Creates a converter over the built-in schema.
    #[must_use]
    pub fn with_config(config: ConversionConfig) -> Self {
        Self::with_registry(Schema::builtin(), config)
    }
}

impl Default for Converter<Schema> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FieldRegistry> Converter<R> {
    /// Creates a converter over a custom registry.
    ///
    /// The correspondence tables are built here; entries naming fields or
    /// item types the registry does not know are dropped.
    pub fn with_registry(registry: R, config: ConversionConfig) -> Self {
        let mappings = CslMappings::build(&registry);
        Self {
            registry,
            mappings,
            config,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn mappings(&self) -> &CslMappings {
        &self.mappings
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Converts an item to a CSL record.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnmappableType`] if the item type has no
    /// CSL type.
    pub fn to_csl(
        &self,
        item: &Item,
        options: &ConversionOptions,
    ) -> Result<CslItem, ConversionError> {
        self.to_csl_with_diagnostics(item, options)
            .map(|(csl, _)| csl)
    }

    /// Converts an item to a CSL record, also returning what was dropped or
    /// stored literally along the way.
    ///
    /// # Errors
    ///
    /// See [`Converter::to_csl`].
    pub fn to_csl_with_diagnostics(
        &self,
        item: &Item,
        options: &ConversionOptions,
    ) -> Result<(CslItem, Vec<Diagnostic>), ConversionError> {
        let mut diagnostics = Diagnostics::new();
        let csl = export::item_to_csl(
            item,
            &self.registry,
            &self.mappings,
            &self.config,
            options,
            &mut diagnostics,
        )?;
        Ok((csl, diagnostics.into_vec()))
    }

    /// Converts a CSL record to an item.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingType`] if the record has no `type`,
    /// and [`ConversionError::UnknownType`] for an unknown type when strict
    /// type inference is configured.
    pub fn from_csl(
        &self,
        csl: &CslItem,
        options: &ConversionOptions,
    ) -> Result<Item, ConversionError> {
        self.from_csl_with_diagnostics(csl, options)
            .map(|(item, _)| item)
    }

    /// Converts a CSL record to an item, also returning what was dropped or
    /// stored literally along the way.
    ///
    /// # Errors
    ///
    /// See [`Converter::from_csl`].
    pub fn from_csl_with_diagnostics(
        &self,
        csl: &CslItem,
        options: &ConversionOptions,
    ) -> Result<(Item, Vec<Diagnostic>), ConversionError> {
        let mut diagnostics = Diagnostics::new();
        let item = import::csl_to_item(
            csl,
            &self.registry,
            &self.mappings,
            &self.config,
            options,
            &mut diagnostics,
        )?;
        Ok((item, diagnostics.into_vec()))
    }

    /// Picks the item type a CSL record imports as.
    ///
    /// # Errors
    ///
    /// See [`Converter::from_csl`].
    pub fn infer_item_type(&self, csl: &CslItem) -> Result<String, ConversionError> {
        let mut diagnostics = Diagnostics::new();
        infer::infer_item_type(
            csl,
            &self.mappings,
            &self.registry,
            self.config.strict_types(),
            &mut diagnostics,
        )
    }

    /// The creator shown first for an item: the first creator of the
    /// primary type (or `author`), else the first editor.
    ///
    /// # Examples
    ///
    /// ```
    /// use cslmap::{Converter, Creator, Item};
    ///
    /// let mut item = Item::new("film");
    /// item.creators.push(Creator::two_field("Rossellini", "Isabella", "castMember"));
    /// item.creators.push(Creator::two_field("Lynch", "David", "director"));
    ///
    /// let converter = Converter::new();
    /// assert_eq!(converter.first_creator(&item).unwrap().last_name.as_deref(), Some("Lynch"));
    /// ```
    pub fn first_creator<'a>(&self, item: &'a Item) -> Option<&'a Creator> {
        let primary = self.registry.primary_creator_type(&item.item_type);
        item.creators
            .iter()
            .find(|c| Some(c.creator_type.as_str()) == primary || c.creator_type == "author")
            .or_else(|| item.creators.iter().find(|c| c.creator_type == "editor"))
    }

    /// CSL text and date variables that have a field on the item type the
    /// record imports as. Empty if the type cannot be inferred.
    pub fn valid_csl_fields(&self, csl: &CslItem) -> BTreeSet<String> {
        let item_type = match self.infer_item_type(csl) {
            Ok(item_type) => item_type,
            Err(e) => {
                tracing::debug!(error = %e, "no item type for CSL record");
                return BTreeSet::new();
            }
        };
        self.mappings
            .text_mappings()
            .chain(self.mappings.date_mappings())
            .filter(|(_, candidates)| {
                candidates
                    .iter()
                    .any(|c| import::target_field(&self.registry, &item_type, c).is_some())
            })
            .map(|(variable, _)| variable.to_string())
            .collect()
    }

    /// Parses a CSL-JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Json`] if the input is not a CSL-JSON object.
    pub fn csl_from_json(&self, json: &str) -> Result<CslItem, ConversionError> {
        CslItem::from_json(json)
    }

    /// Renders a CSL record as CSL-JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Json`] if serialization fails.
    pub fn csl_to_json(&self, csl: &CslItem) -> Result<String, ConversionError> {
        csl.to_json()
    }
}
