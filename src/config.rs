//! Conversion configuration.
//!
//! [`ConversionConfig`] holds the settings that stay fixed for the lifetime
//! of a [`Converter`](crate::Converter): locale, jurisdiction defaults, date
//! parser selection and type-inference strictness. [`ConversionOptions`]
//! holds the per-call switches.

use crate::date::DateOrder;
use chrono::{FixedOffset, Offset, Utc};
use compact_str::CompactString;

/// Regions whose free-text dates put the month before the day.
pub(crate) const MONTH_FIRST_REGIONS: &[&str] = &["US", "FM", "PW", "PH"];

/// A locale tag such as `en-US` or `de_AT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: CompactString,
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en-US")
    }
}

impl Locale {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: CompactString::from(tag),
        }
    }

    /// The full locale tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The region subtag, upper-cased. Empty for a tag without a region;
    /// `US` for an empty tag.
    pub fn region(&self) -> CompactString {
        if self.tag.is_empty() {
            return CompactString::const_new("US");
        }
        match self.tag.split_once(['-', '_']) {
            Some((_, region)) => {
                let region = region.split(['-', '_']).next().unwrap_or(region);
                CompactString::from(region.to_uppercase())
            }
            None => CompactString::default(),
        }
    }

    /// Order of day and month for ambiguous numeric dates in this locale.
    pub fn date_order(&self) -> DateOrder {
        if MONTH_FIRST_REGIONS.contains(&self.region().as_str()) {
            DateOrder::MonthDay
        } else {
            DateOrder::DayMonth
        }
    }
}

/// Date array parser used on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateParser {
    /// Structured date parser: free-text parts become `season` strings.
    #[default]
    Native,
    /// Array parser compatible with citeproc processors: season words become numbers.
    Citeproc,
}

/// Settings shared by every conversion made through one converter.
///
/// # Examples
///
/// ```
/// use cslmap::ConversionConfig;
///
/// let mut config = ConversionConfig::new();
/// config.set_locale("en-GB").set_jurisdiction_default("gb");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub(crate) locale: Locale,
    pub(crate) jurisdiction_default: Option<String>,
    pub(crate) jurisdiction_fallback: Option<String>,
    pub(crate) date_parser: DateParser,
    pub(crate) strict_types: bool,
    pub(crate) utc_offset: FixedOffset,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionConfig {
    /// Fallback jurisdiction when neither default nor fallback is configured.
    pub const JURISDICTION: &'static str = "us";

    #[must_use]
    pub fn new() -> Self {
        Self {
            locale: Locale::default(),
            jurisdiction_default: None,
            jurisdiction_fallback: None,
            date_parser: DateParser::Native,
            strict_types: false,
            utc_offset: Utc.fix(),
        }
    }

    /// Sets the locale used to order ambiguous dates
    pub fn set_locale(&mut self, tag: &str) -> &mut Self {
        self.locale = Locale::new(tag);
        self
    }

    /// Sets the jurisdiction written to imported items that lack one
    pub fn set_jurisdiction_default(&mut self, jurisdiction: &str) -> &mut Self {
        self.jurisdiction_default = Some(jurisdiction.to_string());
        self
    }

    /// Sets the jurisdiction used when no default is configured
    pub fn set_jurisdiction_fallback(&mut self, jurisdiction: &str) -> &mut Self {
        self.jurisdiction_fallback = Some(jurisdiction.to_string());
        self
    }

    /// Selects the date array parser used on export
    pub fn set_date_parser(&mut self, parser: DateParser) -> &mut Self {
        self.date_parser = parser;
        self
    }

    /// Sets whether unknown CSL types fail instead of falling back to `document`
    pub fn set_strict_types(&mut self, strict: bool) -> &mut Self {
        self.strict_types = strict;
        self
    }

    /// Sets the local time zone used to render access dates
    pub fn set_utc_offset(&mut self, offset: FixedOffset) -> &mut Self {
        self.utc_offset = offset;
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn date_parser(&self) -> DateParser {
        self.date_parser
    }

    pub fn strict_types(&self) -> bool {
        self.strict_types
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Jurisdiction for imported items: default, then fallback, then `us`.
    pub fn jurisdiction(&self) -> &str {
        self.jurisdiction_default
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.jurisdiction_fallback
                    .as_deref()
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or(Self::JURISDICTION)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        let tag = self.locale.tag();
        if tag.is_empty() {
            return Err("Locale tag cannot be empty".to_string());
        }
        let valid = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if !tag.chars().all(valid) {
            return Err(format!("Invalid locale tag '{}'", tag));
        }

        for (name, value) in [
            ("default", &self.jurisdiction_default),
            ("fallback", &self.jurisdiction_fallback),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(format!("Jurisdiction {} cannot be blank", name));
            }
        }

        Ok(())
    }
}

/// Per-call conversion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Carry data CSL cannot hold in an encoded header of `note` (`extra`).
    pub portable: bool,
    /// Copy `seeAlso` relations on export.
    pub include_relations: bool,
    /// On import, promote given-only creators to family names.
    pub repair_creators: bool,
}

impl ConversionOptions {
    /// Portable transport: encode on export, decode and repair creators on import.
    pub fn portable() -> Self {
        Self {
            portable: true,
            include_relations: false,
            repair_creators: true,
        }
    }
}
