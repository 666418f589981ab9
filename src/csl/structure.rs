//! CSL-JSON record types.
//!
//! A CSL-JSON item is a flat object whose keys are variable names. The kind
//! of each variable (text, name list, date) is only implied by its value, so
//! [`CslItem`] classifies keys by shape on deserialization and keeps the three
//! kinds in separate maps.

use crate::MultiFields;
use crate::error::ConversionError;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys that mark a JSON object as a date variable.
const DATE_KEYS: &[&str] = &["date-parts", "literal", "raw", "season"];

/// A string or number value (CSL allows both for some fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    String(String),
    Number(i64),
}

impl StringOrNumber {
    /// Get the value as a string.
    pub fn as_string(&self) -> String {
        match self {
            StringOrNumber::String(s) => s.clone(),
            StringOrNumber::Number(n) => n.to_string(),
        }
    }

    /// Get the value as a number if possible.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            StringOrNumber::String(s) => s.trim().parse().ok(),
            StringOrNumber::Number(n) => Some(*n),
        }
    }
}

/// A name in CSL-JSON format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CslName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Institutional or otherwise unsplittable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    /// e.g. "van" in "Vincent van Gogh"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_dropping_particle: Option<String>,
    /// e.g. "de" in "Jean de La Fontaine"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropping_particle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Keep a comma before the suffix when rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comma_suffix: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comma_dropping_particle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi: Option<CslNameMulti>,
}

impl CslName {
    /// A family/given name.
    pub fn personal(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            given: Some(given.into()),
            ..Self::default()
        }
    }

    /// A literal name.
    pub fn literal(literal: impl Into<String>) -> Self {
        Self {
            literal: Some(literal.into()),
            ..Self::default()
        }
    }
}

/// Language variants of a CSL name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslNameMulti {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(rename = "_key", default)]
    pub key: BTreeMap<String, CslName>,
}

/// A date variable in CSL-JSON format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslDate {
    /// `[[year, month?, day?]]`, month 1-based. A second entry marks a range end.
    #[serde(
        rename = "date-parts",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_date_parts"
    )]
    pub date_parts: Option<Vec<Vec<i32>>>,
    /// Season name, or 1-4 for spring through winter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<StringOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl CslDate {
    pub fn from_parts(parts: Vec<i32>) -> Self {
        Self {
            date_parts: Some(vec![parts]),
            ..Self::default()
        }
    }

    pub fn from_literal(literal: impl Into<String>) -> Self {
        Self {
            literal: Some(literal.into()),
            ..Self::default()
        }
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// The start date's parts, if any.
    pub fn first_parts(&self) -> Option<&[i32]> {
        self.date_parts
            .as_ref()
            .and_then(|parts| parts.first())
            .map(Vec::as_slice)
    }

    /// The free-text form: `literal`, else `raw`.
    pub fn text(&self) -> Option<&str> {
        self.literal
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.raw.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatePartValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl DatePartValue {
    fn into_i32(self) -> Result<i32, String> {
        match self {
            DatePartValue::Int(n) => {
                i32::try_from(n).map_err(|_| format!("date part out of range: {}", n))
            }
            DatePartValue::Float(n)
                if n.is_finite() && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) =>
            {
                Ok(n.trunc() as i32)
            }
            DatePartValue::Float(n) => Err(format!("date part out of range: {}", n)),
            DatePartValue::Text(s) if s.trim().is_empty() => Ok(0),
            DatePartValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("invalid date part: {}", s)),
        }
    }
}

/// Accepts date parts given as integers or numeric strings.
fn deserialize_date_parts<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<i32>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Vec<DatePartValue>>> = Option::deserialize(deserializer)?;
    raw.map(|outer| {
        outer
            .into_iter()
            .map(|inner| {
                inner
                    .into_iter()
                    .map(DatePartValue::into_i32)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()
    })
    .transpose()
    .map_err(D::Error::custom)
}

/// A CSL-JSON item.
///
/// # Examples
///
/// ```
/// use cslmap::CslItem;
///
/// let item = CslItem::from_json(
///     r#"{"id": 7, "type": "book", "title": "Dune", "volume": 1,
///         "author": [{"family": "Herbert", "given": "Frank"}],
///         "issued": {"date-parts": [["1965"]]}}"#,
/// )
/// .unwrap();
/// assert_eq!(item.id.as_deref(), Some("7"));
/// assert_eq!(item.field("volume"), Some("1"));
/// assert_eq!(item.names("author")[0].family.as_deref(), Some("Herbert"));
/// assert_eq!(item.date("issued").unwrap().first_parts(), Some(&[1965][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CslItem {
    pub id: Option<String>,
    pub csl_type: Option<String>,
    /// Text variables.
    pub fields: BTreeMap<String, String>,
    /// Name variables.
    pub names: BTreeMap<String, Vec<CslName>>,
    /// Date variables.
    pub dates: BTreeMap<String, CslDate>,
    /// Language overlay keyed by variable name.
    pub multi: Option<MultiFields>,
    pub see_also: Option<Vec<String>>,
}

impl CslItem {
    pub fn new(csl_type: impl Into<String>) -> Self {
        Self {
            csl_type: Some(csl_type.into()),
            ..Self::default()
        }
    }

    pub fn csl_type(&self) -> Option<&str> {
        self.csl_type.as_deref().filter(|s| !s.is_empty())
    }

    /// Get a text variable, treating empty strings as absent.
    pub fn field(&self, variable: &str) -> Option<&str> {
        self.fields
            .get(variable)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set_field(
        &mut self,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.fields.insert(variable.into(), value.into());
        self
    }

    /// Names of a name variable; empty if absent.
    pub fn names(&self, variable: &str) -> &[CslName] {
        self.names
            .get(variable)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn date(&self, variable: &str) -> Option<&CslDate> {
        self.dates.get(variable)
    }

    /// Whether the variable carries a value of any kind.
    pub fn has(&self, variable: &str) -> bool {
        self.field(variable).is_some()
            || self.names.contains_key(variable)
            || self.dates.contains_key(variable)
    }

    /// Variable names of every kind, sorted.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables: Vec<&str> = self
            .fields
            .keys()
            .chain(self.names.keys())
            .chain(self.dates.keys())
            .map(String::as_str)
            .collect();
        variables.sort_unstable();
        variables
    }

    /// Parses a CSL-JSON object.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the item as a CSL-JSON object.
    pub fn to_json(&self) -> Result<String, ConversionError> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, String> {
        let mut item = CslItem::default();
        for (key, value) in map {
            match (key.as_str(), value) {
                (_, Value::Null) => {}
                ("id", Value::String(s)) => item.id = Some(s),
                ("id", Value::Number(n)) => item.id = Some(n.to_string()),
                ("id", _) => return Err("expected string or number for id".to_string()),
                ("type", Value::String(s)) => item.csl_type = Some(s),
                ("type", _) => return Err("expected string for type".to_string()),
                ("multi", value) => {
                    item.multi = Some(serde_json::from_value(value).map_err(|e| e.to_string())?)
                }
                ("seeAlso", value) => {
                    item.see_also = Some(serde_json::from_value(value).map_err(|e| e.to_string())?)
                }
                (_, Value::String(s)) => {
                    item.fields.insert(key, s);
                }
                (_, Value::Number(n)) => {
                    item.fields.insert(key, n.to_string());
                }
                (_, Value::Array(values)) => {
                    match serde_json::from_value::<Vec<CslName>>(Value::Array(values)) {
                        Ok(names) => {
                            item.names.insert(key, names);
                        }
                        Err(e) => {
                            tracing::debug!(variable = %key, error = %e, "skipping non-name array")
                        }
                    }
                }
                (_, Value::Object(object)) if DATE_KEYS.iter().any(|k| object.contains_key(*k)) => {
                    match serde_json::from_value::<CslDate>(Value::Object(object)) {
                        Ok(date) => {
                            item.dates.insert(key, date);
                        }
                        Err(e) => {
                            tracing::debug!(variable = %key, error = %e, "skipping malformed date")
                        }
                    }
                }
                (_, _) => tracing::debug!(variable = %key, "skipping unclassifiable variable"),
            }
        }
        Ok(item)
    }
}

impl Serialize for CslItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(csl_type) = &self.csl_type {
            map.serialize_entry("type", csl_type)?;
        }
        for (variable, value) in &self.fields {
            map.serialize_entry(variable, value)?;
        }
        for (variable, names) in &self.names {
            map.serialize_entry(variable, names)?;
        }
        for (variable, date) in &self.dates {
            map.serialize_entry(variable, date)?;
        }
        if let Some(multi) = &self.multi {
            map.serialize_entry("multi", multi)?;
        }
        if let Some(see_also) = &self.see_also {
            map.serialize_entry("seeAlso", see_also)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CslItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        CslItem::from_map(map).map_err(D::Error::custom)
    }
}
