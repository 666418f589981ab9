//! Portable mode: carry what CSL cannot hold through the `note` variable.
//!
//! Language overlays of fields and creators, and fields with no CSL
//! counterpart, are serialized into a header line at the top of `note`:
//!
//! ```text
//! mlzsync1:0042{"extrafields":{"history":"Revised 2019"}}
//! original extra text
//! ```
//!
//! The four digits give the byte length of the JSON that follows.

use crate::{CreatorMulti, MultiFields};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of a portable header line.
pub const HEADER_PREFIX: &str = "mlzsync1:";

/// Data carried by a portable header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortablePayload {
    /// Field values no CSL variable carries, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extrafields: BTreeMap<String, String>,
    /// Field language overlay, keyed by field name.
    #[serde(default, skip_serializing_if = "MultiFields::is_empty")]
    pub multifields: MultiFields,
    /// Creator language overlays, keyed by [`PortablePayload::creator_key`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multicreators: BTreeMap<String, CreatorMulti>,
}

impl PortablePayload {
    pub fn is_empty(&self) -> bool {
        self.extrafields.is_empty() && self.multifields.is_empty() && self.multicreators.is_empty()
    }

    /// Key of the `index`th name of a CSL name variable.
    pub fn creator_key(variable: &str, index: usize) -> String {
        format!("{}:{}", variable, index)
    }
}

/// Prepends a header for `payload` to `note`.
///
/// Returns `note` unchanged when the payload is empty.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn encode_note(
    payload: &PortablePayload,
    note: Option<&str>,
) -> Result<Option<String>, serde_json::Error> {
    if payload.is_empty() {
        return Ok(note.map(str::to_string));
    }
    let json = serde_json::to_string(payload)?;
    let mut encoded = format!("{}{:04}{}", HEADER_PREFIX, json.len(), json);
    if let Some(note) = note.filter(|n| !n.is_empty()) {
        encoded.push('\n');
        encoded.push_str(note);
    }
    Ok(Some(encoded))
}

/// Splits a leading header off `note`.
///
/// Returns the payload and what remains of the note (`None` if nothing
/// does). Returns `None` when there is no header or it is malformed.
///
/// # Examples
///
/// ```
/// use cslmap::csl::portable::{decode_note, encode_note, PortablePayload};
///
/// let mut payload = PortablePayload::default();
/// payload.extrafields.insert("history".to_string(), "Revised".to_string());
///
/// let note = encode_note(&payload, Some("Read twice")).unwrap().unwrap();
/// let (decoded, rest) = decode_note(&note).unwrap();
/// assert_eq!(decoded, payload);
/// assert_eq!(rest.as_deref(), Some("Read twice"));
/// ```
pub fn decode_note(note: &str) -> Option<(PortablePayload, Option<String>)> {
    let rest = note.strip_prefix(HEADER_PREFIX)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits < 4 {
        tracing::debug!("portable header without length");
        return None;
    }
    let len: usize = rest[..digits].parse().ok()?;
    let end = digits.checked_add(len)?;
    let json = rest.get(digits..end)?;
    let payload = match serde_json::from_str(json) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "malformed portable header");
            return None;
        }
    };

    let remainder = &rest[end..];
    let remainder = remainder.strip_prefix('\n').unwrap_or(remainder);
    let remainder = (!remainder.is_empty()).then(|| remainder.to_string());
    Some((payload, remainder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreatorVariant;
    use pretty_assertions::assert_eq;

    fn payload() -> PortablePayload {
        let mut payload = PortablePayload::default();
        payload
            .extrafields
            .insert("history".to_string(), "Revised 2019".to_string());
        payload
            .multifields
            .main
            .insert("title".to_string(), "ja".to_string());
        payload.multicreators.insert(
            PortablePayload::creator_key("author", 0),
            CreatorMulti {
                main: Some("ja".to_string()),
                key: BTreeMap::from([(
                    "en".to_string(),
                    CreatorVariant {
                        last_name: Some("Natsume".to_string()),
                        first_name: Some("Soseki".to_string()),
                        name: None,
                    },
                )]),
            },
        );
        payload
    }

    #[test]
    fn test_header_layout() {
        let mut payload = PortablePayload::default();
        payload.extrafields.insert("a".to_string(), "b".to_string());
        let note = encode_note(&payload, None).unwrap().unwrap();
        assert_eq!(note, r#"mlzsync1:0025{"extrafields":{"a":"b"}}"#);
    }

    #[test]
    fn test_roundtrip_with_note() {
        let note = encode_note(&payload(), Some("line one\nline two"))
            .unwrap()
            .unwrap();
        let (decoded, rest) = decode_note(&note).unwrap();
        assert_eq!(decoded, payload());
        assert_eq!(rest.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_roundtrip_without_note() {
        let note = encode_note(&payload(), Some("")).unwrap().unwrap();
        let (decoded, rest) = decode_note(&note).unwrap();
        assert_eq!(decoded, payload());
        assert_eq!(rest, None);
    }

    #[test]
    fn test_empty_payload_leaves_note() {
        let note = encode_note(&PortablePayload::default(), Some("plain")).unwrap();
        assert_eq!(note.as_deref(), Some("plain"));
        let note = encode_note(&PortablePayload::default(), None).unwrap();
        assert_eq!(note, None);
    }

    #[test]
    fn test_malformed_headers_ignored() {
        assert_eq!(decode_note("plain note"), None);
        assert_eq!(decode_note("mlzsync1:{}"), None);
        assert_eq!(decode_note("mlzsync1:0099{}"), None);
        assert_eq!(decode_note("mlzsync1:0004null"), None);
        assert_eq!(decode_note("mlzsync1:18446744073709551615{}"), None);
        assert_eq!(decode_note("mlzsync1:99999999999999999999999{}"), None);
    }
}
