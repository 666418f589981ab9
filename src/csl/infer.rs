//! Item type inference for imported CSL records.
//!
//! CSL types are coarser than item types. A handful of CSL types are shared
//! by several item types, which are told apart by variables that only make
//! sense for one of them. The rules below are evaluated top-down and the
//! first match wins; their order is part of the import behavior.

use super::CslItem;
use crate::error::{ConversionError, Diagnostic, Diagnostics};
use crate::mappings::CslMappings;
use crate::schema::FieldRegistry;

/// Variables that only a video recording carries.
const VIDEO_RECORDING_VARIABLES: &[&str] = &[
    "collection-title",
    "publisher-place",
    "event-place",
    "volume",
    "number-of-volumes",
    "ISBN",
];

/// Variables that mark a broadcast as a television broadcast.
const TV_BROADCAST_VARIABLES: &[&str] = &[
    "archive",
    "archive_location",
    "container-title",
    "event-place",
    "publisher",
    "publisher-place",
    "source",
];

/// Item type used when a CSL type is unknown and inference is lenient.
pub(crate) const FALLBACK_ITEM_TYPE: &str = "document";

/// One inference rule: when the record has `csl_type` and `applies` holds,
/// the item type is `item_type`.
struct TypeRule {
    csl_type: &'static str,
    applies: fn(&CslItem) -> bool,
    item_type: &'static str,
}

impl TypeRule {
    fn matches(&self, csl: &CslItem) -> bool {
        csl.csl_type() == Some(self.csl_type) && (self.applies)(csl)
    }
}

fn always(_: &CslItem) -> bool {
    true
}

fn has_any(csl: &CslItem, variables: &[&str]) -> bool {
    variables.iter().any(|variable| csl.has(variable))
}

fn genre_is(csl: &CslItem, genre: &str) -> bool {
    csl.field("genre") == Some(genre)
}

const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        csl_type: "book",
        applies: |csl| csl.has("version"),
        item_type: "computerProgram",
    },
    TypeRule {
        csl_type: "book",
        applies: always,
        item_type: "book",
    },
    TypeRule {
        csl_type: "motion_picture",
        applies: |csl| has_any(csl, VIDEO_RECORDING_VARIABLES),
        item_type: "videoRecording",
    },
    TypeRule {
        csl_type: "motion_picture",
        applies: always,
        item_type: "film",
    },
    TypeRule {
        csl_type: "personal_communication",
        applies: |csl| genre_is(csl, "email"),
        item_type: "email",
    },
    TypeRule {
        csl_type: "personal_communication",
        applies: |csl| genre_is(csl, "instant message"),
        item_type: "instantMessage",
    },
    TypeRule {
        csl_type: "personal_communication",
        applies: always,
        item_type: "letter",
    },
    TypeRule {
        csl_type: "broadcast",
        applies: |csl| genre_is(csl, "radio broadcast"),
        item_type: "radioBroadcast",
    },
    TypeRule {
        csl_type: "broadcast",
        applies: |csl| genre_is(csl, "podcast"),
        item_type: "podcast",
    },
    TypeRule {
        csl_type: "broadcast",
        applies: always,
        item_type: "tvBroadcast",
    },
    TypeRule {
        csl_type: "bill",
        applies: |csl| csl.has("publisher") || csl.has("number-of-volumes"),
        item_type: "hearing",
    },
    TypeRule {
        csl_type: "song",
        applies: |csl| csl.has("number"),
        item_type: "podcast",
    },
];

/// Applied after [`TYPE_RULES`] regardless of their outcome.
///
/// This can turn a `podcast` or `radioBroadcast` chosen by genre back into
/// `tvBroadcast`. Existing data depends on it.
const BROADCAST_OVERRIDE: TypeRule = TypeRule {
    csl_type: "broadcast",
    applies: |csl| has_any(csl, TV_BROADCAST_VARIABLES),
    item_type: "tvBroadcast",
};

/// Picks the item type for a CSL record.
///
/// Rule matches win over the type table; the first item type registered
/// for a CSL type is the table default. Unknown CSL types fall back to
/// `document`, or fail with [`ConversionError::UnknownType`] when `strict`.
pub(crate) fn infer_item_type<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    mappings: &CslMappings,
    registry: &R,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<String, ConversionError> {
    let csl_type = csl.csl_type().ok_or(ConversionError::MissingType)?;

    let mut inferred = TYPE_RULES
        .iter()
        .find(|rule| rule.matches(csl))
        .map(|rule| rule.item_type);
    if BROADCAST_OVERRIDE.matches(csl) {
        inferred = Some(BROADCAST_OVERRIDE.item_type);
    }
    if let Some(item_type) = inferred.filter(|t| registry.item_type_exists(t)) {
        return Ok(item_type.to_string());
    }

    if let Some(item_type) = mappings.item_types_for(csl_type).first() {
        return Ok(item_type.to_string());
    }

    if strict {
        return Err(ConversionError::UnknownType(csl_type.to_string()));
    }
    diagnostics.push(Diagnostic::TypeFallback {
        csl_type: csl_type.to_string(),
    });
    Ok(FALLBACK_ITEM_TYPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn infer(
        value: serde_json::Value,
        strict: bool,
    ) -> Result<(String, Vec<Diagnostic>), ConversionError> {
        let schema = Schema::builtin();
        let mappings = CslMappings::build(&schema);
        let csl: CslItem = serde_json::from_value(value).unwrap();
        let mut diagnostics = Diagnostics::new();
        let item_type = infer_item_type(&csl, &mappings, &schema, strict, &mut diagnostics)?;
        Ok((item_type, diagnostics.into_vec()))
    }

    #[rstest]
    #[case(json!({"type": "book", "version": "2.1"}), "computerProgram")]
    #[case(json!({"type": "book"}), "book")]
    #[case(json!({"type": "book", "version": ""}), "book")]
    #[case(json!({"type": "motion_picture", "ISBN": "978-0-00-000000-2"}), "videoRecording")]
    #[case(json!({"type": "motion_picture", "publisher-place": "London"}), "videoRecording")]
    #[case(json!({"type": "motion_picture"}), "film")]
    #[case(json!({"type": "personal_communication"}), "letter")]
    #[case(json!({"type": "personal_communication", "genre": "email"}), "email")]
    #[case(json!({"type": "personal_communication", "genre": "instant message"}), "instantMessage")]
    #[case(json!({"type": "broadcast"}), "tvBroadcast")]
    #[case(json!({"type": "broadcast", "genre": "radio broadcast"}), "radioBroadcast")]
    #[case(json!({"type": "broadcast", "genre": "podcast"}), "podcast")]
    #[case(json!({"type": "bill"}), "bill")]
    #[case(json!({"type": "bill", "publisher": "GPO"}), "hearing")]
    #[case(json!({"type": "bill", "number-of-volumes": "2"}), "hearing")]
    #[case(json!({"type": "song"}), "audioRecording")]
    #[case(json!({"type": "song", "number": "12"}), "podcast")]
    #[case(json!({"type": "article-journal"}), "journalArticle")]
    #[case(json!({"type": "article"}), "document")]
    #[case(json!({"type": "legal_case"}), "case")]
    fn test_infer_item_type(#[case] value: serde_json::Value, #[case] expected: &str) {
        let (item_type, diagnostics) = infer(value, false).unwrap();
        assert_eq!(item_type, expected);
        assert!(diagnostics.is_empty());
    }

    #[rstest]
    #[case(json!({"type": "broadcast", "genre": "podcast", "publisher": "NPR"}))]
    #[case(json!({
        "type": "broadcast",
        "genre": "radio broadcast",
        "container-title": "Morning Edition"
    }))]
    fn test_broadcast_override_wins_over_genre(#[case] value: serde_json::Value) {
        let (item_type, _) = infer(value, false).unwrap();
        assert_eq!(item_type, "tvBroadcast");
    }

    #[test]
    fn test_unknown_type_fallback() {
        let (item_type, diagnostics) = infer(json!({"type": "gizmo"}), false).unwrap();
        assert_eq!(item_type, "document");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::TypeFallback {
                csl_type: "gizmo".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_type_strict() {
        let result = infer(json!({"type": "gizmo"}), true);
        assert!(matches!(
            result,
            Err(ConversionError::UnknownType(t)) if t == "gizmo"
        ));
    }

    #[test]
    fn test_missing_type() {
        let result = infer(json!({"title": "Untyped"}), false);
        assert!(matches!(result, Err(ConversionError::MissingType)));
        let result = infer(json!({"type": ""}), false);
        assert!(matches!(result, Err(ConversionError::MissingType)));
    }
}
