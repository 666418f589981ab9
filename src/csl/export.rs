//! Item to CSL-JSON conversion.

use super::extra::extra_to_csl;
use super::particles::parse_particles;
use super::portable::{PortablePayload, encode_note};
use super::{CslItem, CslName, CslNameMulti};
use crate::config::{ConversionConfig, ConversionOptions};
use crate::date::{date_to_csl, is_multipart, multipart_to_sql};
use crate::error::{ConversionError, Diagnostic, Diagnostics, fields};
use crate::mappings::{CslMappings, ForcedOp};
use crate::schema::FieldRegistry;
use crate::utils::{first_isbn, jurisdiction_code, note_to_title, strip_enclosing_quotes};
use crate::{Creator, Item, MultiFields, NameParts};
use compact_str::CompactString;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Item types that never export creators.
const CREATORLESS_TYPES: &[&str] = &["note", "attachment"];

/// Legacy name of `versionNumber`.
const LEGACY_VERSION_FIELD: &str = "version";

/// Converts an item to a CSL record.
pub(crate) fn item_to_csl<R: FieldRegistry + ?Sized>(
    item: &Item,
    registry: &R,
    mappings: &CslMappings,
    config: &ConversionConfig,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Result<CslItem, ConversionError> {
    let csl_type = mappings
        .csl_type(&item.item_type)
        .ok_or_else(|| ConversionError::UnmappableType(item.item_type.clone()))?;

    let item = if options.portable {
        Cow::Owned(normalize_dates(item, registry))
    } else {
        Cow::Borrowed(item)
    };

    let mut csl = CslItem::new(csl_type);
    csl.id = item.id.clone();
    let mut multi = MultiFields::new();
    let mut payload = PortablePayload::default();

    for (variable, candidates) in mappings.text_mappings() {
        // Written as title-short only
        if variable == "shortTitle" {
            continue;
        }
        let Some((candidate, field, value)) = find_value(&item, registry, candidates) else {
            continue;
        };

        let value = post_process(candidate, value, mappings);
        csl.set_field(variable, value);

        if !options.portable {
            if let Some(lang) = item.multi.main.get(&field) {
                multi.main.insert(variable.to_string(), lang.clone());
            }
            if let Some(variants) = item.multi.keys.get(&field) {
                multi.keys.insert(variable.to_string(), variants.clone());
            }
        }
    }

    if !CREATORLESS_TYPES.contains(&item.item_type.as_str()) {
        export_creators(
            &item,
            registry,
            mappings,
            options,
            &mut csl,
            &mut payload,
            diagnostics,
        );
    }

    for (variable, candidates) in mappings.date_mappings() {
        let Some((candidate, field, value)) = find_value(&item, registry, candidates) else {
            continue;
        };
        let accessed = candidate == fields::ACCESS_DATE;
        let date = date_to_csl(value, accessed, config);
        if date.date_parts.is_none() && date.raw.is_none() {
            diagnostics.push(Diagnostic::UnparseableDate {
                field: field.clone(),
                value: value.to_string(),
            });
        }
        csl.dates.insert(variable.to_string(), date);
    }

    apply_forced_ops(&mut csl, mappings.forced_ops(&item.item_type));

    if item.item_type == "note"
        && let Some(note) = item.note.as_deref().filter(|n| !n.is_empty())
    {
        csl.set_field(fields::TITLE, note_to_title(note));
    }

    if options.include_relations {
        csl.see_also = Some(item.see_also.clone());
    }

    if options.portable {
        payload.extrafields = uncarried_fields(&item, registry, mappings);
        payload.multifields = item.multi.clone();
        match encode_note(&payload, csl.field("note"))? {
            Some(note) => {
                csl.set_field("note", note);
            }
            None => {
                csl.fields.remove("note");
            }
        }
    } else if !multi.is_empty() {
        csl.multi = Some(multi);
    }

    Ok(csl)
}

/// Finds the value of a table field on the item.
///
/// The field itself counts when it is set and valid for the item type;
/// otherwise the item type's alias of it is tried. Returns the name of the
/// field the value was read from.
fn resolve_field<'a, R: FieldRegistry + ?Sized>(
    item: &'a Item,
    registry: &R,
    field: &str,
) -> Option<(String, &'a str)> {
    if registry.is_valid_for_type(field, &item.item_type)
        && let Some(value) = item.field(field)
    {
        return Some((field.to_string(), value));
    }
    if field == fields::VERSION_NUMBER
        && let Some(value) = item.field(LEGACY_VERSION_FIELD)
    {
        return Some((LEGACY_VERSION_FIELD.to_string(), value));
    }
    let typed = registry.typed_field(&item.item_type, field)?;
    let value = item.field(typed)?;
    Some((typed.to_string(), value))
}

/// The first table candidate with a value, as `(candidate, field read, value)`.
fn find_value<'a, 'c, R: FieldRegistry + ?Sized>(
    item: &'a Item,
    registry: &R,
    candidates: &'c [CompactString],
) -> Option<(&'c str, String, &'a str)> {
    candidates.iter().find_map(|candidate| {
        resolve_field(item, registry, candidate)
            .map(|(field, value)| (candidate.as_str(), field, value))
    })
}

fn post_process(field: &str, value: &str, mappings: &CslMappings) -> String {
    let value: Cow<str> = match field {
        "ISBN" => Cow::Borrowed(first_isbn(value).unwrap_or(value)),
        fields::JURISDICTION => Cow::Borrowed(jurisdiction_code(value)),
        fields::EXTRA => Cow::Owned(extra_to_csl(value, mappings)),
        _ => Cow::Borrowed(value),
    };
    strip_enclosing_quotes(&value).to_string()
}

fn export_creators<R: FieldRegistry + ?Sized>(
    item: &Item,
    registry: &R,
    mappings: &CslMappings,
    options: &ConversionOptions,
    csl: &mut CslItem,
    payload: &mut PortablePayload,
    diagnostics: &mut Diagnostics,
) {
    let primary = registry.primary_creator_type(&item.item_type);
    for (index, creator) in item.creators.iter().enumerate() {
        let variable = if Some(creator.creator_type.as_str()) == primary {
            "author"
        } else if let Some(variable) = mappings.name_variable(&creator.creator_type) {
            variable
        } else {
            diagnostics.push(Diagnostic::UnmappedCreatorType {
                creator_type: creator.creator_type.clone(),
                index,
            });
            continue;
        };
        let variable = if item.item_type == "videoRecording" {
            "director"
        } else {
            variable
        };

        if !creator.has_name() {
            diagnostics.push(Diagnostic::InvalidCreator {
                variable: variable.to_string(),
                index,
            });
            continue;
        }

        let mut name = creator_to_name(creator);
        if options.portable {
            if !creator.multi.is_empty() {
                let position = csl.names(variable).len();
                payload.multicreators.insert(
                    PortablePayload::creator_key(variable, position),
                    creator.multi.clone(),
                );
            }
        } else {
            name.multi = Some(name_multi(creator));
        }

        csl.names
            .entry(variable.to_string())
            .or_default()
            .push(name);
    }
}

/// Builds a CSL name from a creator or creator variant.
///
/// Both name parts make a family/given name with particles parsed; a last
/// name alone or a single-field name make a literal.
pub(crate) fn creator_to_name<N: NameParts>(creator: &N) -> CslName {
    match (creator.last_name(), creator.first_name()) {
        (Some(last), Some(first)) => {
            let mut name = CslName::personal(last, first);
            parse_particles(&mut name);
            name
        }
        (Some(last), None) => CslName::literal(last),
        (None, Some(first)) => CslName {
            given: Some(first.to_string()),
            ..CslName::default()
        },
        (None, None) => creator
            .single_name()
            .map(CslName::literal)
            .unwrap_or_default(),
    }
}

fn name_multi(creator: &Creator) -> CslNameMulti {
    CslNameMulti {
        main: creator.multi.main.clone(),
        key: creator
            .multi
            .key
            .iter()
            .map(|(lang, variant)| (lang.clone(), creator_to_name(variant)))
            .collect(),
    }
}

/// Applies per-type overrides, in order. Running the ops twice gives the
/// same record as running them once.
pub(crate) fn apply_forced_ops(csl: &mut CslItem, ops: &[ForcedOp]) {
    for op in ops {
        match *op {
            ForcedOp::Set { variable, value } => {
                csl.set_field(variable, value);
            }
            ForcedOp::Rename { from, to } => {
                if let Some(value) = csl.fields.remove(from) {
                    csl.fields.insert(to.to_string(), value);
                }
                if let Some(multi) = csl.multi.as_mut() {
                    if let Some(lang) = multi.main.remove(from) {
                        multi.main.insert(to.to_string(), lang);
                    }
                    if let Some(variants) = multi.keys.remove(from) {
                        multi.keys.insert(to.to_string(), variants);
                    }
                }
            }
        }
    }
}

/// Replaces multipart date values with their SQL part.
fn normalize_dates<R: FieldRegistry + ?Sized>(item: &Item, registry: &R) -> Item {
    let mut item = item.clone();
    for (field, value) in item.fields.iter_mut() {
        if registry.is_date_field(field) && is_multipart(value) {
            *value = multipart_to_sql(value).to_string();
        }
    }
    item
}

/// Set fields valid for the item type that no CSL variable carries.
fn uncarried_fields<R: FieldRegistry + ?Sized>(
    item: &Item,
    registry: &R,
    mappings: &CslMappings,
) -> BTreeMap<String, String> {
    item.fields
        .iter()
        .filter(|(field, value)| {
            !value.is_empty() && registry.is_valid_for_type(field, &item.item_type)
        })
        .filter(|(field, _)| {
            let base = registry
                .base_field(&item.item_type, field)
                .unwrap_or(field.as_str());
            mappings.variable_for_field(field).is_none()
                && mappings.variable_for_field(base).is_none()
        })
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}
