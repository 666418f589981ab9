//! CSL-JSON to item conversion.

use super::infer::infer_item_type;
use super::portable::{PortablePayload, decode_note};
use super::{CslItem, CslName};
use crate::config::{ConversionConfig, ConversionOptions};
use crate::date::{DateImport, csl_to_date};
use crate::error::{ConversionError, Diagnostic, Diagnostics, fields};
use crate::mappings::CslMappings;
use crate::schema::FieldRegistry;
use crate::{Creator, CreatorMulti, CreatorVariant, Item};
use either::Either;
use itertools::Itertools;
use std::collections::HashSet;

/// Item types that never take the default jurisdiction.
const NO_DEFAULT_JURISDICTION: &[&str] = &["report", "newspaperArticle", "journalArticle"];

/// Converts a CSL record to an item.
pub(crate) fn csl_to_item<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    registry: &R,
    mappings: &CslMappings,
    config: &ConversionConfig,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Item, ConversionError> {
    let item_type = infer_item_type(
        csl,
        mappings,
        registry,
        config.strict_types(),
        diagnostics,
    )?;
    let mut item = Item::new(item_type);
    item.id = csl.id.clone();

    let mut portable = options
        .portable
        .then(|| csl.field("note").and_then(decode_note))
        .flatten();

    let (known, unknown): (Vec<&str>, Vec<&str>) =
        csl.variables().into_iter().partition_map(|variable| {
            if mappings.is_known_variable(variable) {
                Either::Left(variable)
            } else {
                Either::Right(variable)
            }
        });
    tracing::debug!(
        known = known.len(),
        unknown = unknown.len(),
        "classified CSL variables"
    );
    for variable in unknown {
        diagnostics.push(Diagnostic::UnknownField {
            field: variable.to_string(),
        });
    }

    import_text(csl, registry, mappings, portable.as_ref(), &mut item);
    apply_jurisdiction(csl, registry, config, &mut item);
    import_names(
        csl,
        registry,
        mappings,
        options,
        portable.as_mut().map(|(payload, _)| payload),
        &mut item,
        diagnostics,
    );
    import_dates(csl, registry, mappings, config, &mut item, diagnostics);

    if let Some((payload, _)) = portable {
        restore_portable(payload, registry, &mut item);
    }

    if options.include_relations
        && let Some(see_also) = &csl.see_also
    {
        item.see_also = see_also.clone();
    }

    Ok(item)
}

/// The item field a table candidate lands in: the type's alias of a base
/// field, else the candidate itself. `None` if not valid for the type.
pub(super) fn target_field<'a, R: FieldRegistry + ?Sized>(
    registry: &'a R,
    item_type: &str,
    candidate: &'a str,
) -> Option<&'a str> {
    let field = if registry.is_base_field(candidate) {
        registry
            .typed_field(item_type, candidate)
            .unwrap_or(candidate)
    } else {
        candidate
    };
    registry
        .is_valid_for_type(field, item_type)
        .then_some(field)
}

fn import_text<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    registry: &R,
    mappings: &CslMappings,
    portable: Option<&(PortablePayload, Option<String>)>,
    item: &mut Item,
) {
    for (variable, candidates) in mappings.text_mappings() {
        let value = match portable {
            Some((_, rest)) if variable == "note" => rest.as_deref(),
            _ => csl.field(variable),
        };
        let Some(value) = value else {
            continue;
        };
        let Some(field) = candidates
            .iter()
            .find_map(|candidate| target_field(registry, &item.item_type, candidate))
        else {
            continue;
        };

        item.set_field(field, value);
        if let Some(multi) = &csl.multi {
            if let Some(lang) = multi.main.get(variable) {
                item.set_main_language(field, lang.as_str());
            }
            for (lang, variant) in multi.keys.get(variable).into_iter().flatten() {
                item.set_field_variant(field, lang.as_str(), variant.as_str());
            }
        }
    }
}

fn apply_jurisdiction<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    registry: &R,
    config: &ConversionConfig,
    item: &mut Item,
) {
    if !registry.is_valid_for_type(fields::JURISDICTION, &item.item_type)
        || NO_DEFAULT_JURISDICTION.contains(&item.item_type.as_str())
    {
        return;
    }
    let jurisdiction = csl
        .field(fields::JURISDICTION)
        .unwrap_or_else(|| config.jurisdiction())
        .to_string();
    item.set_field(fields::JURISDICTION, jurisdiction);
}

fn import_names<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    registry: &R,
    mappings: &CslMappings,
    options: &ConversionOptions,
    mut payload: Option<&mut PortablePayload>,
    item: &mut Item,
    diagnostics: &mut Diagnostics,
) {
    let mut done = HashSet::new();
    for (creator_type, variable) in mappings.name_mappings() {
        // First creator type listed for a variable takes all its names
        if !done.insert(variable) {
            continue;
        }
        let names = csl.names(variable);
        if names.is_empty() {
            continue;
        }

        let creator_type = if registry.is_valid_creator_type(creator_type, &item.item_type) {
            creator_type
        } else if let Some(primary) = registry.primary_creator_type(&item.item_type) {
            // Primary creators are exported as authors
            if variable != "author" {
                diagnostics.push(Diagnostic::InvalidCreatorType {
                    creator_type: creator_type.to_string(),
                    item_type: item.item_type.clone(),
                });
            }
            primary
        } else {
            tracing::debug!(variable, item_type = %item.item_type, "item type takes no creators");
            continue;
        };

        for (index, name) in names.iter().enumerate() {
            let Some(mut creator) = name_to_creator(name, creator_type) else {
                diagnostics.push(Diagnostic::InvalidCreator {
                    variable: variable.to_string(),
                    index,
                });
                continue;
            };

            if options.repair_creators && creator.last_name.is_none() && creator.name.is_none() {
                creator.last_name = creator.first_name.take();
            }

            if let Some(multi) = &name.multi {
                creator.multi = CreatorMulti {
                    main: multi.main.clone(),
                    key: multi
                        .key
                        .iter()
                        .filter_map(|(lang, variant)| {
                            name_to_variant(variant).map(|v| (lang.clone(), v))
                        })
                        .collect(),
                };
            }
            let key = PortablePayload::creator_key(variable, index);
            if let Some(multi) = payload
                .as_deref_mut()
                .and_then(|p| p.multicreators.remove(&key))
            {
                creator.multi = multi;
            }

            item.creators.push(creator);
        }
    }
}

/// Builds a creator from a CSL name, folding particles and suffixes back
/// into the name parts. `None` if the name is empty.
fn name_to_creator(name: &CslName, creator_type: &str) -> Option<Creator> {
    let variant = name_to_variant(name)?;
    Some(Creator {
        last_name: variant.last_name,
        first_name: variant.first_name,
        name: variant.name,
        creator_type: creator_type.to_string(),
        multi: CreatorMulti::default(),
    })
}

fn name_to_variant(name: &CslName) -> Option<CreatorVariant> {
    let family = non_empty(name.family.as_deref());
    let given = non_empty(name.given.as_deref());
    if family.is_some() || given.is_some() {
        return Some(CreatorVariant {
            last_name: family.map(|family| join_family(name, family)),
            first_name: Some(join_given(name, given.unwrap_or_default()))
                .filter(|given| !given.is_empty()),
            name: None,
        });
    }
    non_empty(name.literal.as_deref()).map(|literal| CreatorVariant {
        name: Some(literal.to_string()),
        ..CreatorVariant::default()
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `non-dropping-particle` + `family`.
fn join_family(name: &CslName, family: &str) -> String {
    match non_empty(name.non_dropping_particle.as_deref()) {
        Some(particle) if particle.ends_with([' ', '-', '\'', '\u{2019}', '\u{02bb}']) => {
            format!("{}{}", particle, family)
        }
        Some(particle) => format!("{} {}", particle, family),
        None => family.to_string(),
    }
}

/// `given` + `dropping-particle` + `suffix`.
fn join_given(name: &CslName, given: &str) -> String {
    let mut joined = given.to_string();
    if let Some(particle) = non_empty(name.dropping_particle.as_deref()) {
        if name.comma_dropping_particle.as_deref() == Some(",") {
            joined.push(',');
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(particle);
    }
    if let Some(suffix) = non_empty(name.suffix.as_deref()) {
        if name.comma_suffix == Some(true) {
            joined.push_str(",! ");
        } else {
            joined.push_str(", ");
        }
        joined.push_str(suffix);
    }
    joined
}

fn import_dates<R: FieldRegistry + ?Sized>(
    csl: &CslItem,
    registry: &R,
    mappings: &CslMappings,
    config: &ConversionConfig,
    item: &mut Item,
    diagnostics: &mut Diagnostics,
) {
    let order = config.locale().date_order();
    for (variable, candidates) in mappings.date_mappings() {
        let Some(date) = csl.date(variable) else {
            continue;
        };
        let Some((candidate, field)) = candidates.iter().find_map(|candidate| {
            target_field(registry, &item.item_type, candidate)
                .map(|field| (candidate.as_str(), field))
        }) else {
            continue;
        };

        match csl_to_date(date, candidate == fields::ACCESS_DATE, order) {
            DateImport::Parsed(value) => {
                item.set_field(field, value);
            }
            DateImport::Literal(value) => {
                diagnostics.push(Diagnostic::UnparseableDate {
                    field: field.to_string(),
                    value: value.clone(),
                });
                item.set_field(field, value);
            }
            DateImport::Missing => diagnostics.push(Diagnostic::UnparseableDate {
                field: field.to_string(),
                value: String::new(),
            }),
        }
    }
}

fn restore_portable<R: FieldRegistry + ?Sized>(
    payload: PortablePayload,
    registry: &R,
    item: &mut Item,
) {
    for (field, value) in payload.extrafields {
        if registry.is_valid_for_type(&field, &item.item_type) && item.field(&field).is_none() {
            item.set_field(field, value);
        } else {
            tracing::debug!(field = %field, item_type = %item.item_type, "dropping portable field");
        }
    }
    item.multi.main.extend(payload.multifields.main);
    for (field, variants) in payload.multifields.keys {
        item.multi.keys.entry(field).or_default().extend(variants);
    }
}
