//! Name particle parsing.
//!
//! Splits lowercase particles ("van der", "de") and suffixes ("Jr.") out of
//! the family and given parts of a CSL name.

use super::CslName;
use crate::regex::Regex;
use std::sync::LazyLock;

/// Leading particle run in a family name.
static FAMILY_PARTICLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^ ]+(?:-|\x{02bb}|\x{2019}| |') *)(.+)$").unwrap());

/// Leading particle run in a *reversed* given name.
static GIVEN_PARTICLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^ ]+(?:\x{02bb} |\x{2019} | |' ) *)(.+)$").unwrap());

static SUFFIX_COMMA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,!*\s*").unwrap());

const PARTICLE_SEPARATORS: &[char] = &['-', '\'', '\u{02bb}', '\u{2019}'];

/// Extracts particles and suffixes from a name, in place.
///
/// - Leading lowercase words of `family` become `non-dropping-particle`.
/// - Text after a comma in `given` becomes `suffix`, or a
///   `dropping-particle` if it reads "et al". `,!` sets `comma-suffix`.
/// - Trailing lowercase words of `given` become `dropping-particle`.
///
/// A `family` wrapped in double quotes is unquoted and nothing else is
/// parsed. Names lacking either part are left alone.
///
/// # Examples
///
/// ```
/// use cslmap::CslName;
/// use cslmap::csl::parse_particles;
///
/// let mut name = CslName::personal("van Gogh", "Vincent");
/// parse_particles(&mut name);
/// assert_eq!(name.family.as_deref(), Some("Gogh"));
/// assert_eq!(name.non_dropping_particle.as_deref(), Some("van"));
///
/// let mut name = CslName::personal("King", "Martin Luther, Jr.");
/// parse_particles(&mut name);
/// assert_eq!(name.given.as_deref(), Some("Martin Luther"));
/// assert_eq!(name.suffix.as_deref(), Some("Jr."));
/// ```
pub fn parse_particles(name: &mut CslName) {
    let (Some(family), Some(given)) = (name.family.as_deref(), name.given.as_deref()) else {
        return;
    };
    if family.is_empty() || given.is_empty() {
        return;
    }

    if family.chars().count() > 1 && family.starts_with('"') && family.ends_with('"') {
        name.family = Some(family[1..family.len() - 1].to_string());
        return;
    }

    let (family, particles) = split_family_particles(family);
    name.family = Some(family);
    let particle = trim_last(&particles.concat());
    if !particle.is_empty() {
        name.non_dropping_particle = Some(particle);
    }

    parse_suffix(name);

    if let Some(given) = name.given.as_deref() {
        let (given, particles) = split_given_particles(given);
        name.given = Some(given);
        let particle = particles.concat().trim().to_string();
        if !particle.is_empty() {
            name.dropping_particle = Some(particle);
        }
    }
}

/// Whether a matched run starts (after separators) with a lowercase letter.
fn is_particle(run: &str) -> bool {
    run.chars()
        .find(|c| !c.is_whitespace() && !PARTICLE_SEPARATORS.contains(c))
        .is_some_and(char::is_lowercase)
}

fn split_family_particles(value: &str) -> (String, Vec<String>) {
    let mut rest = value;
    let mut particles = Vec::new();
    while let Some(caps) = FAMILY_PARTICLE_REGEX.captures(rest) {
        let run = &caps[1];
        if !is_particle(run) {
            break;
        }
        particles.push(run.to_string());
        rest = &rest[run.len()..];
    }
    (rest.to_string(), particles)
}

fn split_given_particles(value: &str) -> (String, Vec<String>) {
    let mut rest = value;
    let mut particles = Vec::new();
    loop {
        let reversed: String = rest.chars().rev().collect();
        let Some(caps) = GIVEN_PARTICLE_REGEX.captures(&reversed) else {
            break;
        };
        let run_len = caps[1].len();
        let split = rest.len() - run_len;
        let run = &rest[split..];
        if !is_particle(run) {
            break;
        }
        particles.push(run.to_string());
        rest = &rest[..split];
    }

    // Particles were collected back to front
    particles.reverse();
    for i in 1..particles.len() {
        if particles[i].starts_with(' ') {
            particles[i - 1].push(' ');
        }
    }
    for particle in particles.iter_mut() {
        if let Some(stripped) = particle.strip_prefix(' ') {
            *particle = stripped.to_string();
        }
    }
    (rest.to_string(), particles)
}

/// Trims a particle run, keeping a trailing space after an apostrophe.
fn trim_last(value: &str) -> String {
    let mut trimmed = value.trim().to_string();
    if value.ends_with(' ') && (trimmed.ends_with('\'') || trimmed.ends_with('\u{2019}')) {
        trimmed.push(' ');
    }
    trimmed
}

fn parse_suffix(name: &mut CslName) {
    if name.suffix.is_some() {
        return;
    }
    let Some(given) = name.given.as_deref() else {
        return;
    };
    let Some(comma) = SUFFIX_COMMA_REGEX.find(given) else {
        return;
    };

    let suffix = &given[comma.end()..];
    let comma_marks: String = comma
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if suffix.replace('.', "") == "et al" && name.dropping_particle.is_none() {
        name.dropping_particle = Some(suffix.to_string());
        name.comma_dropping_particle = Some(",".to_string());
    } else {
        if comma_marks.chars().count() == 2 {
            name.comma_suffix = Some(true);
        }
        if !suffix.is_empty() {
            name.suffix = Some(suffix.to_string());
        }
    }
    name.given = Some(given[..comma.start()].to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parsed(family: &str, given: &str) -> CslName {
        let mut name = CslName::personal(family, given);
        parse_particles(&mut name);
        name
    }

    #[rstest]
    #[case("de la Cruz", "Juan", "Cruz", Some("de la"))]
    #[case("van der Berg", "Jan", "Berg", Some("van der"))]
    #[case("d'Alembert", "Jean", "Alembert", Some("d'"))]
    #[case("d\u{2019}Artagnan", "Charles", "Artagnan", Some("d\u{2019}"))]
    #[case("al-Khwarizmi", "Muhammad", "Khwarizmi", Some("al-"))]
    #[case("ka\u{02bb}Ohana", "Lani", "Ohana", Some("ka\u{02bb}"))]
    #[case("Smith-Jones", "Anna", "Smith-Jones", None)]
    #[case("Van Buren", "Martin", "Van Buren", None)]
    #[case("Cruz", "Juan", "Cruz", None)]
    fn test_non_dropping_particle(
        #[case] family: &str,
        #[case] given: &str,
        #[case] expected_family: &str,
        #[case] expected_particle: Option<&str>,
    ) {
        let name = parsed(family, given);
        assert_eq!(name.family.as_deref(), Some(expected_family));
        assert_eq!(name.non_dropping_particle.as_deref(), expected_particle);
    }

    #[test]
    fn test_apostrophe_space_particle_kept() {
        let name = parsed("d' Souza", "Maria");
        assert_eq!(name.family.as_deref(), Some("Souza"));
        assert_eq!(name.non_dropping_particle.as_deref(), Some("d' "));
    }

    #[rstest]
    #[case("Jean de", "Jean", Some("de"))]
    #[case("Ludwig van der", "Ludwig", Some("van der"))]
    #[case("Mary Ann", "Mary Ann", None)]
    fn test_dropping_particle(
        #[case] given: &str,
        #[case] expected_given: &str,
        #[case] expected_particle: Option<&str>,
    ) {
        let name = parsed("Fontaine", given);
        assert_eq!(name.given.as_deref(), Some(expected_given));
        assert_eq!(name.dropping_particle.as_deref(), expected_particle);
    }

    #[test]
    fn test_suffix() {
        let name = parsed("Smith", "John, Jr.");
        assert_eq!(name.given.as_deref(), Some("John"));
        assert_eq!(name.suffix.as_deref(), Some("Jr."));
        assert_eq!(name.comma_suffix, None);

        let name = parsed("Smith", "John,! Jr.");
        assert_eq!(name.given.as_deref(), Some("John"));
        assert_eq!(name.suffix.as_deref(), Some("Jr."));
        assert_eq!(name.comma_suffix, Some(true));
    }

    #[test]
    fn test_et_al() {
        let name = parsed("Doe", "Jane, et al.");
        assert_eq!(name.given.as_deref(), Some("Jane"));
        assert_eq!(name.suffix, None);
        assert_eq!(name.dropping_particle.as_deref(), Some("et al."));
        assert_eq!(name.comma_dropping_particle.as_deref(), Some(","));
    }

    #[test]
    fn test_quoted_family_skips_parsing() {
        let name = parsed("\"Smith Inc\"", "de");
        assert_eq!(name.family.as_deref(), Some("Smith Inc"));
        assert_eq!(name.non_dropping_particle, None);
        assert_eq!(name.given.as_deref(), Some("de"));
        assert_eq!(name.dropping_particle, None);
    }

    #[test]
    fn test_incomplete_names_untouched() {
        let mut name = CslName {
            family: Some("van Gogh".to_string()),
            ..CslName::default()
        };
        parse_particles(&mut name);
        assert_eq!(name.family.as_deref(), Some("van Gogh"));
        assert_eq!(name.non_dropping_particle, None);
    }
}
