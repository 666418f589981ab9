use crate::regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static ISBN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:97[89]-?)?(?:\d-?){9}[\dx])(?:[^\w-]|$)").unwrap()
});

static JURISDICTION_OFFSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3})").unwrap());

static BLOCK_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(</(?:h\d|p|div)+>)").unwrap());

static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static LEADING_OPEN_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[^>\n]+[^/]>\n").unwrap());

static DEWEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})(?:\.(\d+))?(?:/([a-zA-Z]{3}))?$").unwrap());

static LC_CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{1,3}\d+").unwrap());

static LC_SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s.]+").unwrap());

/// Maximum length of a title derived from a note body, in characters.
pub const MAX_NOTE_TITLE_LENGTH: usize = 120;

/// Extracts the first ISBN from a field that may list several.
///
/// Returns `None` if the value does not start with an ISBN-10 or ISBN-13.
///
/// # Arguments
///
/// * `value` - The raw ISBN field value
pub fn first_isbn(value: &str) -> Option<&str> {
    ISBN_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts the jurisdiction code from a length-prefixed jurisdiction value.
///
/// Jurisdiction values may be stored as a 3-digit length followed by the
/// code and a human-readable name, e.g. `"002usUnited States"`. Values
/// without the prefix are returned unchanged.
pub fn jurisdiction_code(value: &str) -> &str {
    let Some(offset) = JURISDICTION_OFFSET_REGEX
        .captures(value)
        .and_then(|caps| caps[1].parse::<usize>().ok())
    else {
        return value;
    };

    let rest = &value[3..];
    match rest.char_indices().nth(offset) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

/// Strips a pair of double quotes enclosing the whole value.
///
/// Only strips when the closing quote is the first quote after the opening
/// one, so `"a" and "b"` is left alone.
pub fn strip_enclosing_quotes(value: &str) -> &str {
    if value.len() >= 2
        && value.starts_with('"')
        && value[1..].find('"') == Some(value.len() - 2)
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Derives a title from a note body.
///
/// Takes the first line of the note's text content, at most
/// [`MAX_NOTE_TITLE_LENGTH`] characters long. Block-level closing tags end a
/// line; `<br>` becomes a space.
pub fn note_to_title(note: &str) -> String {
    let text = note.trim();
    let text = BLOCK_END_REGEX.replace_all(text, "$1\n");
    let text = LINE_BREAK_REGEX.replace_all(&text, " ");
    let mut text = unescape_html(&TAG_REGEX.replace_all(&text, ""));

    // First line only opens a wrapper element
    if LEADING_OPEN_TAG_REGEX.is_match(note) {
        text = text.trim().to_string();
    }

    let truncated: String = text.chars().take(MAX_NOTE_TITLE_LENGTH).collect();
    match truncated.find('\n') {
        Some(index) => truncated[..index].to_string(),
        None => truncated,
    }
}

fn unescape_html(text: &str) -> String {
    text.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Compares two call numbers.
///
/// Purely numeric values compare as numbers, Dewey Decimal values compare
/// part by part, Library of Congress values compare by classification first
/// and then by the remaining cutter segments. Anything else falls back to
/// plain string comparison.
pub fn compare_call_numbers(a: &str, b: &str) -> Ordering {
    let only_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if only_digits(a) && only_digits(b) {
        let parse = |s: &str| s.parse::<u128>().ok();
        return parse(a).cmp(&parse(b));
    }

    let squash = |s: &str| {
        s.to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
    };
    let (squashed_a, squashed_b) = (squash(a), squash(b));
    if let (Some(dewey_a), Some(dewey_b)) = (
        DEWEY_REGEX.captures(&squashed_a),
        DEWEY_REGEX.captures(&squashed_b),
    ) {
        let parts = |caps: &crate::regex::Captures<'_>| -> Vec<Option<String>> {
            (1..=3)
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect()
        };
        return compare_optional_parts(&parts(&dewey_a), &parts(&dewey_b));
    }

    if let (Some(class_a), Some(class_b)) = (lc_classification(a), lc_classification(b)) {
        let strip = |s: &str| s.replace(|c: char| c.is_whitespace() || c == '.', "");
        return match strip(class_a).cmp(&strip(class_b)) {
            Ordering::Equal => {
                let rest = |s: &str, class: &str| {
                    LC_SEPARATOR_REGEX
                        .replace_all(&s[class.len()..], " ")
                        .split(' ')
                        .map(|part| Some(part.to_string()))
                        .collect::<Vec<_>>()
                };
                compare_optional_parts(&rest(a, class_a), &rest(b, class_b))
            }
            other => other,
        };
    }

    a.cmp(b)
}

/// Matches the leading LC classification (letters then digits) of a call number.
///
/// The classification must end the value or be followed by an optional run of
/// whitespace and a period or digit.
fn lc_classification(value: &str) -> Option<&str> {
    let found = LC_CLASS_REGEX.find(value)?;
    let followed_ok = |end: usize| {
        let rest = value[end..].trim_start();
        end == value.len() || rest.starts_with(|c: char| c == '.' || c.is_ascii_digit())
    };

    let end = found.end();
    if followed_ok(end) {
        return Some(&value[..end]);
    }

    // Give back one digit so the class is followed by a digit
    let digits = value[..end]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits > 1 {
        Some(&value[..end - 1])
    } else {
        None
    }
}

/// Compares part lists element by element; absent parts compare equal to anything.
fn compare_optional_parts(a: &[Option<String>], b: &[Option<String>]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            match x.cmp(y) {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }
    a.len().cmp(&b.len())
}

/// Left-pads a value to `width` characters with `pad`.
pub fn lpad(value: impl ToString, pad: char, width: usize) -> String {
    let value = value.to_string();
    let len = value.chars().count();
    if len >= width {
        return value;
    }
    let mut padded: String = std::iter::repeat_n(pad, width - len).collect();
    padded.push_str(&value);
    padded
}

/// ISO 639-1 codes with their English and native language names.
const LANGUAGE_NAMES: &[(&str, &str, &str)] = &[
    ("af", "Afrikaans", "Afrikaans"),
    ("am", "Amharic", "አማርኛ"),
    ("ar", "Arabic", "العربية"),
    ("az", "Azerbaijani", "azərbaycan"),
    ("be", "Belarusian", "беларуская"),
    ("bg", "Bulgarian", "български"),
    ("bn", "Bangla", "বাংলা"),
    ("bo", "Tibetan", "བོད་སྐད་"),
    ("br", "Breton", "brezhoneg"),
    ("bs", "Bosnian", "bosanski"),
    ("ca", "Catalan", "català"),
    ("cs", "Czech", "čeština"),
    ("cy", "Welsh", "Cymraeg"),
    ("da", "Danish", "dansk"),
    ("de", "German", "Deutsch"),
    ("el", "Greek", "Ελληνικά"),
    ("en", "English", "English"),
    ("eo", "Esperanto", "Esperanto"),
    ("es", "Spanish", "español"),
    ("et", "Estonian", "eesti"),
    ("eu", "Basque", "euskara"),
    ("fa", "Persian", "فارسی"),
    ("fi", "Finnish", "suomi"),
    ("fo", "Faroese", "føroyskt"),
    ("fr", "French", "français"),
    ("fy", "Western Frisian", "Frysk"),
    ("ga", "Irish", "Gaeilge"),
    ("gd", "Scottish Gaelic", "Gàidhlig"),
    ("gl", "Galician", "galego"),
    ("gu", "Gujarati", "ગુજરાતી"),
    ("he", "Hebrew", "עברית"),
    ("hi", "Hindi", "हिन्दी"),
    ("hr", "Croatian", "hrvatski"),
    ("ht", "Haitian Creole", "créole haïtien"),
    ("hu", "Hungarian", "magyar"),
    ("hy", "Armenian", "հայերեն"),
    ("id", "Indonesian", "Indonesia"),
    ("is", "Icelandic", "íslenska"),
    ("it", "Italian", "italiano"),
    ("ja", "Japanese", "日本語"),
    ("jv", "Javanese", "Jawa"),
    ("ka", "Georgian", "ქართული"),
    ("kk", "Kazakh", "қазақ тілі"),
    ("km", "Khmer", "ខ្មែរ"),
    ("kn", "Kannada", "ಕನ್ನಡ"),
    ("ko", "Korean", "한국어"),
    ("ku", "Kurdish", "kurdî"),
    ("ky", "Kyrgyz", "кыргызча"),
    ("la", "Latin", "Latina"),
    ("lb", "Luxembourgish", "Lëtzebuergesch"),
    ("lo", "Lao", "ລາວ"),
    ("lt", "Lithuanian", "lietuvių"),
    ("lv", "Latvian", "latviešu"),
    ("mi", "Māori", "Māori"),
    ("mk", "Macedonian", "македонски"),
    ("ml", "Malayalam", "മലയാളം"),
    ("mn", "Mongolian", "монгол"),
    ("mr", "Marathi", "मराठी"),
    ("ms", "Malay", "Melayu"),
    ("mt", "Maltese", "Malti"),
    ("my", "Burmese", "မြန်မာ"),
    ("nb", "Norwegian Bokmål", "norsk bokmål"),
    ("ne", "Nepali", "नेपाली"),
    ("nl", "Dutch", "Nederlands"),
    ("nn", "Norwegian Nynorsk", "norsk nynorsk"),
    ("no", "Norwegian", "norsk"),
    ("oc", "Occitan", "occitan"),
    ("pa", "Punjabi", "ਪੰਜਾਬੀ"),
    ("pl", "Polish", "polski"),
    ("ps", "Pashto", "پښتو"),
    ("pt", "Portuguese", "português"),
    ("qu", "Quechua", "Runasimi"),
    ("rm", "Romansh", "rumantsch"),
    ("ro", "Romanian", "română"),
    ("ru", "Russian", "русский"),
    ("sa", "Sanskrit", "संस्कृत भाषा"),
    ("sd", "Sindhi", "سنڌي"),
    ("si", "Sinhala", "සිංහල"),
    ("sk", "Slovak", "slovenčina"),
    ("sl", "Slovenian", "slovenščina"),
    ("so", "Somali", "Soomaali"),
    ("sq", "Albanian", "shqip"),
    ("sr", "Serbian", "српски"),
    ("sv", "Swedish", "svenska"),
    ("sw", "Swahili", "Kiswahili"),
    ("ta", "Tamil", "தமிழ்"),
    ("te", "Telugu", "తెలుగు"),
    ("tg", "Tajik", "тоҷикӣ"),
    ("th", "Thai", "ไทย"),
    ("tk", "Turkmen", "türkmen dili"),
    ("tl", "Tagalog", "Tagalog"),
    ("tr", "Turkish", "Türkçe"),
    ("tt", "Tatar", "татар"),
    ("ug", "Uyghur", "ئۇيغۇرچە"),
    ("uk", "Ukrainian", "українська"),
    ("ur", "Urdu", "اردو"),
    ("uz", "Uzbek", "o‘zbek"),
    ("vi", "Vietnamese", "Tiếng Việt"),
    ("yi", "Yiddish", "ייִדיש"),
    ("yo", "Yoruba", "Èdè Yorùbá"),
    ("zh", "Chinese", "中文"),
    ("zu", "Zulu", "isiZulu"),
];

/// Normalized language name -> ISO 639-1 code.
static LANGUAGE_CODES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut codes = HashMap::new();
    for (code, english, native) in LANGUAGE_NAMES {
        codes.insert(normalize_language_name(english), *code);
        codes.insert(normalize_language_name(native), *code);
    }
    codes
});

fn normalize_language_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Maps a language name, in English or in the language itself, to its
/// ISO 639-1 code.
///
/// Matching ignores case and diacritics. Names that are not recognized
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use cslmap::utils::language_to_iso6391;
///
/// assert_eq!(language_to_iso6391("German"), "de");
/// assert_eq!(language_to_iso6391("francais"), "fr");
/// assert_eq!(language_to_iso6391("Klingon"), "Klingon");
/// ```
pub fn language_to_iso6391(language: &str) -> String {
    if language.is_empty() {
        return String::new();
    }
    LANGUAGE_CODES
        .get(&normalize_language_name(language))
        .map_or_else(|| language.to_string(), |code| code.to_string())
}
