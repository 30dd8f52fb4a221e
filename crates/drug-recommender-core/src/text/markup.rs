//! Markup stripping: tags out, inner text and decoded character references in.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

// `<` only opens a tag when followed by a letter, `/` or `!`; otherwise it is text.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z!][^>]*>").expect("valid tag regex"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]+);?|#[xX]([0-9a-fA-F]+);?|([A-Za-z][A-Za-z0-9]*)(;?))")
        .expect("valid entity regex")
});

/// Named references that still decode without a trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig",
    "agrave", "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy",
    "curren", "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14",
    "frac34", "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt",
    "macr", "micro", "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf",
    "ordm", "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg",
    "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc",
    "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

/// Remove tags and comments, keeping the text between them, then decode
/// character references.
///
/// Tags are dropped without inserting whitespace, so `a<br>b` becomes `ab`.
pub fn strip_markup(raw: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(raw, "");
    let without_tags = TAG_RE.replace_all(&without_comments, "");
    decode_entities(&without_tags)
}

/// Decode numeric and named character references.
///
/// Named references use the full HTML5 table. The legacy Latin-1 names also decode without `;`, and as the longest prefix of
/// a longer name (`&ampfoo` becomes `&foo`). Out-of-range code points become
/// U+FFFD. Anything else is left as written.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            if let Some(dec) = caps.get(1) {
                return decode_code_point(dec.as_str().parse::<u32>().ok()).to_string();
            }
            if let Some(hex) = caps.get(2) {
                return decode_code_point(u32::from_str_radix(hex.as_str(), 16).ok()).to_string();
            }

            let name = caps.get(3).map_or("", |m| m.as_str());
            let semicolon = caps.get(4).map_or("", |m| m.as_str());

            if !semicolon.is_empty() {
                if let Some(decoded) = lookup_named(name) {
                    return decoded;
                }
            }

            match longest_legacy_prefix(name) {
                Some(prefix) => match lookup_named(prefix) {
                    Some(decoded) => format!("{}{}{}", decoded, &name[prefix.len()..], semicolon),
                    None => caps[0].to_string(),
                },
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Resolve `&name;` against the HTML5 entity table.
fn lookup_named(name: &str) -> Option<String> {
    let reference = format!("&{};", name);
    let decoded = html_escape::decode_html_entities(&reference);
    if decoded == reference {
        None
    } else {
        Some(decoded.into_owned())
    }
}

fn longest_legacy_prefix(name: &str) -> Option<&'static str> {
    LEGACY_ENTITIES
        .iter()
        .filter(|legacy| name.starts_with(*legacy))
        .max_by_key(|legacy| legacy.len())
        .copied()
}

/// Zero, surrogates and values past U+10FFFF become the replacement character.
fn decode_code_point(value: Option<u32>) -> char {
    match value {
        Some(0) | None => char::REPLACEMENT_CHARACTER,
        Some(v) => char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}
