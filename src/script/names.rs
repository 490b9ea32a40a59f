//! Identifier normalization for record field names.

use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_HUMP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Convert an identifier-like string to lowerCamelCase.
///
/// Words are found at lower-to-upper case humps and at runs of
/// non-alphanumeric characters. The first word is lowercased; every later
/// word gets an uppercase first letter and keeps the rest of its casing.
///
/// ```
/// use blockrun::script::names::lower_camel;
///
/// assert_eq!(lower_camel("foo_bar"), "fooBar");
/// assert_eq!(lower_camel("FooBarBaz"), "fooBarBaz");
/// assert_eq!(lower_camel(""), "");
/// ```
pub fn lower_camel(name: &str) -> String {
    let spaced = CAMEL_HUMP.replace_all(name, "$1 $2");
    let mut out = String::with_capacity(name.len());
    for (i, word) in SEPARATORS
        .split(&spaced)
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
