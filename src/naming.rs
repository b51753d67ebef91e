//! Identifier inflection and case conversion.
//!
//! Word capitalization keeps a fixed set of initialisms fully upper-case, so
//! `user_id` becomes `UserID` rather than `UserId`.

use inflector::string::pluralize::to_plural;
use inflector::string::singularize::to_singular;

/// Initialisms rendered fully upper-case by [`to_upper_words`] and [`to_lower_words`].
pub const ACRONYMS: &[&str] = &[
    "ACL", "API", "ASCII", "AWS", "CPU", "CSS", "DNS", "EOF", "GB", "GUID", "HTML", "HTTP",
    "HTTPS", "ID", "IP", "JSON", "KB", "LHS", "MAC", "MB", "QPS", "RAM", "RHS", "RPC", "SLA",
    "SMTP", "SQL", "SSH", "SSO", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "URI", "URL", "UTF8",
    "UUID", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Suffix appended when pluralization leaves a name unchanged.
pub const PLURAL_FALLBACK_SUFFIX: &str = "Slice";

/// Singular/plural pairs the rule-based inflector gets wrong.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
];

/// Words with a single form; both directions leave them unchanged.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "metadata",
    "equipment",
    "information",
    "news",
    "series",
    "species",
    "sheep",
    "fish",
];

/// Plural form of `name`; always differs from the input.
///
/// Only the last word is inflected (`order_status` -> `order_statuses`).
/// Uncountable words (`sheep`, `data`) get [`PLURAL_FALLBACK_SUFFIX`].
pub fn pluralize(name: &str) -> String {
    let plural = inflect_last_word(name, plural_word);
    if plural == name {
        format!("{name}{PLURAL_FALLBACK_SUFFIX}")
    } else {
        plural
    }
}

/// Singular form of `name`, used to derive a table's entity name.
///
/// Only the last word is inflected (`order_statuses` -> `order_status`).
pub fn singularize(name: &str) -> String {
    inflect_last_word(name, singular_word)
}

fn inflect_last_word(name: &str, inflect: fn(&str) -> String) -> String {
    let split = name
        .char_indices()
        .rev()
        .find(|&(_, c)| is_separator(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let (prefix, word) = name.split_at(split);
    if word.is_empty() {
        return name.to_string();
    }
    format!("{prefix}{}", inflect(word))
}

fn plural_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) || IRREGULARS.iter().any(|&(_, p)| p == lower) {
        return word.to_string();
    }
    match IRREGULARS.iter().find(|&&(s, _)| s == lower) {
        Some(&(_, plural)) => match_case(word, plural),
        None => to_plural(word),
    }
}

fn singular_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) || IRREGULARS.iter().any(|&(s, _)| s == lower) {
        return word.to_string();
    }
    match IRREGULARS.iter().find(|&&(_, p)| p == lower) {
        Some(&(singular, _)) => match_case(word, singular),
        None => to_singular(word),
    }
}

/// Carry a leading capital over to a replacement word.
fn match_case(original: &str, replacement: &str) -> String {
    if original.starts_with(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(is_separator).filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if ACRONYMS.contains(&upper.as_str()) {
        upper
    } else {
        capitalize(word)
    }
}

fn lower_leading_word(word: &str) -> String {
    if word.chars().all(|c| !c.is_lowercase()) {
        return word.to_lowercase();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert to UpperCamelCase.
///
/// ```text
/// user_info  => UserInfo
/// user_id    => UserID
/// full-admin => FullAdmin
/// ```
pub fn to_upper_words(s: &str) -> String {
    words(s).map(capitalize_word).collect()
}

/// Convert to lowerCamelCase.
///
/// ```text
/// user_info  => userInfo
/// user_id    => userID
/// id         => id
/// ```
pub fn to_lower_words(s: &str) -> String {
    let mut words = words(s);
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = lower_leading_word(first);
    for word in words {
        out.push_str(&capitalize_word(word));
    }
    out
}

/// Convert an UpperCamelCase or lowerCamelCase identifier to snake_case.
///
/// ```text
/// Username => username
/// FullName => full_name
/// HTTPCode => http_code
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    let mut last_break = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        // Break inside a word only: "UserInfo", or the last capital of a run followed by lower case ("HTTPCode").
        if i > 0 && i + 1 < chars.len() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next = chars[i + 1];
            if prev.is_lowercase()
                || (last_break + 1 != i && next.is_lowercase() && prev.is_alphabetic())
            {
                last_break = i;
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
