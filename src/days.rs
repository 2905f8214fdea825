use regex::Regex;
use schedule_types::Weekday;
use std::sync::LazyLock;

use Weekday::{Fr, Mo, Sa, Su, Th, Tu, We};

/// Single day spellings, keyed lower-case: letters, 2-4 letter
/// abbreviations, full names and their plurals.
pub const DAY_MAP: &[(&str, Weekday)] = &[
    ("m", Mo), ("mo", Mo), ("mon", Mo), ("monday", Mo), ("mondays", Mo),
    ("t", Tu), ("tu", Tu), ("tue", Tu), ("tues", Tu), ("tuesday", Tu), ("tuesdays", Tu),
    ("w", We), ("we", We), ("wed", We), ("weds", We), ("wednesday", We), ("wednesdays", We),
    ("r", Th), ("th", Th), ("thu", Th), ("thur", Th), ("thurs", Th), ("thursday", Th), ("thursdays", Th),
    ("f", Fr), ("fr", Fr), ("fri", Fr), ("friday", Fr), ("fridays", Fr),
    ("sa", Sa), ("sat", Sa), ("saturday", Sa), ("saturdays", Sa),
    ("su", Su), ("sun", Su), ("sunday", Su), ("sundays", Su),
];

/// Multi-day tokens written without separators. Keyed by the token's
/// letters only, so "Tu/Th" and "TuTh" share the "tuth" entry.
pub const COMPOSITES: &[(&str, &[Weekday])] = &[
    ("mwf", &[Mo, We, Fr]),
    ("tth", &[Tu, Th]),
    ("tuth", &[Tu, Th]),
    ("tr", &[Tu, Th]),
    ("mtwrf", &[Mo, Tu, We, Th, Fr]),
    ("mtwthf", &[Mo, Tu, We, Th, Fr]),
    ("mtuwthf", &[Mo, Tu, We, Th, Fr]),
];

/// Explicit weekday ranges. Keyed by the whitespace-free, lower-cased
/// token because a bare hyphen elsewhere is a list separator.
pub const RANGES: &[(&str, &[Weekday])] = &[
    ("m-f", &Weekday::WORKWEEK),
    ("mon-fri", &Weekday::WORKWEEK),
    ("monday-friday", &Weekday::WORKWEEK),
    ("m-th", &[Mo, Tu, We, Th]),
    ("m-r", &[Mo, Tu, We, Th]),
    ("mon-thu", &[Mo, Tu, We, Th]),
    ("mon-thurs", &[Mo, Tu, We, Th]),
    ("monday-thursday", &[Mo, Tu, We, Th]),
];

/// Spellings too common as ordinary English words ("we") to be searched
/// for; they still resolve when they appear inside a matched block.
const UNSEARCHED: &[&str] = &["mo", "we", "fr"];

/// Units of a compact day run such as "MWTh", longest first.
const RUN_UNITS: &[&str] = &["Tu", "Th", "Sa", "Su", "M", "T", "W", "R", "F"];

/// Separator between two day tokens: slash, comma, ampersand, plus,
/// hyphen, "and", or bare horizontal whitespace.
const DAY_JOIN: &str = r"(?:[ \t]*(?:[/,&+]|-|\band\b)[ \t]*|[ \t]+)";

static RE_DAY_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:[/,&+]|-|\band\b)\s*|\s+").expect("day split regex")
});

fn lookup<'a, T>(table: &'a [(&str, T)], key: &str) -> Option<&'a T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

/// Regex fragment matching a single day token (no capture groups).
///
/// Ranges are tried first, then compact upper-case runs ("MWF", "TTh"),
/// then single upper-case letters, then words. Word alternatives are
/// sorted by length descending so "thurs" wins over "thu".
pub fn build_day_token_regex() -> String {
    let mut ranges: Vec<String> = RANGES.iter().map(|(k, _)| regex::escape(k)).collect();
    ranges.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let mut words: Vec<&str> = DAY_MAP
        .iter()
        .map(|(k, _)| *k)
        .filter(|k| k.len() >= 2 && !UNSEARCHED.contains(k))
        .collect();
    words.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let run = format!("(?-i:(?:{}){{2,6}})", RUN_UNITS.join("|"));

    format!(
        r"\b(?:{}|{}|(?-i:[MTWRF])|{})\b",
        ranges.join("|"),
        run,
        words.join("|")
    )
}

/// Regex fragment matching a block of one or more day tokens joined by
/// separators, confined to a single line. Case-insensitive on its own.
pub fn build_days_block_regex() -> String {
    let token = build_day_token_regex();
    format!("(?i:{token}(?:{DAY_JOIN}{token})*)")
}

/// Break a compact run like "MWTh" into days. `None` if any part of the
/// token is not a day unit.
fn decompose_run(token: &str) -> Option<Vec<Weekday>> {
    let lower = token.to_lowercase();
    let mut rest = lower.as_str();
    let mut days = Vec::new();

    while !rest.is_empty() {
        let unit = RUN_UNITS
            .iter()
            .map(|u| u.to_lowercase())
            .find(|u| rest.starts_with(u.as_str()))?;
        days.push(*lookup(DAY_MAP, &unit)?);
        rest = &rest[unit.len()..];
    }

    if days.is_empty() { None } else { Some(days) }
}

/// Resolve one separator-free token. Unknown tokens give `None`.
fn resolve_token(token: &str) -> Option<Vec<Weekday>> {
    if token.is_empty() {
        return None;
    }
    let lower = token.to_lowercase();
    if let Some(day) = lookup(DAY_MAP, &lower) {
        return Some(vec![*day]);
    }

    let letters: String = lower.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if let Some(days) = lookup(COMPOSITES, &letters) {
        return Some(days.to_vec());
    }

    decompose_run(&letters)
}

/// Map a days substring ("MWF", "Tu/Th", "Monday and Wednesday") to
/// canonical weekday codes in order of first appearance.
///
/// Never fails: unrecognized pieces contribute nothing.
pub fn resolve_days(days_text: &str) -> Vec<Weekday> {
    let compact: String = days_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if let Some(days) = lookup(RANGES, &compact) {
        return days.to_vec();
    }

    let letters: String = compact.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if let Some(days) = lookup(COMPOSITES, &letters) {
        return days.to_vec();
    }

    let mut out: Vec<Weekday> = Vec::new();
    for part in RE_DAY_SPLIT.split(days_text.trim()) {
        for day in resolve_token(part.trim()).unwrap_or_default() {
            if !out.contains(&day) {
                out.push(day);
            }
        }
    }
    out
}
