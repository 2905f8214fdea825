use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

use crate::days::resolve_days;

/// Only the header region of a document is searched for a title.
pub const HEADER_LINES: usize = 80;

// Department + 1-3 digit number, e.g. "PHYS 110", "Math 212", "CS:101A".
static RE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z&/]{1,15})\s*[:\-]?\s*(\d{1,3}[A-Za-z\-]*)\b").expect("code regex")
});

pub(crate) static RE_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:fall|spring|summer|winter)(?:[ \t]+(?:term|semester|quarter))?[ \t]+\d{4}\b")
        .expect("term regex")
});

static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:course\s*page|canvas|syllabus\s*page|policy|policies|resources|https?://|www\.)")
        .expect("noise regex")
});

static RE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Words that precede a number without being a department.
const NOT_DEPARTMENTS: &[&str] = &[
    "room", "rm", "rooms", "hall", "bldg", "building", "suite", "page", "pages", "chapter",
    "chapters", "ch", "week", "weeks", "unit", "units", "lecture", "lab", "section", "sec",
    "fall", "spring", "summer", "winter", "quiz", "exam", "homework", "hw", "am", "pm",
];

// ── Helpers ──────────────────────────────────────────────────────────

fn clean(s: &str) -> String {
    RE_WS
        .replace_all(s, " ")
        .trim_matches(|c: char| " -:;,.\t".contains(c))
        .to_string()
}

/// Reject navigation, boilerplate and near-empty lines.
fn is_good_line(line: &str) -> bool {
    !RE_NOISE.is_match(line) && line.trim().chars().count() >= 6
}

/// Day blocks like "MWF 10" and room numbers look like course codes.
fn is_department(dept: &str) -> bool {
    let lower = dept.to_lowercase();
    !NOT_DEPARTMENTS.contains(&lower.as_str()) && resolve_days(dept).is_empty()
}

struct CodeMatch {
    dept: String,
    num: String,
    range: Range<usize>,
}

/// First plausible course code in `s`.
fn find_code(s: &str) -> Option<CodeMatch> {
    RE_CODE
        .captures_iter(s)
        .find(|caps| is_department(&caps[1]))
        .and_then(|caps| {
            Some(CodeMatch {
                dept: caps[1].to_string(),
                num: caps[2].to_string(),
                range: caps.get(0)?.range(),
            })
        })
}

// ── Scoring ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    title: String,
    /// Raw text the candidate came from (line or combined pair)
    source: String,
    combined: bool,
    line_index: usize,
}

type ScoreRule = (&'static str, fn(&Candidate) -> i32);

/// Additive scoring, evaluated in order. Every candidate starts at
/// `BASE_SCORE`.
const BASE_SCORE: i32 = 2;

const SCORE_RULES: &[ScoreRule] = &[
    ("term present", |c| {
        (RE_TERM.is_match(&c.source) || RE_TERM.is_match(&c.title)) as i32
    }),
    ("descriptive title", |c| {
        if c.combined {
            (c.title.chars().count() >= 8) as i32
        } else {
            (c.title.split_whitespace().count() >= 2) as i32
        }
    }),
    ("near the top", |c| {
        if c.combined {
            0
        } else {
            5i32.saturating_sub((c.line_index / 5) as i32).max(0)
        }
    }),
];

fn score(c: &Candidate) -> i32 {
    BASE_SCORE + SCORE_RULES.iter().map(|(_, rule)| rule(c)).sum::<i32>()
}

fn candidate_for_line(head: &[&str], i: usize) -> Option<Candidate> {
    let line = head[i];
    if !is_good_line(line) {
        return None;
    }

    if let Some(CodeMatch { dept, num, range }) = find_code(line) {
        // Title is the rest of the line, else the next line
        let mut title = clean(&line[range.end..]);
        if title.is_empty()
            && let Some(next) = head.get(i + 1)
            && is_good_line(next)
        {
            title = clean(next);
        }
        return Some(Candidate {
            name: clean(&format!("{dept} {num} {title}")),
            title,
            source: line.to_string(),
            combined: false,
            line_index: i,
        });
    }

    // Code on one line, title on the next (or the reverse)
    let next = head.get(i + 1)?;
    let combo = format!("{line} {next}");
    if !is_good_line(&combo) {
        return None;
    }
    let CodeMatch { dept, num, range } = find_code(&combo)?;
    let title = clean(&format!("{} {}", &combo[..range.start], &combo[range.end..]));
    Some(Candidate {
        name: clean(&format!("{dept} {num} {title}")),
        title,
        source: combo,
        combined: true,
        line_index: i,
    })
}

/// Best-guess "DEPT NUM Title" from the document header, with any term
/// phrase removed. Falls back to the first code anywhere in the text.
pub fn guess_course_name(text: &str) -> Option<String> {
    let head: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(HEADER_LINES)
        .collect();

    let mut best: Option<(i32, Candidate)> = None;
    for i in 0..head.len() {
        let Some(cand) = candidate_for_line(&head, i) else {
            continue;
        };
        let s = score(&cand);
        if best.as_ref().is_none_or(|(b, _)| s > *b) {
            best = Some((s, cand));
        }
    }

    if let Some((s, cand)) = best {
        let name = clean(&RE_TERM.replace_all(&cand.name, ""));
        debug!(score = s, line = cand.line_index, name = name.as_str(), "course name candidate");
        if !name.is_empty() {
            return Some(name);
        }
    }

    find_code(text).map(|c| format!("{} {}", c.dept, c.num))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_with_term_stripped() {
        assert_eq!(guess_course_name("PHYS 110 - Fall 2024\nMeets: MWF 10-11"), Some("PHYS 110".into()));
    }

    #[test]
    fn test_code_and_title_same_line() {
        assert_eq!(
            guess_course_name("MATH 212 - Linear Algebra\nSpring 2025"),
            Some("MATH 212 Linear Algebra".into())
        );
    }

    #[test]
    fn test_title_on_next_line() {
        assert_eq!(
            guess_course_name("CHEM 101\nGeneral Chemistry I\nInstructor: Dr. Smith"),
            Some("CHEM 101 General Chemistry I".into())
        );
    }

    #[test]
    fn test_single_digit_course_number() {
        assert_eq!(guess_course_name("ECON 1 Principles of Economics"), Some("ECON 1 Principles of Economics".into()));
    }

    #[test]
    fn test_day_blocks_and_rooms_are_not_codes() {
        assert_eq!(guess_course_name("Meets MWF 10-11\nRoom 101 this week"), None);
    }

    #[test]
    fn test_noise_lines_skipped() {
        assert_eq!(
            guess_course_name("Canvas course page CS 50\nCS 61 Data Structures"),
            Some("CS 61 Data Structures".into())
        );
    }

    #[test]
    fn test_earlier_line_preferred() {
        let mut text = String::from("BIO 150 Cell Biology\n");
        for i in 0..30 {
            text.push_str(&format!("filler line number {i}\n"));
        }
        text.push_str("BIO 151 Genetics Lab\n");
        assert_eq!(guess_course_name(&text), Some("BIO 150 Cell Biology".into()));
    }

    #[test]
    fn test_fallback_beyond_header_region() {
        let mut text = String::new();
        for i in 0..100 {
            text.push_str(&format!("x{i}\n"));
        }
        text.push_str("see HIST 7 for details\n");
        assert_eq!(guess_course_name(&text), Some("HIST 7".into()));
    }

    #[test]
    fn test_absent_when_no_code() {
        assert_eq!(guess_course_name("Welcome to the course!"), None);
        assert_eq!(guess_course_name(""), None);
    }
}
