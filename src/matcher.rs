//! Primary pass: one line carries days, a time range and optionally a
//! location.
//!
//! Real syllabus lines:
//!   Meets: MWF 10:00-10:50 AM (Room 101)
//!   Lecture Tu/Th 1:00-2:15pm, Fowler Hall 302
//!   Class: Tuesday and Thursday 13:00-14:15, CH 120
//!   Lab Sections: Tu 1:00-2:50pm (all in HSC 109)
//!
//! A line may hold several statements ("Lecture MWF 9-9:50am; Discussion
//! F 11-11:50am"). Each one is classified on its own text and takes the
//! location that directly follows it, else a shared "(all in X)" that
//! closes the line.

use regex::{Captures, Regex};
use schedule_types::Meeting;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::classify::{RE_OFFICE_PHRASE, Signals, classify};
use crate::course_name::RE_TERM;
use crate::days::{build_days_block_regex, resolve_days};
use crate::normalize::lines_with_offsets;
use crate::sections::SectionMap;
use crate::times::{TIME_RANGE_RE, resolve_time_range};

// ── Location ─────────────────────────────────────────────────────────

/// Regex fragment for a location token group (no capture groups):
/// a room/building/online keyword and what follows it, a capitalized
/// building name with a room number, or a bare room code like "HSC 109".
pub const LOCATION_RE: &str = concat!(
    r"(?:(?i:rm|rooms?|hall|bldg|building|lab|online|zoom|remote|virtual|tbd|tba)\b[^,\n;)]*",
    r"|(?-i:[A-Z][a-z]+[ \t]+(?:Hall|Building|Center|Library|Annex))\b[^,\n;)]*",
    r"|(?-i:[A-Z][A-Za-z]+[ \t]+\d{1,4}[A-Z]?)\b",
    r"|(?-i:[A-Z]{2,6}[ \t]?\d{1,4}[A-Z]?)\b)"
);

/// Words that may sit between a time range and its location.
pub const LOCATION_LEAD_RE: &str = r"(?:\([ \t]*)?(?i:(?:(?:all[ \t]+)?in|at|location:?|where:?)[ \t]+)?";

static RE_ROOM_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2,6}[ \t]?\d{1,4}[A-Z]?\b").expect("room code regex")
});

static RE_LOCATION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[ \t,;|\-]*{LOCATION_LEAD_RE}(?P<loc>{LOCATION_RE})"))
        .expect("location tail regex")
});

static RE_SHARED_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?i:all[ \t]+(?:in|at))[ \t]+(?P<loc>[^)\n]+)\)[ \t]*[.;]?[ \t]*$")
        .expect("shared location regex")
});

// "Sec 2", "Section 10"
static RE_SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^sec(?:tion)?s?\.?[ \t]*\d").expect("section label regex")
});

static RE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Collapse whitespace, strip trailing punctuation and normalize the
/// "to be determined" spellings to `TBD`. `None` if nothing usable is left.
pub fn clean_location(raw: &str) -> Option<String> {
    let collapsed = RE_WS.replace_all(raw, " ");
    let cleaned = collapsed
        .trim()
        .trim_end_matches(|c: char| ".,;:-()".contains(c) || c.is_whitespace())
        .trim_start_matches(|c: char| c == '(' || c.is_whitespace());

    if cleaned.is_empty() {
        return None;
    }
    match cleaned.to_lowercase().as_str() {
        "tbd" | "tba" | "to be determined" | "to be announced" => return Some("TBD".into()),
        _ => {}
    }
    // "Fall 2024" looks like "Building 2024" to the pattern
    if RE_TERM.is_match(cleaned) || RE_SECTION_LABEL.is_match(cleaned) {
        return None;
    }
    Some(cleaned.to_string())
}

/// Location at the head of the text between a match and the next one,
/// with the byte offset where it ends. A label such as "Lab:" opens the
/// next statement and is never a room.
fn trailing_location(tail: &str) -> Option<(String, usize)> {
    RE_LOCATION_TAIL
        .captures(tail)
        .and_then(|c| c.name("loc"))
        .filter(|m| !m.as_str().trim_end().ends_with(':'))
        .and_then(|m| Some((clean_location(m.as_str())?, m.end())))
        .or_else(|| {
            RE_ROOM_CODE
                .find(tail)
                .and_then(|m| Some((clean_location(m.as_str())?, m.end())))
        })
}

/// Location named once for a whole line, as in "... (all in HSC 109)".
fn shared_location(line: &str) -> Option<String> {
    RE_SHARED_LOCATION
        .captures(line)
        .and_then(|c| c.name("loc"))
        .and_then(|m| clean_location(m.as_str()))
}

// ── Non-class service hours ──────────────────────────────────────────

static RE_SERVICE_HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:hours|open|opens|available|staffed)\b").expect("service hours regex")
});

static RE_SUPPORT_DESK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:library|librarian|help[ \t]?desk|service[ \t]+desk|front[ \t]+desk",
        r"|it[ \t]+support|tech(?:nical)?[ \t]+support|writing[ \t]+center|tutoring[ \t]+center",
        r"|learning[ \t]+center|computer[ \t]+lab|advising|counseling)\b"
    ))
    .expect("support desk regex")
});

/// Library, help-desk and similar service hours are not class meetings.
/// Office hours held in such a place still count.
pub fn is_support_hours(text: &str) -> bool {
    !RE_OFFICE_PHRASE.is_match(text)
        && RE_SERVICE_HOURS.is_match(text)
        && RE_SUPPORT_DESK.is_match(text)
}

// ── Candidate → Meeting ──────────────────────────────────────────────

/// Raw pieces of one matched meeting, before resolution.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub days_text: &'a str,
    pub t1: &'a str,
    pub a1: Option<&'a str>,
    pub t2: &'a str,
    pub a2: Option<&'a str>,
    pub location: Option<String>,
    /// Text of this statement up to the end of its time range, used for
    /// classification
    pub line: &'a str,
    /// Same statement including whatever trails it, checked by the
    /// service-hours filter
    pub statement: &'a str,
    /// Byte offset of the days text in the normalized document
    pub pos: usize,
}

impl<'a> Candidate<'a> {
    /// Build a candidate from captures of a pattern containing `days` and
    /// the [`TIME_RANGE_RE`] groups.
    pub fn from_captures(caps: &Captures<'a>, line: &'a str, line_offset: usize) -> Option<Self> {
        let days = caps.name("days")?;
        Some(Self {
            days_text: days.as_str().trim(),
            t1: caps.name("t1")?.as_str(),
            a1: caps.name("a1").map(|m| m.as_str()),
            t2: caps.name("t2")?.as_str(),
            a2: caps.name("a2").map(|m| m.as_str()),
            location: None,
            line,
            statement: line,
            pos: line_offset + days.start(),
        })
    }

    /// Resolve days and times, classify, and produce the meeting.
    /// `None` when the line is service hours or nothing resolves.
    pub fn into_meeting(self, text: &str, sections: &SectionMap) -> Option<Meeting> {
        if is_support_hours(self.statement) {
            debug!(statement = self.statement, "skipping support-desk hours");
            return None;
        }

        let days = resolve_days(self.days_text);
        if days.is_empty() {
            trace!(days_text = self.days_text, "no weekday resolved");
            return None;
        }
        let (start, end) = resolve_time_range(self.t1, self.a1, self.t2, self.a2)?;

        let kind = classify(&Signals {
            line: self.line,
            location: self.location.as_deref(),
            span_kind: sections.kind_at(self.pos),
            context: sections.context_before(text, self.pos),
        });

        Some(Meeting {
            days_text: self.days_text.to_string(),
            days,
            start_24h: start.to_string(),
            end_24h: end.to_string(),
            location: self.location,
            kind,
        })
    }
}

// ── Line matcher ─────────────────────────────────────────────────────

static RE_SCHEDULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"(?i:\b(?:class[ \t]+meetings?|meetings?|meets|class|lectures?|times?)\b[ \t]*[:\-]?[ \t]*)?",
            r"(?P<days>{days})[ \t,:]*(?i:from[ \t]+)?{time}",
        ),
        days = build_days_block_regex(),
        time = TIME_RANGE_RE,
    ))
    .expect("schedule line regex")
});

/// Scan every line of normalized text for integrated schedule statements.
pub fn match_schedule_lines(text: &str, sections: &SectionMap) -> Vec<Meeting> {
    let mut meetings = Vec::new();

    for (offset, line) in lines_with_offsets(text) {
        let found: Vec<Captures<'_>> = RE_SCHEDULE_LINE.captures_iter(line).collect();
        if found.is_empty() {
            continue;
        }
        let shared = shared_location(line);

        // Statement k runs from the end of statement k-1 (past its
        // location) to the start of match k+1
        let mut cursor = 0;
        for (k, caps) in found.iter().enumerate() {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let next_start = found
                .get(k + 1)
                .and_then(|c| c.get(0))
                .map_or(line.len(), |m| m.start());
            let location = trailing_location(&line[whole.end()..next_start]);

            let start = cursor;
            cursor = whole.end() + location.as_ref().map_or(0, |(_, end)| *end);

            let Some(mut candidate) = Candidate::from_captures(caps, line, offset) else {
                continue;
            };
            candidate.line = &line[start..whole.end()];
            candidate.statement = &line[start..next_start];
            candidate.location = location.map(|(loc, _)| loc).or_else(|| shared.clone());

            if let Some(meeting) = candidate.into_meeting(text, sections) {
                trace!(?meeting, "line match");
                meetings.push(meeting);
            }
        }
    }

    meetings
}
