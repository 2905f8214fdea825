//! Section spans: regions of a document governed by a structural heading
//! such as "Office Hours:" or "Lab Sections:".
//!
//! A span opens right after its heading and closes at the next
//! heading-like line or blank line, whichever comes first (or at EOF).

use regex::Regex;
use schedule_types::MeetingKind;
use std::sync::LazyLock;

use crate::normalize::lines_with_offsets;

/// How far back (in characters) the classifier may look for context.
pub const CONTEXT_CHARS: usize = 200;

// ── Header patterns ──────────────────────────────────────────────────
//
// Each family heading may carry a parenthetical and must end in a colon
// or at end of line:
//   Office Hours:            Student Hours (Zoom):
//   Lab Sections:            Labs
//   Recitation Sections:     Discussion:
//   Class Meetings:          Lecture Times:

const OFFICE_FAMILY: &str = r"(?:office|student|instructor|drop-in)[ \t]+hours?";
const LAB_FAMILY: &str =
    r"lab(?:oratory|oratories|s)?(?:[ \t]+(?:sections?|sessions?|meetings?|times?))?";
const DISCUSSION_FAMILY: &str = r"(?:discussion|recitation|precept|tutorial)s?(?:[ \t]+(?:sections?|sessions?|times?))?|sections?";
const CLASS_FAMILY: &str = r"(?:class|course)[ \t]+(?:meetings?|times?|schedule)|lectures?(?:[ \t]+(?:times?|schedule|meetings?))?|meeting[ \t]+times?|schedule";

fn header_regex(family: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)^[ \t]*(?:{family})[ \t]*(?:\([^)\n]*\))?[ \t]*(?::|$)"
    ))
    .expect("section header regex")
}

static HEADERS: LazyLock<Vec<(MeetingKind, Regex)>> = LazyLock::new(|| {
    vec![
        (MeetingKind::Office, header_regex(OFFICE_FAMILY)),
        (MeetingKind::Lab, header_regex(LAB_FAMILY)),
        (MeetingKind::Discussion, header_regex(DISCUSSION_FAMILY)),
        (MeetingKind::Class, header_regex(CLASS_FAMILY)),
    ]
});

// A generic label alone on its line, e.g. "Grading:" or "Required Texts:".
static RE_LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*[A-Z][A-Za-z0-9 &/()'\-]{0,40}:[ \t]*$").expect("label line regex")
});

/// Match a family heading at the start of `line`. Returns the kind and the
/// byte length of the heading within the line.
fn match_header(line: &str) -> Option<(MeetingKind, usize)> {
    HEADERS
        .iter()
        .find_map(|(kind, re)| re.find(line).map(|m| (*kind, m.end())))
}

fn is_header_like(line: &str) -> bool {
    match_header(line).is_some() || RE_LABEL_LINE.is_match(line)
}

// ── Spans ────────────────────────────────────────────────────────────

/// A byte range of the normalized document attributed to one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub kind: MeetingKind,
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// All section spans of a document plus the line starts of every
/// heading-like line, used to clip classification context.
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    pub spans: Vec<SectionSpan>,
    anchors: Vec<usize>,
}

impl SectionMap {
    pub fn build(text: &str) -> Self {
        let lines = lines_with_offsets(text);
        let mut spans = Vec::new();
        let mut anchors = Vec::new();

        for (idx, &(offset, line)) in lines.iter().enumerate() {
            if is_header_like(line) {
                anchors.push(offset);
            }
            let Some((kind, header_len)) = match_header(line) else {
                continue;
            };

            let end = lines[idx + 1..]
                .iter()
                .find(|(_, l)| l.trim().is_empty() || is_header_like(l))
                .map(|(o, _)| *o)
                .unwrap_or(text.len());

            spans.push(SectionSpan {
                kind,
                start: offset + header_len,
                end,
            });
        }

        Self { spans, anchors }
    }

    /// Kind of the first span containing `pos`, if any.
    pub fn kind_at(&self, pos: usize) -> Option<MeetingKind> {
        self.spans.iter().find(|s| s.contains(pos)).map(|s| s.kind)
    }

    /// Up to [`CONTEXT_CHARS`] characters preceding `pos`, never reaching
    /// back past the most recent heading line.
    pub fn context_before<'t>(&self, text: &'t str, pos: usize) -> &'t str {
        let head = &text[..pos];
        let window_start = head
            .char_indices()
            .rev()
            .nth(CONTEXT_CHARS - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let anchor = self
            .anchors
            .iter()
            .rev()
            .find(|&&a| a <= pos)
            .copied()
            .unwrap_or(0);
        &head[window_start.max(anchor)..]
    }
}
