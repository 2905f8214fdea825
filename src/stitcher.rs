//! Secondary pass for meetings split across lines:
//!
//! ```text
//! Lecture days: Tuesday / Thursday
//! 11:00 am - 12:15 pm
//! Location: Kemper 1002
//! ```

use regex::Regex;
use schedule_types::Meeting;
use std::sync::LazyLock;
use tracing::trace;

use crate::days::build_days_block_regex;
use crate::matcher::{Candidate, LOCATION_LEAD_RE, LOCATION_RE, clean_location};
use crate::normalize::lines_with_offsets;
use crate::sections::SectionMap;
use crate::times::TIME_RANGE_RE;

/// How many lines after a days line may hold its time range.
const TIME_LOOKAHEAD: usize = 2;

static RE_DAYS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[ \t]*(?i:(?:(?:class|lecture|meeting)[ \t]+days?|days?|meets|class|lectures?|when)[ \t]*:?[ \t]*)?(?P<days>{})[ \t]*[:.,;]?[ \t]*$",
        build_days_block_regex()
    ))
    .expect("days-only regex")
});

static RE_TIME_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[ \t]*(?i:(?:times?|hours?|from)[ \t]*:?[ \t]*)?{TIME_RANGE_RE}[ \t]*[.,;]?[ \t]*$"
    ))
    .expect("time-only regex")
});

static RE_LOCATION_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[ \t]*(?i:(?:location|where|room|place)[ \t]*:[ \t]*)?{LOCATION_LEAD_RE}(?P<loc>{LOCATION_RE})[ \t]*\)?[ \t]*$"
    ))
    .expect("location-only regex")
});

/// Recover meetings whose days, time and location sit on consecutive
/// lines. A blank line counts as one of the lookahead lines.
pub fn stitch_split_lines(text: &str, sections: &SectionMap) -> Vec<Meeting> {
    let lines = lines_with_offsets(text);
    let mut meetings = Vec::new();

    for (i, &(offset, line)) in lines.iter().enumerate() {
        let Some(days_caps) = RE_DAYS_ONLY.captures(line) else {
            continue;
        };
        let Some(days) = days_caps.name("days") else {
            continue;
        };

        let Some((j, time_caps)) = lines
            .iter()
            .enumerate()
            .skip(i + 1)
            .take(TIME_LOOKAHEAD)
            .find_map(|(j, &(_, l))| RE_TIME_ONLY.captures(l).map(|c| (j, c)))
        else {
            continue;
        };

        let location = lines
            .get(j + 1)
            .and_then(|&(_, l)| RE_LOCATION_ONLY.captures(l))
            .and_then(|c| c.name("loc").and_then(|m| clean_location(m.as_str())));

        let time_text = time_caps.get(0).map_or("", |m| m.as_str().trim());
        let synthesized = format!(
            "{} {} {}",
            line.trim(),
            time_text,
            location.as_deref().unwrap_or("")
        );
        let synthesized = synthesized.trim_end();

        let (Some(t1), Some(t2)) = (time_caps.name("t1"), time_caps.name("t2")) else {
            continue;
        };
        let candidate = Candidate {
            days_text: days.as_str().trim(),
            t1: t1.as_str(),
            a1: time_caps.name("a1").map(|m| m.as_str()),
            t2: t2.as_str(),
            a2: time_caps.name("a2").map(|m| m.as_str()),
            location,
            line: synthesized,
            statement: synthesized,
            pos: offset + days.start(),
        };

        if let Some(meeting) = candidate.into_meeting(text, sections) {
            trace!(?meeting, days_line = i, time_line = j, "stitched match");
            meetings.push(meeting);
        }
    }

    meetings
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_types::{MeetingKind, Weekday};

    fn run(text: &str) -> Vec<Meeting> {
        stitch_split_lines(text, &SectionMap::build(text))
    }

    #[test]
    fn test_days_then_time_then_location() {
        let m = run("Lecture days: Tuesday / Thursday\n11:00 am - 12:15 pm\nLocation: Kemper 1002");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].days, vec![Weekday::Tu, Weekday::Th]);
        assert_eq!((m[0].start_24h.as_str(), m[0].end_24h.as_str()), ("11:00", "12:15"));
        assert_eq!(m[0].location.as_deref(), Some("Kemper 1002"));
        assert_eq!(m[0].kind, MeetingKind::Class);
    }

    #[test]
    fn test_time_two_lines_down() {
        let m = run("MWF\n(see below)\n9-9:50am");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].days, vec![Weekday::Mo, Weekday::We, Weekday::Fr]);
        assert_eq!(m[0].start_24h, "09:00");
        assert_eq!(m[0].location, None);
    }

    #[test]
    fn test_time_too_far_away() {
        assert!(run("MWF\none\ntwo\n9-9:50am").is_empty());
    }

    #[test]
    fn test_blank_line_between_days_and_time() {
        let m = run("Monday / Wednesday\n\n1:30-2:45pm");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].days, vec![Weekday::Mo, Weekday::We]);
        assert_eq!((m[0].start_24h.as_str(), m[0].end_24h.as_str()), ("13:30", "14:45"));
    }

    #[test]
    fn test_two_blank_lines_exhaust_lookahead() {
        assert!(run("MWF\n\n\n9-9:50am").is_empty());
    }

    #[test]
    fn test_office_block_split_across_lines() {
        let m = run("Office Hours:\nWednesday\n2-3pm\nRm 210");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].kind, MeetingKind::Office);
        assert_eq!(m[0].days, vec![Weekday::We]);
        assert_eq!((m[0].start_24h.as_str(), m[0].end_24h.as_str()), ("14:00", "15:00"));
        assert_eq!(m[0].location.as_deref(), Some("Rm 210"));
    }

    #[test]
    fn test_same_line_statements_ignored() {
        assert!(run("Meets: MWF 10:00-10:50 AM (Room 101)").is_empty());
    }
}
