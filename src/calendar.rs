//! Calendar-facing views of a parsed schedule: weekly event records for an
//! external event sink, and an iCalendar export.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use schedule_types::{CourseSchedule, Meeting, MeetingKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};

const PRODID: &str = "-//syllabus-extract//Weekly Schedule//EN";
const ICS_DATETIME: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// Local wall-clock time, `YYYY-MM-DDTHH:MM:SS`
    pub date_time: String,
    pub time_zone: String,
}

/// One recurring event, shaped for a calendar API insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub recurrence: Vec<String>,
}

/// Everything handed to the event sink for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarBatch {
    pub calendar_id: String,
    pub events: Vec<EventRecord>,
}

// ── Dates and rules ──────────────────────────────────────────────────

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// First date on or after `term_start` that falls on one of the meeting's
/// days; `term_start` itself when the meeting has no days.
pub fn first_occurrence(meeting: &Meeting, term_start: NaiveDate) -> NaiveDate {
    (0..7)
        .map(|offset| term_start + Duration::days(offset))
        .find(|date| {
            let idx = date.weekday().num_days_from_monday();
            meeting.days.iter().any(|d| d.index() == idx)
        })
        .unwrap_or(term_start)
}

/// `RRULE:FREQ=WEEKLY;BYDAY=…`, with an inclusive `UNTIL` when the term end
/// is known. `None` for a meeting without days.
pub fn weekly_rule(meeting: &Meeting, until: Option<NaiveDate>) -> Option<String> {
    if meeting.days.is_empty() {
        return None;
    }
    let mut rule = format!("RRULE:FREQ=WEEKLY;BYDAY={}", meeting.byday());
    if let Some(until) = until {
        rule.push_str(&format!(";UNTIL={}T235959", until.format("%Y%m%d")));
    }
    Some(rule)
}

fn summary(course_name: Option<&str>, kind: MeetingKind) -> String {
    match course_name {
        Some(name) if !name.is_empty() => format!("{name} {}", kind.label()),
        _ => kind.label().to_string(),
    }
}

/// Start and end of the first occurrence. `None` if the stored times do
/// not parse, which a deduplicated schedule never contains.
fn first_window(meeting: &Meeting, term_start: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let date = first_occurrence(meeting, term_start);
    let start = parse_hhmm(&meeting.start_24h)?;
    let end = parse_hhmm(&meeting.end_24h)?;
    Some((date.and_time(start), date.and_time(end)))
}

/// Event record for one meeting, first occurrence on or after `term_start`.
pub fn meeting_event(
    course_name: Option<&str>,
    meeting: &Meeting,
    term_start: NaiveDate,
    term_end: Option<NaiveDate>,
    time_zone: &str,
) -> Option<EventRecord> {
    let (start, end) = first_window(meeting, term_start)?;
    let at = |dt: NaiveDateTime| EventTime {
        date_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        time_zone: time_zone.to_string(),
    };

    Some(EventRecord {
        summary: summary(course_name, meeting.kind),
        description: format!("Meets {}", meeting.days_text),
        location: meeting.location.clone(),
        start: at(start),
        end: at(end),
        recurrence: weekly_rule(meeting, term_end).into_iter().collect(),
    })
}

fn require_term_start(config: &ExtractConfig) -> Result<NaiveDate> {
    config.term_start.ok_or_else(|| ExtractError::Config {
        message: "term_start is required for calendar output".into(),
    })
}

/// Event records for every meeting of a schedule, addressed to the
/// configured calendar.
pub fn calendar_batch(schedule: &CourseSchedule, config: &ExtractConfig) -> Result<CalendarBatch> {
    let term_start = require_term_start(config)?;
    let events: Vec<EventRecord> = schedule
        .meetings
        .iter()
        .filter_map(|m| {
            meeting_event(
                schedule.course_name.as_deref(),
                m,
                term_start,
                config.term_end,
                &config.timezone,
            )
        })
        .collect();
    debug!(events = events.len(), calendar = config.calendar_id.as_str(), "calendar batch");

    Ok(CalendarBatch {
        calendar_id: config.calendar_id.clone(),
        events,
    })
}

/// Exam slot on `exam_date` at the time of the first lecture, else of the
/// first meeting of any kind.
pub fn exam_window(schedule: &CourseSchedule, exam_date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let meeting = schedule
        .meetings_of(MeetingKind::Class)
        .next()
        .or_else(|| schedule.meetings.first())?;
    let start = parse_hhmm(&meeting.start_24h)?;
    let end = parse_hhmm(&meeting.end_24h)?;
    Some((exam_date.and_time(start), exam_date.and_time(end)))
}

// ── iCalendar ────────────────────────────────────────────────────────

/// Escape a TEXT value: backslash, semicolon, comma and newline.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

fn uid_slug(course_name: Option<&str>) -> String {
    let slug: String = course_name
        .unwrap_or("course")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

/// Render a schedule as an iCalendar document, one weekly VEVENT per
/// meeting. `stamp` is the UTC creation time written to DTSTAMP.
pub fn to_ics(schedule: &CourseSchedule, config: &ExtractConfig, stamp: NaiveDateTime) -> Result<String> {
    let term_start = require_term_start(config)?;
    let course = schedule.course_name.as_deref();
    let tz = config.timezone.as_str();

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(course.unwrap_or("Course Schedule"))),
    ];

    for (i, meeting) in schedule.meetings.iter().enumerate() {
        let Some((start, end)) = first_window(meeting, term_start) else {
            continue;
        };
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!(
            "UID:{}-{}-{}@syllabus-extract",
            uid_slug(course),
            i + 1,
            start.format("%Y%m%d")
        ));
        lines.push(format!("DTSTAMP:{}Z", stamp.format(ICS_DATETIME)));
        lines.push(format!("DTSTART;TZID={tz}:{}", start.format(ICS_DATETIME)));
        lines.push(format!("DTEND;TZID={tz}:{}", end.format(ICS_DATETIME)));
        if let Some(rule) = weekly_rule(meeting, config.term_end) {
            lines.push(rule);
        }
        lines.push(format!("SUMMARY:{}", escape_text(&summary(course, meeting.kind))));
        if let Some(location) = &meeting.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push(format!("CATEGORIES:{}", meeting.kind.as_str()));
        lines.push("END:VEVENT".into());
    }

    lines.push("END:VCALENDAR".into());
    Ok(lines.join("\r\n") + "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_types::Weekday;

    fn meeting(days: &[Weekday], start: &str, end: &str, kind: MeetingKind) -> Meeting {
        Meeting {
            days_text: "MWF".into(),
            days: days.to_vec(),
            start_24h: start.into(),
            end_24h: end.into(),
            location: Some("Room 101, North".into()),
            kind,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule() -> CourseSchedule {
        CourseSchedule {
            course_name: Some("PHYS 110".into()),
            meetings: vec![
                meeting(&[Weekday::Tu], "14:00", "15:00", MeetingKind::Office),
                meeting(&[Weekday::Mo, Weekday::We, Weekday::Fr], "10:00", "10:50", MeetingKind::Class),
            ],
        }
    }

    fn config() -> ExtractConfig {
        ExtractConfig {
            term_start: Some(date(2024, 9, 3)), // a Tuesday
            term_end: Some(date(2024, 12, 13)),
            ..Default::default()
        }
    }

    // ── rules ────────────────────────────────────────────────────────

    #[test]
    fn test_weekly_rule() {
        let m = meeting(&[Weekday::Mo, Weekday::We, Weekday::Fr], "10:00", "10:50", MeetingKind::Class);
        assert_eq!(weekly_rule(&m, None).as_deref(), Some("RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR"));
        assert_eq!(
            weekly_rule(&m, Some(date(2024, 12, 13))).as_deref(),
            Some("RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20241213T235959")
        );
        let no_days = meeting(&[], "10:00", "10:50", MeetingKind::Class);
        assert_eq!(weekly_rule(&no_days, None), None);
    }

    #[test]
    fn test_first_occurrence_lands_on_meeting_day() {
        let mwf = meeting(&[Weekday::Mo, Weekday::We, Weekday::Fr], "10:00", "10:50", MeetingKind::Class);
        assert_eq!(first_occurrence(&mwf, date(2024, 9, 3)), date(2024, 9, 4));
        let tu = meeting(&[Weekday::Tu], "14:00", "15:00", MeetingKind::Office);
        assert_eq!(first_occurrence(&tu, date(2024, 9, 3)), date(2024, 9, 3));
        let none = meeting(&[], "14:00", "15:00", MeetingKind::Office);
        assert_eq!(first_occurrence(&none, date(2024, 9, 3)), date(2024, 9, 3));
    }

    // ── event records ────────────────────────────────────────────────

    #[test]
    fn test_calendar_batch() {
        let batch = calendar_batch(&schedule(), &config()).unwrap();
        assert_eq!(batch.calendar_id, "primary");
        assert_eq!(batch.events.len(), 2);

        let lecture = &batch.events[1];
        assert_eq!(lecture.summary, "PHYS 110 Lecture");
        assert_eq!(lecture.start.date_time, "2024-09-04T10:00:00");
        assert_eq!(lecture.end.date_time, "2024-09-04T10:50:00");
        assert_eq!(lecture.start.time_zone, "America/Los_Angeles");
        assert_eq!(lecture.recurrence, vec!["RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20241213T235959"]);
        assert_eq!(batch.events[0].summary, "PHYS 110 Office Hours");
    }

    #[test]
    fn test_event_json_uses_api_field_names() {
        let batch = calendar_batch(&schedule(), &config()).unwrap();
        let json = serde_json::to_value(&batch.events[0]).unwrap();
        assert_eq!(json["start"]["dateTime"], "2024-09-03T14:00:00");
        assert_eq!(json["start"]["timeZone"], "America/Los_Angeles");
    }

    #[test]
    fn test_term_start_required() {
        let err = calendar_batch(&schedule(), &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
    }

    #[test]
    fn test_exam_window_prefers_lecture() {
        let (start, end) = exam_window(&schedule(), date(2024, 10, 15)).unwrap();
        assert_eq!(start.to_string(), "2024-10-15 10:00:00");
        assert_eq!(end.to_string(), "2024-10-15 10:50:00");

        let office_only = CourseSchedule {
            course_name: None,
            meetings: vec![meeting(&[Weekday::Tu], "14:00", "15:00", MeetingKind::Office)],
        };
        let (start, _) = exam_window(&office_only, date(2024, 10, 15)).unwrap();
        assert_eq!(start.to_string(), "2024-10-15 14:00:00");

        assert_eq!(exam_window(&CourseSchedule::default(), date(2024, 10, 15)), None);
    }

    // ── ics ──────────────────────────────────────────────────────────

    #[test]
    fn test_ics_document() {
        let stamp = date(2024, 8, 1).and_hms_opt(12, 0, 0).unwrap();
        let ics = to_ics(&schedule(), &config(), stamp).unwrap();
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VCALENDAR");
        assert!(lines.contains(&"X-WR-CALNAME:PHYS 110"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(lines.contains(&"UID:phys-110-2-20240904@syllabus-extract"));
        assert!(lines.contains(&"DTSTAMP:20240801T120000Z"));
        assert!(lines.contains(&"DTSTART;TZID=America/Los_Angeles:20240904T100000"));
        assert!(lines.contains(&"DTEND;TZID=America/Los_Angeles:20240904T105000"));
        assert!(lines.contains(&"LOCATION:Room 101\\, North"));
        assert!(lines.contains(&"CATEGORIES:OFFICE"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a;b,c\\d\ne"), "a\\;b\\,c\\\\d\\ne");
    }
}
