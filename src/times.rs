use std::fmt;

/// Regex fragment for a start/end time pair with optional AM/PM markers.
///
/// Named groups: `t1`, `a1`, `t2`, `a2`. Only horizontal whitespace is
/// allowed between the pieces so a range never spans two lines.
pub const TIME_RANGE_RE: &str = r"(?i:\b(?P<t1>\d{1,2}(?::\d{2})?)[ \t]*(?P<a1>[ap]\.?[ \t]?m\b\.?)?[ \t]*(?:-|\bto\b|\buntil\b)[ \t]*(?P<t2>\d{1,2}(?::\d{2})?)[ \t]*(?P<a2>[ap]\.?[ \t]?m\b\.?)?)";

/// Bare hours in this range carry no AM/PM marker but are read as
/// afternoon: classes are not scheduled at 1-6 AM.
const AFTERNOON_BARE_HOURS: std::ops::RangeInclusive<u8> = 1..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Parse "am", "PM", "a.m.", "p. m." …
    pub fn parse(s: &str) -> Option<Self> {
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match cleaned.as_str() {
            "am" | "a" => Some(Self::Am),
            "pm" | "p" => Some(Self::Pm),
            _ => None,
        }
    }
}

/// Wall-clock time of day. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Parse "H" or "H:MM" with a 1-2 digit hour.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = match s.split_once(':') {
            Some((h, m)) => (h, m),
            None => (s, "00"),
        };
        let hour: u8 = h.trim().parse().ok()?;
        let minute: u8 = m.trim().parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// 12-hour to 24-hour conversion under an explicit marker.
    fn with_meridiem(self, meridiem: Meridiem) -> Self {
        let hour = match (meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Pm, h) if h < 12 => h + 12,
            (_, h) => h,
        };
        Self { hour, ..self }
    }

    fn plus_twelve(self) -> Self {
        Self {
            hour: self.hour + 12,
            ..self
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Resolve a start/end pair to 24-hour times.
///
/// Rules, in order:
/// 1. A marker on either side governs both sides ("1-2pm" is PM-PM).
/// 2. Standard 12-hour conversion for marked times.
/// 3. With no marker at all, bare hours 1-6 read as afternoon. When the
///    written start hour is below 12 and the end is still not after the
///    start, the end moves past noon ("10-1" is 10:00-13:00). A 24-hour
///    start such as "13:00-9:00" is left inverted.
///
/// Returns `None` when either time is not a valid clock reading.
pub fn resolve_time_range(
    t1: &str,
    a1: Option<&str>,
    t2: &str,
    a2: Option<&str>,
) -> Option<(ClockTime, ClockTime)> {
    let start = ClockTime::parse(t1)?;
    let end = ClockTime::parse(t2)?;

    let m1 = a1.and_then(Meridiem::parse);
    let m2 = a2.and_then(Meridiem::parse);

    if let Some(marker) = m1.or(m2) {
        let start = start.with_meridiem(m1.unwrap_or(marker));
        let end = end.with_meridiem(m2.unwrap_or(marker));
        return Some((start, end));
    }

    let afternoon = |t: ClockTime| {
        if AFTERNOON_BARE_HOURS.contains(&t.hour) {
            t.plus_twelve()
        } else {
            t
        }
    };
    let written_start = start.hour;
    let start = afternoon(start);
    let mut end = afternoon(end);

    if end <= start && written_start < 12 && end.hour < 12 {
        end = end.plus_twelve();
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(t1: &str, a1: Option<&str>, t2: &str, a2: Option<&str>) -> (String, String) {
        let (s, e) = resolve_time_range(t1, a1, t2, a2).unwrap();
        (s.to_string(), e.to_string())
    }

    fn pair(s: &str, e: &str) -> (String, String) {
        (s.to_string(), e.to_string())
    }

    #[test]
    fn test_meridiem_parse() {
        assert_eq!(Meridiem::parse("AM"), Some(Meridiem::Am));
        assert_eq!(Meridiem::parse("p.m."), Some(Meridiem::Pm));
        assert_eq!(Meridiem::parse("a. m."), Some(Meridiem::Am));
        assert_eq!(Meridiem::parse("xm"), None);
    }

    #[test]
    fn test_clock_parse_bounds() {
        assert_eq!(ClockTime::parse("9"), Some(ClockTime { hour: 9, minute: 0 }));
        assert_eq!(ClockTime::parse("13:05"), Some(ClockTime { hour: 13, minute: 5 }));
        assert_eq!(ClockTime::parse("24:00"), None);
        assert_eq!(ClockTime::parse("10:75"), None);
    }

    #[test]
    fn test_single_marker_governs_both_sides() {
        assert_eq!(resolve("1", None, "2", Some("pm")), pair("13:00", "14:00"));
        assert_eq!(resolve("9", None, "10", Some("am")), pair("09:00", "10:00"));
        assert_eq!(resolve("10:00", None, "10:50", Some("AM")), pair("10:00", "10:50"));
        assert_eq!(resolve("1:00", Some("p.m."), "2:50", None), pair("13:00", "14:50"));
    }

    #[test]
    fn test_explicit_markers_each_side() {
        assert_eq!(resolve("11", Some("am"), "12:15", Some("pm")), pair("11:00", "12:15"));
        assert_eq!(resolve("12", Some("am"), "1", Some("am")), pair("00:00", "01:00"));
    }

    #[test]
    fn test_bare_afternoon_hours() {
        assert_eq!(resolve("1:30", None, "2:20", None), pair("13:30", "14:20"));
        assert_eq!(resolve("12", None, "1:15", None), pair("12:00", "13:15"));
    }

    #[test]
    fn test_bare_morning_kept_literal() {
        assert_eq!(resolve("9", None, "10", None), pair("09:00", "10:00"));
        assert_eq!(resolve("7:30", None, "8:45", None), pair("07:30", "08:45"));
        assert_eq!(resolve("13:00", None, "14:15", None), pair("13:00", "14:15"));
    }

    #[test]
    fn test_inverted_bare_range_crosses_noon() {
        assert_eq!(resolve("10", None, "1", None), pair("10:00", "13:00"));
        assert_eq!(resolve("11:30", None, "12:20", None), pair("11:30", "12:20"));
        assert_eq!(resolve("6", None, "9", None), pair("18:00", "21:00"));
    }

    #[test]
    fn test_inverted_24h_range_left_alone() {
        assert_eq!(resolve("13:00", None, "9:00", None), pair("13:00", "09:00"));
        assert_eq!(resolve("18:30", None, "17:00", None), pair("18:30", "17:00"));
    }

    #[test]
    fn test_invalid_times() {
        assert!(resolve_time_range("25", None, "26", None).is_none());
        assert!(resolve_time_range("9:99", None, "10", None).is_none());
    }
}
