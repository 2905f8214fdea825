use serde::{Deserialize, Serialize};

// ── Weekday ──────────────────────────────────────────────────────────────

/// Canonical two-letter weekday code, serialized as `MO`, `TU`, … `SU`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    /// Monday through Friday, in calendar order.
    pub const WORKWEEK: [Weekday; 5] = [Self::Mo, Self::Tu, Self::We, Self::Th, Self::Fr];

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Mo => "MO",
            Self::Tu => "TU",
            Self::We => "WE",
            Self::Th => "TH",
            Self::Fr => "FR",
            Self::Sa => "SA",
            Self::Su => "SU",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MO" => Some(Self::Mo),
            "TU" => Some(Self::Tu),
            "WE" => Some(Self::We),
            "TH" => Some(Self::Th),
            "FR" => Some(Self::Fr),
            "SA" => Some(Self::Sa),
            "SU" => Some(Self::Su),
            _ => None,
        }
    }

    /// Days since Monday (Monday = 0).
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

// ── Meeting kind ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeetingKind {
    /// Regular lecture / class meeting
    #[default]
    Class,
    Lab,
    /// Discussion, recitation, precept, tutorial section
    Discussion,
    /// Office / student / instructor hours
    Office,
}

impl MeetingKind {
    /// Human-facing label used in calendar summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Class => "Lecture",
            Self::Lab => "Lab",
            Self::Discussion => "Discussion",
            Self::Office => "Office Hours",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "CLASS",
            Self::Lab => "LAB",
            Self::Discussion => "DISCUSSION",
            Self::Office => "OFFICE",
        }
    }
}

// ── Meeting ──────────────────────────────────────────────────────────────

/// One recurring class-meeting pattern.
///
/// Built once by the extractor and never edited afterwards; later passes
/// only filter or drop whole meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Days text exactly as it appeared, e.g. "MWF", "Tu/Th"
    pub days_text: String,
    pub days: Vec<Weekday>,
    /// Zero-padded 24-hour "HH:MM"
    pub start_24h: String,
    pub end_24h: String,
    /// Free-text location, or the literal "TBD"
    pub location: Option<String>,
    pub kind: MeetingKind,
}

impl Meeting {
    /// Comma-joined weekday codes, e.g. "MO,WE,FR".
    pub fn byday(&self) -> String {
        self.days
            .iter()
            .map(Weekday::as_code)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// True when the end time is strictly after the start time.
    pub fn is_well_formed(&self) -> bool {
        self.end_24h > self.start_24h
    }
}

// ── Parsed document ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseSchedule {
    pub course_name: Option<String>,
    pub meetings: Vec<Meeting>,
}

impl CourseSchedule {
    pub fn meetings_of(&self, kind: MeetingKind) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter().filter(move |m| m.kind == kind)
    }
}
