//! Extract weekly class meetings (days, times, locations, kind) from the
//! plain text of a course syllabus.
//!
//! ```
//! use syllabus_extract::{MeetingKind, parse_schedule};
//!
//! let s = parse_schedule("PHYS 110 - Fall 2024\nOffice Hours: M 3-4pm, Rm 210");
//! assert_eq!(s.course_name.as_deref(), Some("PHYS 110"));
//! assert_eq!(s.meetings[0].kind, MeetingKind::Office);
//! ```

pub mod calendar;
pub mod classify;
pub mod config;
pub mod course_name;
pub mod days;
pub mod dedupe;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod scanner;
pub mod schedule;
pub mod sections;
pub mod stitcher;
pub mod times;

pub use config::{ExtractConfig, read_syllabus};
pub use error::ExtractError;
pub use schedule::parse_schedule;
pub use schedule_types::{CourseSchedule, Meeting, MeetingKind, Weekday};
