use schedule_types::CourseSchedule;
use tracing::debug;

use crate::course_name::guess_course_name;
use crate::dedupe::dedupe_meetings;
use crate::matcher::match_schedule_lines;
use crate::normalize::normalize;
use crate::sections::SectionMap;
use crate::stitcher::stitch_split_lines;

/// Parse one syllabus document into its weekly meeting pattern.
///
/// Pure and infallible: text without any day, time or course code simply
/// yields an empty schedule. Offsets used by every pass refer to the
/// normalized text.
pub fn parse_schedule(raw: &str) -> CourseSchedule {
    let text = normalize(raw);
    let sections = SectionMap::build(&text);
    debug!(spans = sections.spans.len(), bytes = text.len(), "section spans");

    let mut meetings = match_schedule_lines(&text, &sections);
    let primary = meetings.len();
    meetings.extend(stitch_split_lines(&text, &sections));
    debug!(primary, stitched = meetings.len() - primary, "candidate meetings");

    CourseSchedule {
        course_name: guess_course_name(&text),
        meetings: dedupe_meetings(meetings),
    }
}
