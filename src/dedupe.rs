use schedule_types::{Meeting, MeetingKind, Weekday};
use std::collections::HashSet;
use tracing::debug;

type MeetingKey = (Vec<Weekday>, String, String, Option<String>, MeetingKind);

fn key(m: &Meeting) -> MeetingKey {
    (
        m.days.clone(),
        m.start_24h.clone(),
        m.end_24h.clone(),
        m.location.as_ref().map(|l| l.to_lowercase()),
        m.kind,
    )
}

/// Drop meetings that do not end after they start, then keep the first
/// of each (days, start, end, location, kind) group in input order.
pub fn dedupe_meetings(meetings: Vec<Meeting>) -> Vec<Meeting> {
    let total = meetings.len();
    let mut seen: HashSet<MeetingKey> = HashSet::new();

    let kept: Vec<Meeting> = meetings
        .into_iter()
        .filter(Meeting::is_well_formed)
        .filter(|m| seen.insert(key(m)))
        .collect();

    debug!(total, kept = kept.len(), "deduplicated meetings");
    kept
}
