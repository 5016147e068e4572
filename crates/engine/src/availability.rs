//! Availability builder (spec.md §4.4).

use cogscheduler_domain::{EngineError, Profile};

use crate::clock::{Interval, merge_intervals, parse_hhmm};

/// A fixed, externally-imposed interval (lecture, meeting) carried forward
/// into the plan verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCommitment {
    pub interval: Interval,
    pub label: String,
}

/// A user-preferred break the scheduler must honor if it falls in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestedBreak {
    pub interval: Interval,
}

/// Output of the availability builder: ordered free intervals plus the
/// normalized commitments/breaks that were subtracted from the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub free_intervals: Vec<Interval>,
    pub commitments: Vec<FixedCommitment>,
    pub breaks: Vec<SuggestedBreak>,
}

/// Build the day's availability from a scheduling window and profile.
pub fn build_availability(window: Interval, profile: &Profile) -> Result<Availability, EngineError> {
    if window.is_empty() {
        return Err(EngineError::InvalidWindow(format!(
            "available_from ({}) must be before available_to ({})",
            window.start, window.end
        )));
    }

    let commitments = normalize_commitments(window, &profile.daily_commitments)?;
    let breaks = normalize_breaks(window, &profile.break_preferences)?;

    let mut blocked: Vec<Interval> = commitments.iter().map(|c| c.interval).collect();
    blocked.extend(breaks.iter().map(|b| b.interval));
    let blocked = merge_intervals(blocked);

    let mut free = Vec::new();
    let mut cursor = window.start;
    for b in &blocked {
        if b.start > cursor {
            free.push(Interval::new(cursor, b.start));
        }
        cursor = cursor.max(b.end);
    }
    if cursor < window.end {
        free.push(Interval::new(cursor, window.end));
    }

    if free.is_empty() {
        return Err(EngineError::NoFreeTime);
    }

    Ok(Availability {
        free_intervals: free,
        commitments,
        breaks,
    })
}

/// Parse one `"HH:MM-HH:MM label"` entry.
fn parse_commitment_entry(entry: &str) -> Result<(Interval, String), EngineError> {
    let mut parts = entry.splitn(2, ' ');
    let range = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngineError::InvalidWindow(format!("empty commitment entry: {entry:?}")))?;
    let label = parts.next().unwrap_or("Commitment").trim().to_string();
    let (start_s, end_s) = range.split_once('-').ok_or_else(|| {
        EngineError::InvalidWindow(format!("malformed commitment range: {entry:?}"))
    })?;
    Ok((Interval::new(parse_hhmm(start_s)?, parse_hhmm(end_s)?), label))
}

fn normalize_commitments(
    window: Interval,
    raw: &[String],
) -> Result<Vec<FixedCommitment>, EngineError> {
    let mut parsed = Vec::new();
    for entry in raw {
        let (interval, label) = parse_commitment_entry(entry)?;
        // Strictly outside the window is ignored, not clamped or errored.
        if let Some(clamped) = interval.clamp_to(&window) {
            parsed.push((clamped, label));
        }
    }
    parsed.sort_by_key(|(iv, _)| iv.start);

    let mut merged: Vec<(Interval, String)> = Vec::new();
    for (interval, label) in parsed {
        match merged.last_mut() {
            Some((last_iv, last_label)) if interval.start <= last_iv.end => {
                last_iv.end = last_iv.end.max(interval.end);
                *last_label = label;
            }
            _ => merged.push((interval, label)),
        }
    }

    Ok(merged
        .into_iter()
        .map(|(interval, label)| FixedCommitment { interval, label })
        .collect())
}

fn normalize_breaks(window: Interval, raw: &[String]) -> Result<Vec<SuggestedBreak>, EngineError> {
    let mut intervals = Vec::new();
    for entry in raw {
        let (start_s, end_s) = entry.split_once('-').ok_or_else(|| {
            EngineError::InvalidWindow(format!("malformed break preference: {entry:?}"))
        })?;
        let interval = Interval::new(parse_hhmm(start_s)?, parse_hhmm(end_s)?);
        if let Some(clamped) = interval.clamp_to(&window) {
            intervals.push(clamped);
        }
    }
    Ok(merge_intervals(intervals)
        .into_iter()
        .map(|interval| SuggestedBreak { interval })
        .collect())
}
