//! ICS calendar export (spec.md §6 "ICS export").
//!
//! An engine-adjacent serialization, not an adapter: the engine emits the
//! document itself, while the actual calendar-sync integration (pushing it
//! to Google/Outlook/etc.) stays an external collaborator.

use chrono::NaiveDate;
use cogscheduler_domain::Block;

use crate::clock::parse_hhmm;

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

fn fold_line(line: &str) -> String {
    // RFC 5545 content lines fold at 75 octets; these fields are short
    // enough in practice that folding rarely triggers, but stay correct.
    if line.len() <= 75 {
        return line.to_string();
    }
    let mut folded = String::new();
    let mut rest = line;
    let mut first = true;
    while !rest.is_empty() {
        let take = rest.len().min(if first { 75 } else { 74 });
        let (chunk, remainder) = rest.split_at(take);
        if !first {
            folded.push_str("\r\n ");
        }
        folded.push_str(chunk);
        rest = remainder;
        first = false;
    }
    folded
}

fn stamp(date: NaiveDate, minutes: u32) -> String {
    format!(
        "{}T{:02}{:02}00",
        date.format("%Y%m%d"),
        minutes / 60,
        minutes % 60
    )
}

/// Render the day's non-break blocks as an ICS document. `date` anchors the
/// block `HH:MM` times to a calendar day; times are written floating-local
/// (no trailing `Z`), per spec.md §6.
pub fn blocks_to_ics(blocks: &[Block], date: NaiveDate) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//CogScheduler//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for (index, block) in blocks.iter().filter(|b| !b.is_break).enumerate() {
        let Ok(start) = parse_hhmm(&block.start_time) else {
            continue;
        };
        let Ok(end) = parse_hhmm(&block.end_time) else {
            continue;
        };

        let description = format!(
            "{} (load {:.1}, energy {:.2}, fatigue {:.2})",
            block.explanation, block.cognitive_load, block.energy_at_start, block.fatigue_at_start
        );

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(fold_line(&format!(
            "UID:{}-{}@cogscheduler",
            date.format("%Y%m%d"),
            index
        )));
        lines.push(fold_line(&format!("DTSTART:{}", stamp(date, start))));
        lines.push(fold_line(&format!("DTEND:{}", stamp(date, end))));
        lines.push(fold_line(&format!("SUMMARY:{}", escape_text(&block.task_title))));
        lines.push(fold_line(&format!(
            "DESCRIPTION:{}",
            escape_text(&description)
        )));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n") + "\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, start: &str, end: &str, is_break: bool) -> Block {
        Block {
            task_title: title.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            cognitive_load: 7.0,
            energy_at_start: 0.8,
            fatigue_at_start: 0.1,
            is_break,
            explanation: "in the zone".to_string(),
        }
    }

    #[test]
    fn emits_one_vevent_per_non_break_block() {
        let blocks = vec![
            block("Deep Work", "09:00", "09:25", false),
            block("Short Break", "09:25", "09:35", true),
            block("Review", "09:35", "10:00", false),
        ];
        let ics = blocks_to_ics(&blocks, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("SUMMARY:Deep Work"));
        assert!(!ics.contains("SUMMARY:Short Break"));
    }

    #[test]
    fn dtstart_uses_floating_local_time_without_trailing_z() {
        let blocks = vec![block("Deep Work", "09:00", "09:25", false)];
        let ics = blocks_to_ics(&blocks, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        let dtstart_line = ics.lines().find(|l| l.starts_with("DTSTART")).unwrap();
        assert_eq!(dtstart_line, "DTSTART:20260110T090000");
    }

    #[test]
    fn description_carries_explanation_and_metrics() {
        let blocks = vec![block("Deep Work", "09:00", "09:25", false)];
        let ics = blocks_to_ics(&blocks, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        let description_line = ics.lines().find(|l| l.starts_with("DESCRIPTION")).unwrap();
        assert!(description_line.contains("in the zone"));
        assert!(description_line.contains("load 7.0"));
    }
}
