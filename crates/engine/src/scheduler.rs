//! Scheduler core (spec.md §4.5). Orders tasks, splits them into quanta,
//! walks them across the day's availability, and threads the fatigue
//! accumulator through placement (spec.md §9 "Coupling between fatigue and
//! placement").

use std::time::Instant;

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{Block, EngineError, Profile, Quantum, Task};
use tokio_util::sync::CancellationToken;

use crate::availability::{Availability, build_availability};
use crate::clock::{Interval, Minutes, format_hhmm};
use crate::energy;
use crate::fatigue::FatigueState;
use crate::load;

/// Facts gathered during placement that `warnings.rs` turns into ordered,
/// user-facing strings. Kept separate from `Block` because several warnings
/// depend on aggregates (total requested duration, free time) rather than
/// any single block.
#[derive(Debug, Clone, Default)]
pub struct PlacementFacts {
    pub truncated: bool,
    pub any_deep_work: bool,
    pub max_uninterrupted_deep_min: u32,
    pub any_overcap_load: bool,
    pub total_deep_min: u32,
    pub requested_total_min: u32,
    pub free_total_min: u32,
    pub breaks_emitted: u32,
    /// Set when the soft per-call deadline (spec.md §5) was hit; the plan
    /// returned is the best one produced so far, not an error.
    pub deadline_exceeded: bool,
}

#[derive(Debug, Clone, Copy)]
enum TimelineEvent {
    Free(Interval),
    Commitment(Interval),
    Break(Interval),
}

impl TimelineEvent {
    fn interval(&self) -> Interval {
        match self {
            TimelineEvent::Free(iv) | TimelineEvent::Commitment(iv) | TimelineEvent::Break(iv) => *iv,
        }
    }
}

fn subtract_interval(a: Interval, b: Interval) -> Vec<Interval> {
    if !a.overlaps(&b) {
        return vec![a];
    }
    let mut out = Vec::new();
    if a.start < b.start {
        out.push(Interval::new(a.start, b.start));
    }
    if b.end < a.end {
        out.push(Interval::new(b.end, a.end));
    }
    out
}

/// Tile the window into free / commitment / break events in time order.
/// Preferred breaks that fall inside a commitment are clipped to whatever
/// remains; commitments always win.
fn build_timeline(availability: &Availability) -> Vec<(TimelineEvent, String)> {
    let mut events: Vec<(TimelineEvent, String)> = Vec::new();

    for iv in &availability.free_intervals {
        events.push((TimelineEvent::Free(*iv), String::new()));
    }
    for c in &availability.commitments {
        events.push((TimelineEvent::Commitment(c.interval), c.label.clone()));
    }
    for b in &availability.breaks {
        let mut remaining = vec![b.interval];
        for c in &availability.commitments {
            remaining = remaining
                .into_iter()
                .flat_map(|iv| subtract_interval(iv, c.interval))
                .collect();
        }
        for iv in remaining {
            if !iv.is_empty() {
                events.push((TimelineEvent::Break(iv), String::new()));
            }
        }
    }

    events.sort_by_key(|(e, _)| e.interval().start);
    events
}

struct RankedTask<'a> {
    task: &'a Task,
    load: f64,
    overcap: bool,
    input_order: usize,
}

/// Step A + B: order tasks by `(load, difficulty)` descending, stable on
/// input order, and tag any task whose load exceeds the stress cap.
fn rank_tasks<'a>(tasks: &'a [Task], profile: &Profile, config: &EngineConfig) -> Vec<RankedTask<'a>> {
    let mut ranked: Vec<RankedTask<'a>> = tasks
        .iter()
        .enumerate()
        .map(|(input_order, task)| {
            let load = load::estimate_load(task, profile.lectures_today, config);
            let overcap =
                profile.stress_level >= config.stress_cap_threshold && load > config.max_load_under_stress;
            RankedTask {
                task,
                load,
                overcap,
                input_order,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.load
            .partial_cmp(&a.load)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.task
                    .difficulty
                    .partial_cmp(&a.task.difficulty)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
    ranked
}

/// Step C: split one task's duration into quanta whose durations sum to the
/// original duration, each a multiple of `quantum_min` except possibly the
/// last.
fn split_duration(duration: u32, quantum_min: u32) -> Vec<u32> {
    let quantum_min = quantum_min.max(1);
    if duration == 0 {
        return Vec::new();
    }
    let n = (duration + quantum_min - 1) / quantum_min;
    let mut durations = vec![quantum_min; n as usize];
    let full = quantum_min * (n - 1);
    let remainder = duration.saturating_sub(full);
    if let Some(last) = durations.last_mut() {
        *last = if remainder == 0 { quantum_min } else { remainder };
    }
    durations
}

fn split_into_quanta(ranked: &[RankedTask], config: &EngineConfig) -> Vec<Quantum> {
    let mut quanta = Vec::new();
    for r in ranked {
        for (seq, duration_minutes) in split_duration(r.task.duration_minutes, config.quantum_min)
            .into_iter()
            .enumerate()
        {
            quanta.push(Quantum {
                title: r.task.title.clone(),
                category: r.task.category.clone(),
                cognitive_load: r.load,
                duration_minutes,
                sequence_index: seq as u32,
                difficulty: r.task.difficulty,
                input_order: r.input_order,
                overcap: r.overcap,
            });
        }
    }
    quanta
}

fn explain_block(energy: f64, fatigue: f64, is_deep: bool, overcap: bool, after_break: bool) -> String {
    if overcap {
        "load exceeds the stress cap but scheduled anyway".to_string()
    } else if after_break {
        "scheduled after a break for recovery".to_string()
    } else if is_deep && energy >= 0.7 && fatigue < 0.4 {
        "high energy, low fatigue — ideal for deep focus".to_string()
    } else if fatigue >= 0.5 {
        "accumulated fatigue is high; paced deliberately".to_string()
    } else if !is_deep && energy < 0.6 {
        "lighter task placed during an energy dip".to_string()
    } else {
        "scheduled in an open window".to_string()
    }
}

struct MergeTracker {
    index: usize,
    title: String,
    count: u32,
}

/// Step D.6: coalesce up to two consecutive light quanta of the same task
/// into a single output block. Deep quanta never merge — two unmerged
/// 25-min deep blocks keep any consecutive pair at or under
/// `short_break_trigger_min` (spec.md §8 invariant #4); merged they'd double it.
fn try_merge(
    blocks: &mut [Block],
    tracker: &Option<MergeTracker>,
    title: &str,
    start: Minutes,
    end: Minutes,
    is_deep: bool,
) -> bool {
    if is_deep {
        return false;
    }
    let Some(t) = tracker else { return false };
    if t.index != blocks.len() - 1 || t.count >= 2 || t.title != title {
        return false;
    }
    let last = &mut blocks[t.index];
    if last.is_break || last.end_time != format_hhmm(start) {
        return false;
    }
    last.end_time = format_hhmm(end);
    true
}

/// Run the placement loop over one scheduling window. Pure: no I/O, no
/// wall-clock reads beyond the cooperative cancellation check (spec.md §5).
pub fn schedule(
    profile: &Profile,
    config: &EngineConfig,
    tasks: &[Task],
    window: Interval,
    cancel: &CancellationToken,
    deadline: Option<Instant>,
) -> Result<(Vec<Block>, PlacementFacts), EngineError> {
    let availability = build_availability(window, profile)?;
    let events = build_timeline(&availability);
    let free_total_min: u32 = availability.free_intervals.iter().map(|iv| iv.len()).sum();
    let requested_total_min: u32 = tasks.iter().map(|t| t.duration_minutes).sum();

    let ranked = rank_tasks(tasks, profile, config);
    let quanta = split_into_quanta(&ranked, config);

    let mut fatigue = FatigueState::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut merge_tracker: Option<MergeTracker> = None;

    let mut idx = 0usize;
    let mut cursor = window.start;
    let mut truncated = false;
    let mut any_deep_work = false;
    let mut any_overcap_load = false;
    let mut total_deep_min = 0u32;
    let mut max_uninterrupted_deep = 0u32;
    let mut current_uninterrupted = 0u32;
    let mut breaks_emitted = 0u32;
    let mut just_after_break = false;
    let mut deadline_exceeded = false;

    let mut qi = 0usize;
    while qi < quanta.len() {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                deadline_exceeded = true;
                truncated = true;
                break;
            }
        }

        // Emit any commitment / preferred-break events sitting at the cursor.
        while idx < events.len() && events[idx].0.interval().start == cursor {
            match events[idx].0 {
                TimelineEvent::Free(_) => break,
                TimelineEvent::Commitment(iv) => {
                    let label = events[idx].1.clone();
                    let energy_start = energy::energy_at(iv.start, profile, config);
                    let fatigue_start = fatigue.f;
                    blocks.push(Block {
                        task_title: label.clone(),
                        start_time: format_hhmm(iv.start),
                        end_time: format_hhmm(iv.end),
                        cognitive_load: 0.0,
                        energy_at_start: energy_start,
                        fatigue_at_start: fatigue_start,
                        is_break: true,
                        explanation: format!("fixed commitment: {label}"),
                    });
                    merge_tracker = None;
                    cursor = iv.end;
                    idx += 1;
                }
                TimelineEvent::Break(iv) => {
                    let energy_start = energy::energy_at(iv.start, profile, config);
                    let fatigue_start = fatigue.f;
                    fatigue.record_break(iv.len(), config);
                    blocks.push(Block {
                        task_title: "Break".to_string(),
                        start_time: format_hhmm(iv.start),
                        end_time: format_hhmm(iv.end),
                        cognitive_load: 0.0,
                        energy_at_start: energy_start,
                        fatigue_at_start: fatigue_start,
                        is_break: true,
                        explanation: "preferred break".to_string(),
                    });
                    merge_tracker = None;
                    current_uninterrupted = 0;
                    breaks_emitted += 1;
                    just_after_break = true;
                    cursor = iv.end;
                    idx += 1;
                }
            }
        }

        if idx >= events.len() {
            truncated = true;
            break;
        }

        let free_end = match events[idx].0 {
            TimelineEvent::Free(iv) => iv.end,
            // Every blocked event at `cursor` was just drained above; if the
            // current event is still blocked, the timeline has a gap.
            _ => {
                truncated = true;
                break;
            }
        };

        // Step D.3: forced break, only while sitting in free time.
        if fatigue.should_force_break(config) {
            let duration = fatigue.forced_break_duration(config);
            if cursor + duration <= free_end {
                let energy_start = energy::energy_at(cursor, profile, config);
                let fatigue_start = fatigue.f;
                fatigue.record_break(duration, config);
                blocks.push(Block {
                    task_title: "Break".to_string(),
                    start_time: format_hhmm(cursor),
                    end_time: format_hhmm(cursor + duration),
                    cognitive_load: 0.0,
                    energy_at_start: energy_start,
                    fatigue_at_start: fatigue_start,
                    is_break: true,
                    explanation: "forced break to recover from accumulated fatigue".to_string(),
                });
                merge_tracker = None;
                current_uninterrupted = 0;
                breaks_emitted += 1;
                just_after_break = true;
                cursor += duration;
                continue;
            } else {
                idx += 1;
                match events.get(idx) {
                    Some((e, _)) => cursor = e.interval().start,
                    None => {
                        truncated = true;
                        break;
                    }
                }
                continue;
            }
        }

        let quantum = &quanta[qi];
        if cursor + quantum.duration_minutes > free_end {
            idx += 1;
            match events.get(idx) {
                Some((e, _)) => cursor = e.interval().start,
                None => {
                    truncated = true;
                    break;
                }
            }
            continue;
        }

        let start = cursor;
        let end = cursor + quantum.duration_minutes;
        let energy_start = energy::energy_at(start, profile, config);
        let fatigue_start = fatigue.f;
        let is_deep = quantum.cognitive_load >= config.deep_work_load_threshold;

        fatigue.record_work(quantum.duration_minutes, quantum.cognitive_load, config);
        cursor = end;

        if is_deep {
            any_deep_work = true;
            total_deep_min += quantum.duration_minutes;
            current_uninterrupted += quantum.duration_minutes;
            max_uninterrupted_deep = max_uninterrupted_deep.max(current_uninterrupted);
        } else {
            current_uninterrupted = 0;
        }
        if quantum.overcap {
            any_overcap_load = true;
        }

        if try_merge(&mut blocks, &merge_tracker, &quantum.title, start, end, is_deep) {
            if let Some(t) = merge_tracker.as_mut() {
                t.count += 1;
            }
        } else {
            let explanation = explain_block(energy_start, fatigue_start, is_deep, quantum.overcap, just_after_break);
            blocks.push(Block {
                task_title: quantum.title.clone(),
                start_time: format_hhmm(start),
                end_time: format_hhmm(end),
                cognitive_load: quantum.cognitive_load,
                energy_at_start: energy_start,
                fatigue_at_start: fatigue_start,
                is_break: false,
                explanation,
            });
            merge_tracker = if is_deep {
                None
            } else {
                Some(MergeTracker {
                    index: blocks.len() - 1,
                    title: quantum.title.clone(),
                    count: 1,
                })
            };
        }
        just_after_break = false;

        qi += 1;
    }

    if qi < quanta.len() {
        truncated = true;
    }

    let facts = PlacementFacts {
        truncated,
        any_deep_work,
        max_uninterrupted_deep_min: max_uninterrupted_deep,
        any_overcap_load,
        total_deep_min,
        requested_total_min,
        free_total_min,
        breaks_emitted,
        deadline_exceeded,
    };

    Ok((blocks, facts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogscheduler_domain::{Chronotype, Role};

    fn profile(stress: i32, commitments: Vec<&str>, breaks: Vec<&str>) -> Profile {
        Profile {
            name: "Ada".to_string(),
            role: Role::Student,
            chronotype: Chronotype::Normal,
            wake_time: "07:00".to_string(),
            sleep_time: "23:00".to_string(),
            sleep_hours: 7.0,
            stress_level: stress,
            daily_commitments: commitments.into_iter().map(String::from).collect(),
            break_preferences: breaks.into_iter().map(String::from).collect(),
            lectures_today: 0,
            meetings_today: 0,
        }
    }

    fn task(title: &str, category: &str, difficulty: f64, duration: u32, load: Option<f64>) -> Task {
        Task {
            title: title.to_string(),
            category: category.to_string(),
            difficulty,
            duration_minutes: duration,
            cognitive_load: load,
        }
    }

    #[test]
    fn happy_path_orders_by_load_and_respects_breaks() {
        let config = EngineConfig::default();
        let p = profile(2, vec![], vec!["13:00-14:00"]);
        let tasks = vec![
            task("Graph Theory", "math", 8.0, 120, Some(8.2)),
            task("ML Assignment", "programming", 7.0, 90, Some(7.5)),
            task("Chem Review", "science", 4.0, 45, Some(3.0)),
        ];
        let window = Interval::new(9 * 60, 22 * 60);
        let cancel = CancellationToken::new();
        let (blocks, facts) = schedule(&p, &config, &tasks, window, &cancel, None).unwrap();

        assert!(!blocks.is_empty());
        assert_eq!(blocks[0].task_title, "Graph Theory");
        assert!(!facts.truncated);
        for w in blocks.windows(2) {
            assert!(w[0].end_time <= w[1].start_time);
        }
        let lunch = blocks
            .iter()
            .find(|b| b.start_time == "13:00")
            .expect("preferred break honored");
        assert!(lunch.is_break);
        assert_eq!(lunch.end_time, "14:00");
    }

    #[test]
    fn truncates_when_tasks_exceed_window() {
        let config = EngineConfig::default();
        let p = profile(2, vec![], vec![]);
        let tasks: Vec<Task> = (0..10)
            .map(|i| task(&format!("Task {i}"), "reading", 6.0, 90, Some(7.0)))
            .collect();
        let window = Interval::new(9 * 60, 11 * 60);
        let cancel = CancellationToken::new();
        let (blocks, facts) = schedule(&p, &config, &tasks, window, &cancel, None).unwrap();

        assert!(facts.truncated);
        for b in &blocks {
            assert!(b.end_time <= "11:00");
        }
    }

    #[test]
    fn commitment_is_never_overlapped_by_work() {
        let config = EngineConfig::default();
        let p = profile(2, vec!["10:00-11:00 Lecture"], vec![]);
        let tasks = vec![task("Long Task", "reading", 5.0, 180, Some(7.0))];
        let window = Interval::new(9 * 60, 14 * 60);
        let cancel = CancellationToken::new();
        let (blocks, _) = schedule(&p, &config, &tasks, window, &cancel, None).unwrap();

        let lecture = blocks.iter().find(|b| b.task_title == "Lecture").unwrap();
        assert_eq!(lecture.start_time, "10:00");
        assert_eq!(lecture.end_time, "11:00");
        assert!(lecture.is_break);
        for b in &blocks {
            if b.task_title != "Lecture" {
                let overlaps = b.start_time < "11:00" && "10:00" < b.end_time;
                assert!(!overlaps, "{b:?} overlaps the lecture");
            }
        }
    }

    #[test]
    fn forced_break_inserted_before_consecutive_threshold_exceeded() {
        let config = EngineConfig::default();
        let p = profile(2, vec![], vec![]);
        let tasks = vec![task("Deep Work", "math", 9.0, 240, Some(9.0))];
        let window = Interval::new(9 * 60, 16 * 60);
        let cancel = CancellationToken::new();
        let (blocks, _) = schedule(&p, &config, &tasks, window, &cancel, None).unwrap();

        assert!(blocks.iter().any(|b| b.is_break), "expected at least one forced break");
    }

    #[test]
    fn deep_quanta_of_the_same_task_are_not_merged() {
        let config = EngineConfig::default();
        let p = profile(2, vec![], vec![]);
        let tasks = vec![task("Deep Work", "math", 9.0, 50, Some(9.0))];
        let window = Interval::new(9 * 60, 17 * 60);
        let cancel = CancellationToken::new();
        let (blocks, _) = schedule(&p, &config, &tasks, window, &cancel, None).unwrap();

        let deep_blocks: Vec<_> = blocks.iter().filter(|b| b.task_title == "Deep Work").collect();
        assert_eq!(deep_blocks.len(), 2, "two 25-min quanta should stay separate blocks");
        for b in &deep_blocks {
            assert_eq!(b.end_time.as_str(), format_hhmm(parse_minutes(&b.start_time) + config.quantum_min));
        }
    }

    fn parse_minutes(hhmm: &str) -> Minutes {
        let (h, m) = hhmm.split_once(':').unwrap();
        h.parse::<Minutes>().unwrap() * 60 + m.parse::<Minutes>().unwrap()
    }

    #[test]
    fn empty_task_list_yields_empty_plan_and_no_truncation() {
        let config = EngineConfig::default();
        let p = profile(2, vec![], vec![]);
        let window = Interval::new(9 * 60, 17 * 60);
        let cancel = CancellationToken::new();
        let (blocks, facts) = schedule(&p, &config, &[], window, &cancel, None).unwrap();
        assert!(blocks.is_empty());
        assert!(!facts.truncated);
    }
}
