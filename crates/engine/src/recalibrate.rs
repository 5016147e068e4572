//! TLX-triggered recalibration of fatigue weights (spec.md §4.8).

use cogscheduler_domain::{TlxEntry, UpdatedWeights};

const ALPHA: f64 = 0.05;
const BETA: f64 = 0.05;
const BASELINE: f64 = 0.5;
const RECALIBRATION_WINDOW: usize = 6;

/// Whether appending an entry brings the user's TLX log to a multiple of
/// three — the trigger for recalibration.
pub fn should_recalibrate(entry_count_after_append: usize) -> bool {
    entry_count_after_append > 0 && entry_count_after_append % 3 == 0
}

fn normalize(x: i32) -> f64 {
    (x as f64 - 1.0) / 6.0
}

/// Recompute the three fatigue weights from the most recent (up to
/// [`RECALIBRATION_WINDOW`]) TLX entries. `entries` must be non-empty and
/// ordered oldest-first; only the tail is read.
pub fn recalibrate(entries: &[TlxEntry], current: UpdatedWeights) -> UpdatedWeights {
    if entries.is_empty() {
        return current;
    }
    let window = &entries[entries.len().saturating_sub(RECALIBRATION_WINDOW)..];
    let n = window.len() as f64;
    let md = window.iter().map(|e| normalize(e.mental_demand)).sum::<f64>() / n;
    let ef = window.iter().map(|e| normalize(e.effort)).sum::<f64>() / n;

    UpdatedWeights {
        fatigue_consec_weight: (current.fatigue_consec_weight + ALPHA * (md - BASELINE)).clamp(0.05, 0.60),
        fatigue_total_weight: (current.fatigue_total_weight + ALPHA * (ef - BASELINE)).clamp(0.05, 0.60),
        fatigue_force_break: (current.fatigue_force_break - BETA * ((md + ef) / 2.0 - BASELINE))
            .clamp(0.40, 0.90),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(mental_demand: i32, effort: i32) -> TlxEntry {
        TlxEntry {
            block_index: 0,
            mental_demand,
            effort,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn triggers_every_third_entry() {
        assert!(!should_recalibrate(1));
        assert!(!should_recalibrate(2));
        assert!(should_recalibrate(3));
        assert!(!should_recalibrate(4));
        assert!(should_recalibrate(6));
    }

    #[test]
    fn high_demand_and_effort_raise_weights_and_lower_force_break() {
        let current = UpdatedWeights {
            fatigue_consec_weight: 0.4,
            fatigue_total_weight: 0.3,
            fatigue_force_break: 0.75,
        };
        let entries = vec![entry(5, 5), entry(5, 5), entry(5, 5)];
        let updated = recalibrate(&entries, current);

        assert!(updated.fatigue_consec_weight >= 0.40);
        assert!(updated.fatigue_total_weight > current.fatigue_total_weight);
        assert!(updated.fatigue_force_break < current.fatigue_force_break);
    }

    #[test]
    fn weights_stay_within_clamp_ranges() {
        let current = UpdatedWeights {
            fatigue_consec_weight: 0.58,
            fatigue_total_weight: 0.58,
            fatigue_force_break: 0.42,
        };
        let entries = vec![entry(7, 7); 6];
        let updated = recalibrate(&entries, current);

        assert!((0.05..=0.60).contains(&updated.fatigue_consec_weight));
        assert!((0.05..=0.60).contains(&updated.fatigue_total_weight));
        assert!((0.40..=0.90).contains(&updated.fatigue_force_break));
    }

    #[test]
    fn window_caps_at_six_most_recent_entries() {
        let current = UpdatedWeights {
            fatigue_consec_weight: 0.4,
            fatigue_total_weight: 0.3,
            fatigue_force_break: 0.75,
        };
        let mut entries = vec![entry(1, 1); 10];
        entries.extend(vec![entry(7, 7); 6]);
        let updated = recalibrate(&entries, current);
        // Only the trailing six (all 7,7) should be read, pushing weights up.
        assert!(updated.fatigue_consec_weight > current.fatigue_consec_weight);
    }
}
