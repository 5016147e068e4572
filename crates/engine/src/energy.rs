//! Energy curve (spec.md §4.2).
//!
//! The source models the circadian baseline as a sum of Gaussians; spec.md
//! deliberately abstracts that away (§9 Open Questions) and only commits to
//! the peak/trough hours and the `[0.4, 1.0]` baseline range. We use a
//! two-lobe raised-cosine instead: smooth (C¹), hits the peak value exactly
//! at the chronotype's peak hour and the trough value exactly at the trough
//! hour, and costs no special-function dependency.

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{Chronotype, CurvePoint, EnergyCurve, Profile};

use crate::clock::{Interval, Minutes, format_hhmm};

const PEAK_VALUE: f64 = 1.0;
const TROUGH_VALUE: f64 = 0.4;

/// Peak hour (minutes since midnight) for a chronotype (spec.md §4.2).
fn peak_minutes(chronotype: Chronotype) -> Minutes {
    match chronotype {
        Chronotype::Early => 10 * 60,
        Chronotype::Normal => 11 * 60,
        Chronotype::Late => 15 * 60,
    }
}

/// Trough hour. Open Question resolved in DESIGN.md: we use 04:00 for every
/// chronotype, matching the spec's "4:00 for all" reading.
fn trough_minutes(_chronotype: Chronotype) -> Minutes {
    4 * 60
}

/// Raised-cosine circadian baseline `C(t) ∈ [0.4, 1.0]`.
fn circadian_baseline(t: Minutes, peak: Minutes, trough: Minutes) -> f64 {
    const DAY: i64 = 1440;
    let t = t as i64;
    let peak = peak as i64;
    let trough = trough as i64;

    let fwd_len = (peak - trough).rem_euclid(DAY) as f64;
    let back_len = DAY as f64 - fwd_len;
    let dist_from_trough = (t - trough).rem_euclid(DAY) as f64;

    let ease = |f: f64| (1.0 - (std::f64::consts::PI * f).cos()) / 2.0;

    if dist_from_trough <= fwd_len {
        let f = if fwd_len > 0.0 { dist_from_trough / fwd_len } else { 1.0 };
        TROUGH_VALUE + (PEAK_VALUE - TROUGH_VALUE) * ease(f)
    } else {
        let dist_from_peak = dist_from_trough - fwd_len;
        let f = if back_len > 0.0 { dist_from_peak / back_len } else { 1.0 };
        PEAK_VALUE - (PEAK_VALUE - TROUGH_VALUE) * ease(f)
    }
}

/// Sleep-debt multiplier `S = clamp(0.6, 1.1, sleep_hours / sleep_baseline)`.
fn sleep_debt_multiplier(sleep_hours: f64, sleep_baseline: f64) -> f64 {
    (sleep_hours / sleep_baseline).clamp(0.6, 1.1)
}

/// Small affine stress penalty: `0.03 × (stress_level − 1)`.
fn stress_decay(stress_level: i32) -> f64 {
    0.03 * (stress_level as f64 - 1.0)
}

/// `E(t) = clamp(0, 1, S × C(t) − stress_decay(stress_level))`.
pub fn energy_at(t: Minutes, profile: &Profile, config: &EngineConfig) -> f64 {
    let peak = peak_minutes(profile.chronotype);
    let trough = trough_minutes(profile.chronotype);
    let c = circadian_baseline(t, peak, trough);
    let s = sleep_debt_multiplier(profile.sleep_hours, config.sleep_baseline);
    (s * c - stress_decay(profile.stress_level)).clamp(0.0, 1.0)
}

/// Sample `E(t)` across `window` at `cadence_minutes`, always including the
/// window's final point exactly (spec.md §8 invariant 5).
pub fn sample_energy_curve(
    window: Interval,
    cadence_minutes: u32,
    profile: &Profile,
    config: &EngineConfig,
) -> EnergyCurve {
    sample_curve(window, cadence_minutes, |t| energy_at(t, profile, config))
}

pub(crate) fn sample_curve(
    window: Interval,
    cadence_minutes: u32,
    f: impl Fn(Minutes) -> f64,
) -> Vec<CurvePoint> {
    if window.is_empty() {
        return Vec::new();
    }
    let cadence = cadence_minutes.max(1);
    let mut points = Vec::new();
    let mut t = window.start;
    while t < window.end {
        points.push(CurvePoint {
            time: format_hhmm(t),
            value: f(t),
        });
        t += cadence;
    }
    points.push(CurvePoint {
        time: format_hhmm(window.end),
        value: f(window.end),
    });
    points
}
