/// Whether the focus pulse is moving. It only runs while a finding is highlighted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PulseMode {
    Running,
    Paused,
}

const PULSE_SPEED: f64 = 4.0;
const MAX_FRAME_DELTA: f64 = 0.25;
const FULL_CYCLE: f64 = 2.0 * std::f64::consts::PI;

/// Advances the pulse phase by the time since the last frame, in seconds.
///
/// Long gaps (a background tab) are clamped and a clock that runs backwards
/// never rewinds the phase.
pub fn advance_pulse(
    phase: f64,
    last_tick: Option<f64>,
    now_seconds: f64,
    mode: PulseMode,
) -> (f64, Option<f64>) {
    let delta = last_tick
        .map(|last| (now_seconds - last).max(0.0).min(MAX_FRAME_DELTA))
        .unwrap_or(0.0);

    let next_phase = match mode {
        PulseMode::Running => (phase + delta * PULSE_SPEED).rem_euclid(FULL_CYCLE),
        PulseMode::Paused => 0.0,
    };

    (next_phase, Some(now_seconds))
}

/// Brightness of the highlight in `[0, 1]`.
pub fn pulse_level(phase: f64) -> f64 {
    phase.sin().mul_add(0.5, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn first_frame_only_records_the_clock() {
        let (phase, last_tick) = advance_pulse(1.0, None, 10.0, PulseMode::Running);
        assert_close(phase, 1.0);
        assert_eq!(last_tick, Some(10.0));
    }

    #[test]
    fn running_pulse_advances_and_wraps() {
        let start = FULL_CYCLE - 0.1;
        let (phase, _) = advance_pulse(start, Some(4.0), 4.2, PulseMode::Running);
        assert_close(phase, (start + 0.2 * PULSE_SPEED).rem_euclid(FULL_CYCLE));
    }

    #[test]
    fn paused_pulse_rests_at_zero() {
        let (phase, last_tick) = advance_pulse(2.25, Some(1.0), 1.2, PulseMode::Paused);
        assert_close(phase, 0.0);
        assert_eq!(last_tick, Some(1.2));
    }

    #[test]
    fn gaps_are_clamped_and_time_never_rewinds() {
        let (phase, _) = advance_pulse(0.0, Some(3.0), 30.0, PulseMode::Running);
        assert_close(phase, MAX_FRAME_DELTA * PULSE_SPEED);

        let (phase, _) = advance_pulse(0.5, Some(10.0), 9.0, PulseMode::Running);
        assert_close(phase, 0.5);
    }

    #[test]
    fn level_stays_in_unit_range() {
        for step in 0..64 {
            let level = pulse_level(f64::from(step) * 0.1);
            assert!((0.0..=1.0).contains(&level));
        }
    }
}
