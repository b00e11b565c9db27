//! Wait computation.
//!
//! The constants are calibrated against real motors, not derived; the
//! formula must stay exactly `base + |delta| * per_degree`.

use std::time::Duration;

use ptzcam_common::config::MotionParameters;

/// Travel wait for a commanded delta: `|delta| * per_degree_wait_ms`.
pub fn proportional_wait(delta: i32, per_degree_wait_ms: u32) -> Duration {
    Duration::from_millis(u64::from(delta.unsigned_abs()) * u64::from(per_degree_wait_ms))
}

/// Full wait after commanding `delta`: base acknowledgment plus travel.
pub fn settle_window(delta: i32, params: &MotionParameters) -> Duration {
    params.settle_base() + proportional_wait(delta, params.per_degree_wait_ms)
}

/// Minimum time one device's pan/tilt sequence blocks for.
pub fn total_settle_time(params: &MotionParameters) -> Duration {
    settle_window(params.pan_delta, params) + settle_window(params.tilt_delta, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_scenario_windows() {
        let params = MotionParameters::new(90, -45, 100, 9);
        assert_eq!(settle_window(90, &params), Duration::from_millis(910));
        assert_eq!(settle_window(-45, &params), Duration::from_millis(505));
        assert_eq!(total_settle_time(&params), Duration::from_millis(1415));
    }

    #[test]
    fn extreme_delta_does_not_overflow() {
        let wait = proportional_wait(i32::MIN, u32::MAX);
        assert_eq!(
            wait,
            Duration::from_millis(2_147_483_648 * u64::from(u32::MAX))
        );
    }

    #[test]
    fn zero_tuning_means_no_wait() {
        let params = MotionParameters::new(180, 180, 0, 0);
        assert_eq!(total_settle_time(&params), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn wait_is_pure(delta in any::<i32>(), per_degree in 0u32..10_000) {
            prop_assert_eq!(
                proportional_wait(delta, per_degree),
                proportional_wait(delta, per_degree)
            );
        }

        #[test]
        fn wait_is_abs_delta_times_rate(delta in -100_000i32..100_000, per_degree in 0u32..10_000) {
            let expected = u64::from(delta.unsigned_abs()) * u64::from(per_degree);
            prop_assert_eq!(proportional_wait(delta, per_degree).as_millis(), u128::from(expected));
        }

        #[test]
        fn direction_does_not_change_wait(delta in -100_000i32..100_000, per_degree in 0u32..10_000) {
            prop_assert_eq!(
                proportional_wait(delta, per_degree),
                proportional_wait(-delta, per_degree)
            );
        }

        #[test]
        fn settle_window_never_below_base(delta in any::<i32>(), base in 0u32..10_000, per_degree in 0u32..100) {
            let params = MotionParameters::new(delta, 0, base, per_degree);
            prop_assert!(settle_window(delta, &params) >= params.settle_base());
        }
    }
}
