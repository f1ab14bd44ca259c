use log::warn;

use crate::config::ThrottleLimits;

/// Shift a requested throttle past the ESC dead zone and clamp it.
///
/// Forward requests gain `min_fwd - 1`, reverse requests gain `min_rev + 1`,
/// neutral passes through. Out of range input is clamped, never rejected.
pub fn fix_throttle(throttle: f64, limits: &ThrottleLimits) -> f64 {
    if throttle.is_nan() {
        warn!("NaN throttle requested, using neutral");
        return limits.neutral;
    }

    let mut throttle = throttle;
    if throttle > limits.neutral {
        throttle += limits.fwd_offset();
    } else if throttle < limits.neutral {
        throttle += limits.rev_offset();
    }

    throttle.clamp(limits.full_rev, limits.full_fwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn limits() -> ThrottleLimits {
        ThrottleLimits::default()
    }

    #[test]
    fn neutral_is_untouched() {
        assert_eq!(fix_throttle(0.0, &limits()), 0.0);
    }

    #[test]
    fn forward_jumps_dead_zone() {
        assert_relative_eq!(fix_throttle(1.0, &limits()), 10.1, epsilon = 1e-9);
        assert_relative_eq!(fix_throttle(3.0, &limits()), 12.1, epsilon = 1e-9);
    }

    #[test]
    fn reverse_jumps_dead_zone() {
        assert_relative_eq!(fix_throttle(-1.0, &limits()), -8.1, epsilon = 1e-9);
        assert_relative_eq!(fix_throttle(-3.0, &limits()), -10.1, epsilon = 1e-9);
    }

    #[test]
    fn clamps_both_ends() {
        assert_eq!(fix_throttle(90.0, &limits()), 90.0);
        assert_eq!(fix_throttle(85.0, &limits()), 90.0);
        assert_eq!(fix_throttle(500.0, &limits()), 90.0);
        assert_eq!(fix_throttle(-90.0, &limits()), -90.0);
        assert_eq!(fix_throttle(-85.0, &limits()), -90.0);
        assert_eq!(fix_throttle(f64::NEG_INFINITY, &limits()), -90.0);
    }

    #[test]
    fn tiny_inputs_keep_their_sign() {
        assert!(fix_throttle(0.001, &limits()) > 9.0);
        assert!(fix_throttle(-0.001, &limits()) < -7.0);
    }

    #[test]
    fn nan_becomes_neutral() {
        assert_eq!(fix_throttle(f64::NAN, &limits()), 0.0);
    }

    #[test]
    fn output_always_in_range() {
        let l = limits();
        for step in -400..=400 {
            let out = fix_throttle(step as f64 * 0.5, &l);
            assert!((l.full_rev..=l.full_fwd).contains(&out), "{} out of range", out);
        }
    }
}
