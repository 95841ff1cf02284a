//! Exponential easing

/// Advance `current` toward `target` by `factor` of the remaining gap.
///
/// For `factor` in `(0, 1]` the result lies between `current` and `target`
/// inclusive, so repeated application converges without overshoot.
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_closes_fraction_of_gap() {
        assert_eq!(ease_toward(0.0, 100.0, 0.25), 25.0);
        assert_eq!(ease_toward(100.0, 0.0, 0.5), 50.0);
        assert_eq!(ease_toward(10.0, 10.0, 0.18), 10.0);
    }

    #[test]
    fn test_gap_never_grows() {
        for &(start, target) in &[(0.0f32, 1000.0f32), (500.0, -250.0), (-3.0, 7.5)] {
            let mut current = start;
            let mut gap = (target - current).abs();
            for _ in 0..200 {
                current = ease_toward(current, target, 0.18);
                let next_gap = (target - current).abs();
                assert!(next_gap <= gap);
                gap = next_gap;
            }
        }
    }
}
