//! Rational switching function mapping a distance metric to a helix indicator

/// Rational switching function `(1 - (r/d0)^8) / (1 - (r/d0)^12)`.
///
/// Saturates near 1 when `r` is small (near-perfect match against the
/// reference geometry) and decays toward 0 as `r` grows, giving a continuous,
/// differentiable "is this structure present" signal.
///
/// With `a = (r/d0)^4` the quotient reduces to `(1 + a) / (1 + a + a^2)`,
/// which is the form evaluated here: it has no 0/0 at the removable
/// singularity `r = d0` (where the value is 2/3) and is exactly 1 at `r = 0`.
#[derive(Debug, Clone, Copy)]
pub struct RationalSwitch {
    /// Scale parameter `d0`, in the same unit as `r`
    pub d0: f64,
}

impl RationalSwitch {
    /// Create a switching function with the given scale parameter
    pub const fn new(d0: f64) -> Self {
        Self { d0 }
    }

    /// Evaluate the switching function at `r >= 0`
    pub fn value(&self, r: f64) -> f64 {
        let a = (r / self.d0).powi(4);
        (1.0 + a) / (1.0 + a + a * a)
    }

    /// Evaluate the derivative of the switching function with respect to `r`.
    ///
    /// Closed form: `-a' * a * (2 + a) / (1 + a + a^2)^2` with
    /// `a' = 4 r^3 / d0^4`. Zero at `r = 0`, negative for all `r > 0`.
    pub fn derivative(&self, r: f64) -> f64 {
        let a = (r / self.d0).powi(4);
        let da = 4.0 * r.powi(3) / self.d0.powi(4);
        let denom = 1.0 + a + a * a;
        -da * a * (2.0 + a) / (denom * denom)
    }
}

impl Default for RationalSwitch {
    /// Shape used for secondary-structure RMSD scoring (`d0 = 0.1`)
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_limit_at_zero() {
        let switch = RationalSwitch::default();
        assert_eq!(switch.value(0.0), 1.0);
        assert_eq!(switch.derivative(0.0), 0.0);
    }

    #[test]
    fn test_removable_singularity_at_d0() {
        // The raw form (1 - (r/d0)^8) / (1 - (r/d0)^12) is 0/0 at r = d0;
        // the reduced form gives the analytic limit 2/3.
        let switch = RationalSwitch::default();
        assert_approx_eq!(switch.value(0.1), 2.0 / 3.0, 1e-12);
        assert!(switch.derivative(0.1).is_finite());
    }

    #[test]
    fn test_matches_raw_form_away_from_singularity() {
        let switch = RationalSwitch::default();
        for r in [0.01, 0.05, 0.09, 0.15, 0.3, 1.0] {
            let raw = (1.0 - (r / 0.1_f64).powi(8)) / (1.0 - (r / 0.1_f64).powi(12));
            assert_approx_eq!(switch.value(r), raw, 1e-9);
        }
    }

    #[test]
    fn test_derivative_matches_source_magnitude() {
        // For d0 = 0.1 the derivative equals
        // -8e8 (r^7 + 5e3 r^11) / (1e8 r^8 + 1e4 r^4 + 1)^2.
        let switch = RationalSwitch::default();
        for r in [0.02_f64, 0.08, 0.1, 0.2, 0.5] {
            let denom = 1e8 * r.powi(8) + 1e4 * r.powi(4) + 1.0;
            let expected = -8e8 * (r.powi(7) + 5e3 * r.powi(11)) / (denom * denom);
            assert_approx_eq!(switch.derivative(r), expected, 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn test_monotone_decay() {
        let switch = RationalSwitch::default();
        let samples: Vec<f64> = (0..100).map(|i| i as f64 * 0.01).collect();
        for pair in samples.windows(2) {
            assert!(switch.value(pair[0]) >= switch.value(pair[1]));
            assert!(switch.derivative(pair[1]) <= 0.0);
        }
        // Far tail decays as (d0/r)^4
        assert!(switch.value(10.0) < 1e-7);
    }

    #[test]
    fn test_finite_difference_agreement() {
        let switch = RationalSwitch::default();
        let h = 1e-7;
        for r in [0.03, 0.07, 0.12, 0.25] {
            let numeric = (switch.value(r + h) - switch.value(r - h)) / (2.0 * h);
            let analytic = switch.derivative(r);
            assert_approx_eq!(numeric, analytic, 1e-3 * analytic.abs().max(1.0));
        }
    }
}
