use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute + relative closeness tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `|a - b| <= abs + rel * max(|a|, |b|)`.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs + tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// `n` evenly spaced points over `[start, end]`, both ends included.
///
/// The last point is written as `end` exactly so callers can rely on the
/// grid spanning the full interval.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut pts: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
            pts[n - 1] = end;
            pts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn nearly_equal_against_zero_uses_abs_only() {
        let tol = Tolerances {
            abs: 1e-8,
            rel: 1e-5,
        };
        assert!(nearly_equal(5e-9, 0.0, tol));
        assert!(!nearly_equal(1e-6, 0.0, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1.0, "x").is_ok());
        assert_eq!(
            ensure_positive(0.0, "x"),
            Err(CoreError::InvalidArg { what: "x" })
        );
        assert!(ensure_positive(-2.0, "x").is_err());
        assert!(ensure_positive(Real::INFINITY, "x").is_err());
    }

    #[test]
    fn linspace_hits_both_ends() {
        let pts = linspace(0.0, 5.0, 500);
        assert_eq!(pts.len(), 500);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[499], 5.0);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }
}
