use crate::{RfError, RfResult};

/// Floating point type used throughout the workspace.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> RfResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RfError::NonFinite { what, value: v })
    }
}

/// Returns `Some(v)` only for finite values. Sensor feeds use NaN for "no reading".
#[inline]
pub fn finite(v: Real) -> Option<Real> {
    v.is_finite().then_some(v)
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<Real>() / values.len() as Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn finite_filters_missing_readings() {
        assert_eq!(finite(3.5), Some(3.5));
        assert_eq!(finite(Real::NAN), None);
        assert_eq!(finite(Real::INFINITY), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }
}
