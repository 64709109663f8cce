use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

/// An integer control constrained to `0..=100`.
///
/// Sliders and strategy intensities are all `Percent`, so a value outside the
/// range cannot reach the guardrail engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Build from a raw value, naming `field` in the error on rejection.
    pub fn try_new(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(ValidationError::OutOfRange { field, value }),
        }
    }

    /// Build from a value known to be in range; larger values saturate at 100.
    pub const fn saturating(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_accepts_bounds() {
        assert_eq!(Percent::try_new("x", 0).unwrap(), Percent::ZERO);
        assert_eq!(Percent::try_new("x", 100).unwrap(), Percent::MAX);
    }

    #[test]
    fn try_new_rejects_out_of_range_with_field_name() {
        let err = Percent::try_new("sliders.memes", 101).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "sliders.memes",
                value: 101
            }
        );
        assert!(Percent::try_new("sliders.memes", -1).is_err());
    }

    #[test]
    fn saturating_caps_at_hundred() {
        assert_eq!(Percent::saturating(250).get(), 100);
        assert_eq!(Percent::saturating(42).get(), 42);
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Percent::saturating(15)).unwrap(), "15");
    }
}
