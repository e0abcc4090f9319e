//! Configuration error types.
//!
//! The round simulation itself never fails: depleted darts and score clamp at
//! zero, missing arena bounds make a tick a no-op, and termination is guarded
//! by a one-shot flag. Only loading and validating balance data can go wrong,
//! and those paths report through [`TuningError`].

use std::fmt;

/// Errors raised while loading or validating [`crate::Tuning`].
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed into a tuning table.
    Parse(serde_json::Error),

    /// The level table has no entries, so no round can be configured.
    EmptyLevelTable,

    /// A level entry cannot produce a playable round.
    InvalidLevel {
        /// 1-based level number of the offending entry.
        level: u32,
        /// Human-readable description of the problem.
        reason: &'static str,
    },

    /// A tunable constant is outside the range the simulation supports.
    OutOfRange {
        /// Field name (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        range: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "failed to parse tuning JSON: {}", err),
            TuningError::EmptyLevelTable => write!(f, "level table is empty"),
            TuningError::InvalidLevel { level, reason } => {
                write!(f, "level {} is invalid: {}", level, reason)
            }
            TuningError::OutOfRange { name, value, range } => write!(
                f,
                "tuning value '{}' = {} is outside range {}",
                name, value, range
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `TuningError` as the error type.
pub type TuningResult<T> = Result<T, TuningError>;

/// Returns an error unless `value` is a probability in `[0, 1]`.
pub fn validate_chance(name: &'static str, value: f64) -> TuningResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> TuningResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            range: "(0.0, ∞)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_chance() {
        assert!(validate_chance("pause", 0.0).is_ok());
        assert!(validate_chance("pause", 1.0).is_ok());
        assert!(validate_chance("pause", 1.5).is_err());
        assert!(validate_chance("pause", -0.1).is_err());
    }

    #[test]
    fn test_display_mentions_field() {
        let err = validate_positive("projectile_speed", 0.0).unwrap_err();
        assert!(err.to_string().contains("projectile_speed"));
    }
}
