use thiserror::Error;

// ---------------------------------------------------------------------------
// Controller errors
// ---------------------------------------------------------------------------

/// Everything a landing cycle can reject.
///
/// A missing marker is not an error: it is an ordinary input handled by the
/// marker memory. These variants cover caller contract violations only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("altitude must be finite, got {0}")]
    NonFiniteAltitude(f64),

    #[error("invalid detection: {0}")]
    InvalidDetection(&'static str),

    #[error("invalid controller configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

pub type ControlResult<T> = Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let e = ControlError::NonFiniteAltitude(f64::NAN);
        assert_eq!(e.to_string(), "altitude must be finite, got NaN");

        let e = ControlError::InvalidConfig { field: "kp_min", reason: "exceeds kp_max" };
        assert!(e.to_string().contains("kp_min exceeds kp_max"));
    }
}
