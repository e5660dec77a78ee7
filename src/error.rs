//! Error types

use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coordinate axis of a point record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value can never produce output, e.g. a chunk width of zero.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Raised only by strict extent scanning.
    /// `token` is `None` when the line ended before the coordinate.
    #[error("Malformed point record at line {line}: {axis} coordinate {}", describe_token(.token))]
    MalformedPointRecord {
        line: usize,
        axis: Axis,
        token: Option<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_token(token: &Option<String>) -> String {
    match token {
        Some(token) => format!("'{}' is not a number", token),
        None => "is missing".to_string(),
    }
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_malformed_point() {
        let err = Error::MalformedPointRecord {
            line: 3,
            axis: Axis::Y,
            token: Some("abc".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Malformed point record at line 3: y coordinate 'abc' is not a number"
        );

        let err = Error::MalformedPointRecord {
            line: 7,
            axis: Axis::Z,
            token: None,
        };
        assert_eq!(
            err.to_string(),
            "Malformed point record at line 7: z coordinate is missing"
        );
    }

    #[test]
    fn test_display_invalid_configuration() {
        let err = Error::invalid_config("chunk width must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: chunk width must be at least 1"
        );
    }
}
