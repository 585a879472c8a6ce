//! The two daily update types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which of the two daily updates a prediction or observation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The longer update, starting at 04:00 UTC.
    Major,
    /// The shorter update, starting at 16:00 UTC.
    Minor,
}

impl Mode {
    /// Both modes, major first.
    pub const ALL: [Self; 2] = [Self::Major, Self::Minor];

    /// Hour of the UTC day at which this update begins.
    pub const fn start_hour(self) -> i64 {
        match self {
            Self::Major => 4,
            Self::Minor => 16,
        }
    }

    /// Lowercase name used in commands and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            _ => Err(CoreError::InvalidMode { mode: s.to_owned() }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("major".parse::<Mode>().unwrap(), Mode::Major);
        assert_eq!(" Minor ".parse::<Mode>().unwrap(), Mode::Minor);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "weekly".parse::<Mode>().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidMode {
                mode: "weekly".to_owned()
            }
        );
    }

    #[test]
    fn start_hours() {
        assert_eq!(Mode::Major.start_hour(), 4);
        assert_eq!(Mode::Minor.start_hour(), 16);
    }
}
