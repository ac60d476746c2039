use std::fmt::Display;
use std::str::FromStr;

/// Syslog severity scale. Discriminants are the wire ranks: 0 is the most
/// severe, 7 the least, contiguous and fixed for the process lifetime.
///
/// `Ord` follows the rank, so a threshold check is simply
/// `level <= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// System is unusable.
    Emergency = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical condition.
    Critical = 2,
    /// Error condition.
    Error = 3,
    /// Warning condition.
    Warning = 4,
    /// Normal but significant condition.
    Notice = 5,
    /// Purely informational message.
    Info = 6,
    /// Application debug messages.
    Debug = 7,
}

pub const LEVELS: [Level; 8] = [
    Level::Emergency,
    Level::Alert,
    Level::Critical,
    Level::Error,
    Level::Warning,
    Level::Notice,
    Level::Info,
    Level::Debug,
];

impl Level {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Emergency => "EMERGENCY",
            Level::Alert => "ALERT",
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Case-insensitive lookup of a wire token. Unknown names are `None`,
    /// never a sentinel rank.
    pub fn from_name(name: &str) -> Option<Level> {
        match name.to_ascii_uppercase().as_str() {
            "EMERGENCY" => Some(Level::Emergency),
            "ALERT" => Some(Level::Alert),
            "CRITICAL" => Some(Level::Critical),
            "ERROR" => Some(Level::Error),
            "WARNING" => Some(Level::Warning),
            "NOTICE" => Some(Level::Notice),
            "INFO" => Some(Level::Info),
            "DEBUG" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Level> {
        LEVELS.get(usize::from(rank)).copied()
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s).ok_or_else(|| eyre::eyre!("unknown severity level: {}", s))
    }
}
