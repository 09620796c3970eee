//! Log levels.
//!
//! A [`Level`] is an integer severity; the named levels are spaced four apart so that
//! custom levels can sit between them (`INFO+2`). Handlers compare against a
//! [`Leveler`], which is either a fixed [`Level`] or a [`LevelVar`] that can be adjusted
//! at runtime from any thread.

use crate::error::{LogError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(pub i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    /// Returns a level offset from this one, e.g. `Level::INFO.offset(2)`. Saturates at
    /// the bounds of `i32`.
    pub fn offset(self, delta: i32) -> Level {
        Level(self.0.saturating_add(delta))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = if self.0 < Level::INFO.0 {
            ("DEBUG", Level::DEBUG)
        } else if self.0 < Level::WARN.0 {
            ("INFO", Level::INFO)
        } else if self.0 < Level::ERROR.0 {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        };

        match self.0 - base.0 {
            0 => write!(f, "{}", name),
            delta => write!(f, "{}{:+}", name, delta),
        }
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (name, delta) = match trimmed.find(|c: char| c == '+' || c == '-') {
            Some(idx) => {
                let delta = trimmed[idx..]
                    .parse::<i32>()
                    .map_err(|_| LogError::InvalidLevel(s.to_string()))?;
                (&trimmed[..idx], delta)
            }
            None => (trimmed, 0),
        };

        let base = match name.to_ascii_uppercase().as_str() {
            "DEBUG" => Level::DEBUG,
            "INFO" => Level::INFO,
            "WARN" | "WARNING" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => return Err(LogError::InvalidLevel(s.to_string())),
        };

        base.0
            .checked_add(delta)
            .map(Level)
            .ok_or_else(|| LogError::InvalidLevel(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Anything that can report the minimum level a handler should accept.
pub trait Leveler: Send + Sync {
    fn level(&self) -> Level;
}

impl Leveler for Level {
    fn level(&self) -> Level {
        *self
    }
}

impl<L: Leveler + ?Sized> Leveler for Arc<L> {
    fn level(&self) -> Level {
        (**self).level()
    }
}

/// A [`Leveler`] whose level can be changed while loggers are in use.
#[derive(Debug, Default)]
pub struct LevelVar {
    value: AtomicI32,
}

impl LevelVar {
    /// Creates a variable starting at `level`.
    pub fn new(level: Level) -> Self {
        Self {
            value: AtomicI32::new(level.0),
        }
    }

    /// Changes the level seen by every handler sharing this variable.
    pub fn set(&self, level: Level) {
        self.value.store(level.0, Ordering::SeqCst);
    }
}

impl Leveler for LevelVar {
    fn level(&self) -> Level {
        Level(self.value.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_levels_display() {
        assert_eq!(Level::DEBUG.to_string(), "DEBUG");
        assert_eq!(Level::INFO.to_string(), "INFO");
        assert_eq!(Level::WARN.to_string(), "WARN");
        assert_eq!(Level::ERROR.to_string(), "ERROR");
    }

    #[test]
    fn test_offset_levels_display() {
        assert_eq!(Level::INFO.offset(2).to_string(), "INFO+2");
        assert_eq!(Level::DEBUG.offset(-1).to_string(), "DEBUG-1");
        assert_eq!(Level::ERROR.offset(4).to_string(), "ERROR+4");
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::DEBUG);
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::INFO);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::WARN);
        assert_eq!(" error ".parse::<Level>().unwrap(), Level::ERROR);
        assert_eq!("warn+2".parse::<Level>().unwrap(), Level(6));
        assert_eq!("DEBUG-3".parse::<Level>().unwrap(), Level(-7));
    }

    #[test]
    fn test_parse_invalid_level() {
        match "loud".parse::<Level>() {
            Err(LogError::InvalidLevel(raw)) => assert_eq!(raw, "loud"),
            other => panic!("Expected InvalidLevel, got {:?}", other),
        }
        assert!("info+x".parse::<Level>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_offset() {
        match "ERROR+2147483647".parse::<Level>() {
            Err(LogError::InvalidLevel(raw)) => assert_eq!(raw, "ERROR+2147483647"),
            other => panic!("Expected InvalidLevel, got {:?}", other),
        }
        assert!("debug-2147483648".parse::<Level>().is_err());
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(Level::ERROR.offset(i32::MAX), Level(i32::MAX));
        assert_eq!(Level::DEBUG.offset(i32::MIN), Level(i32::MIN));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in [Level(-6), Level::DEBUG, Level(1), Level::WARN, Level(11)] {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn test_level_serializes_as_name() {
        let json = serde_json::to_string(&Level::WARN).unwrap();
        assert_eq!(json, "\"WARN\"");
    }

    #[test]
    fn test_level_var_changes_across_threads() {
        let var = Arc::new(LevelVar::new(Level::INFO));
        assert_eq!(var.level(), Level::INFO);

        let writer = Arc::clone(&var);
        std::thread::spawn(move || writer.set(Level::ERROR)).join().unwrap();

        assert_eq!(var.level(), Level::ERROR);
    }
}
