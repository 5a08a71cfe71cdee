//! Time parsing utilities

use crate::error::{SplitClipError, SplitClipResult};

/// Time parser for command-line time arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    pub fn new() -> Self {
        Self
    }

    /// Parse seconds, `MM:SS[.ms]` or `HH:MM:SS[.ms]` into seconds
    ///
    /// Range checks are left to the planner; only the syntax is checked here.
    pub fn parse_time(&self, time_str: &str) -> SplitClipResult<f64> {
        let trimmed = time_str.trim();
        let invalid = || SplitClipError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(invalid());
            }
            return Ok(seconds);
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => (0, Self::component(m), Self::seconds(s)),
            [h, m, s] => (Self::component(h).ok_or_else(invalid)?, Self::component(m), Self::seconds(s)),
            _ => return Err(invalid()),
        };
        let minutes = minutes.ok_or_else(invalid)?;
        let seconds = seconds.ok_or_else(invalid)?;

        if parts.len() == 3 && minutes >= 60 {
            return Err(invalid());
        }

        Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
    }

    fn component(part: &str) -> Option<u32> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    }

    fn seconds(part: &str) -> Option<f64> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        part.parse::<f64>().ok().filter(|s| *s < 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("90.5").unwrap(), 90.5);
        assert_eq!(parser.parse_time(" 12 ").unwrap(), 12.0);
    }

    #[test]
    fn test_parse_mm_ss() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("01:30").unwrap(), 90.0);
        assert_eq!(parser.parse_time("01:30.5").unwrap(), 90.5);
    }

    #[test]
    fn test_parse_hh_mm_ss() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("1:02:03.5").unwrap(), 3723.5);
    }

    #[test]
    fn test_parse_invalid() {
        let parser = TimeParser::new();
        assert!(parser.parse_time("abc").is_err());
        assert!(parser.parse_time("00:60").is_err());
        assert!(parser.parse_time("1:60:00").is_err());
        assert!(parser.parse_time("1:2:3:4").is_err());
        assert!(parser.parse_time("inf").is_err());
        assert!(parser.parse_time("").is_err());
    }
}
