//! Shared utility functions for bathymetry crates.

/// Timestamp utility functions
pub mod dates {
    use chrono::NaiveDateTime;

    /// Timestamp layouts accepted in survey and logger files, tried in order.
    pub const TIMESTAMP_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%d.%m.%Y %H:%M:%S%.f",
        "%d.%m.%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
    ];

    /// Output layout for timestamps
    pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(time: &NaiveDateTime) -> String {
        time.format(OUTPUT_FORMAT).to_string()
    }

    /// Parse a timestamp in any of the accepted layouts
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        let trimmed = s.trim();
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| anyhow::anyhow!("Unrecognized timestamp: {:?}", s))
    }

}

/// Number utility functions
pub mod numbers {
    /// Parse a float that may use a decimal comma ("3,25")
    pub fn parse_decimal(s: &str) -> Option<f64> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_decimal() {
            assert_eq!(parse_decimal("3,25"), Some(3.25));
            assert_eq!(parse_decimal(" -1.5 "), Some(-1.5));
            assert_eq!(parse_decimal("39"), Some(39.0));
            assert_eq!(parse_decimal(""), None);
            assert_eq!(parse_decimal("n/a"), None);
            assert_eq!(parse_decimal("NaN"), None);
        }
    }
}
