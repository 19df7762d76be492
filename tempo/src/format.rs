//! Clock-face formatting for elapsed time.

/// Formats a seconds count as `HH:MM:SS`, each field zero-padded to two
/// digits. Hours keep growing past 99 instead of truncating. Invalid input
/// (NaN, infinite, negative) falls back to `"00:00:00"` so display code
/// never has to branch on it.
pub fn format_seconds_to_hhmmss(total_seconds: f64) -> String {
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return "00:00:00".to_string();
    }
    let total = total_seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_seconds_to_hhmmss(0.0), "00:00:00");
    }

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_seconds_to_hhmmss(3661.0), "01:01:01");
        assert_eq!(format_seconds_to_hhmmss(59.0), "00:00:59");
        assert_eq!(format_seconds_to_hhmmss(3599.0), "00:59:59");
        assert_eq!(format_seconds_to_hhmmss(86399.0), "23:59:59");
    }

    #[test]
    fn fractional_seconds_are_floored() {
        assert_eq!(format_seconds_to_hhmmss(61.9), "00:01:01");
    }

    #[test]
    fn hours_are_not_truncated_past_two_digits() {
        assert_eq!(format_seconds_to_hhmmss(100.0 * 3600.0), "100:00:00");
    }

    #[test]
    fn invalid_input_falls_back_to_zero() {
        assert_eq!(format_seconds_to_hhmmss(-5.0), "00:00:00");
        assert_eq!(format_seconds_to_hhmmss(f64::NAN), "00:00:00");
        assert_eq!(format_seconds_to_hhmmss(f64::INFINITY), "00:00:00");
    }
}
