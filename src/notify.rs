// SPDX-License-Identifier: PMPL-1.0-or-later

//! Detection notifications.

use chrono::{DateTime, Local};
use colored::*;

/// `2024/01/31 12:00:00 message passing detected!`
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("{} {}", at.format("%Y/%m/%d %H:%M:%S"), message)
}

/// Write a timestamped detection line to stderr.
pub fn detection(message: &str) {
    eprintln!("{}", format_line(Local::now(), message).red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_line_has_log_timestamp_prefix() {
        let at = Local
            .with_ymd_and_hms(2024, 1, 31, 9, 5, 7)
            .single()
            .expect("unambiguous local time");
        assert_eq!(
            format_line(at, "n6: detected!"),
            "2024/01/31 09:05:07 n6: detected!"
        );
    }
}
