// src/utils/time.rs

/// Formats an elapsed duration in whole seconds.
/// Hours are only shown once they are non-zero: `2m 5s`, `1h 0m 7s`.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else {
        format!("{}m {}s", minutes, secs)
    }
}
