/// Formats a total playtime in seconds as `{hours}h {minutes}m {seconds}s`,
/// truncating — no rounding.
pub fn format_playtime(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h {minutes}m {seconds}s")
}
