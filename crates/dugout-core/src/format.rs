// Display formatting for stat values.

/// Three decimals, leading zero stripped (`.314`).
const AVERAGE_STATS: &[&str] = &[
    "AVG", "OBP", "SLG", "OPS", "ISO", "BA", "BAA", "OBPA", "SLGA", "OPSA", "BABIP", "BABIP_A",
    "W-L%",
];

const TWO_DECIMAL_STATS: &[&str] = &[
    "ERA", "WHIP", "FIP", "H/6", "HR/6", "BB/6", "K/6", "K/BB", "GB/FB", "GB/FB_A", "WAR", "RE24",
    "WPA", "Avg Diff",
];

const ONE_DECIMAL_STATS: &[&str] = &["H6", "HR6", "BB6", "SO6", "SO/BB"];

/// Shown for a missing value.
pub const MISSING: &str = "-";

/// Render `value` the way the stat is conventionally written. Works with
/// either the display name or the storage key.
pub fn format_stat(stat: &str, value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };

    if AVERAGE_STATS.contains(&stat) {
        strip_leading_zero(format!("{value:.3}"))
    } else if TWO_DECIMAL_STATS.contains(&stat) {
        format!("{value:.2}")
    } else if ONE_DECIMAL_STATS.contains(&stat) {
        format!("{value:.1}")
    } else if stat == "IP" {
        format_innings(value)
    } else if stat.contains('%') {
        format!("{:.1}", value * 100.0)
    } else {
        format!("{}", (value + 0.5).floor() as i64)
    }
}

fn strip_leading_zero(text: String) -> String {
    if let Some(rest) = text.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        text
    }
}

/// Innings as `whole.outs`, outs in thirds, carrying into the next inning
/// when the fraction rounds to three outs.
fn format_innings(value: f64) -> String {
    let innings = value.floor();
    let outs = ((value - innings) * 3.0).round();
    if outs >= 3.0 {
        format!("{:.1}", innings + 1.0)
    } else {
        format!("{}.{}", innings as i64, outs as i64)
    }
}
