//! Display formatting of dashboard values

/// Placeholder for a missing value
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for an empty or failed list
pub const NO_DATA: &str = "No data available";

/// `value` formatted, or [`NOT_AVAILABLE`]
pub fn or_na<T>(value: Option<T>, format: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format)
}

/// Dollar amount with a T/B/M suffix: `$2.95T`
pub fn compact_money(value: f64) -> String {
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= 1e12 {
        (value / 1e12, "T")
    } else if magnitude >= 1e9 {
        (value / 1e9, "B")
    } else if magnitude >= 1e6 {
        (value / 1e6, "M")
    } else {
        (value, "")
    };
    format!("${scaled:.2}{suffix}")
}

/// Price with two decimals
pub fn price(value: f64) -> String {
    format!("{value:.2}")
}

/// Fraction as a percentage: `0.2104` becomes `21.04%`
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Plain ratio with two decimals
pub fn ratio(value: f64) -> String {
    format!("{value:.2}")
}

/// Sentiment dimension, as precise as the scorer rounds it
pub fn score(value: f64) -> String {
    format!("{value:.4}")
}

/// Integer with thousands separators: `1,234,567`
pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
