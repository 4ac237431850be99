// src/clean/currency.rs
use once_cell::sync::Lazy;
use regex::Regex;

static CURRENCY_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\$,]").expect("currency pattern is valid"));

/// `"$1,234.50 "` → `1234.5`. Strips every `$` and `,`, then surrounding whitespace.
pub fn parse_currency(s: &str) -> Option<f64> {
    let stripped = CURRENCY_NOISE.replace_all(s, "");
    stripped.trim().parse::<f64>().ok()
}
