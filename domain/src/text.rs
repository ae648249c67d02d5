use regex::Regex;
use std::sync::OnceLock;

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

/// Normalize a category or merchant value for name matching.
///
/// Strips every run of digits (store numbers, card suffixes, dates glued to
/// the name) and trims the ends. Inner spacing is left as stored so the
/// agent can match the value exactly.
pub fn clean_name(raw: &str) -> String {
    digit_runs().replace_all(raw, "").trim().to_string()
}
