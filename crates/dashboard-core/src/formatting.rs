use serde::{Deserialize, Serialize};

// ── NumberLocale ──────────────────────────────────────────────────────────────

/// Digit grouping and currency conventions used when presenting numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum NumberLocale {
    /// `1,234.56`, `$1,234.56`
    #[default]
    #[value(name = "en_US")]
    #[serde(rename = "en_US")]
    EnUs,
    /// `1.234,56`, `US$ 1.234,56`
    #[value(name = "es_CO")]
    #[serde(rename = "es_CO")]
    EsCo,
}

impl NumberLocale {
    fn thousands_separator(self) -> char {
        match self {
            NumberLocale::EnUs => ',',
            NumberLocale::EsCo => '.',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            NumberLocale::EnUs => '.',
            NumberLocale::EsCo => ',',
        }
    }

    /// Currency symbol for an ISO 4217 code, plus whether a space separates
    /// it from the amount.
    fn currency_symbol(self, code: &str) -> (String, bool) {
        let code = code.to_uppercase();
        let known = match (self, code.as_str()) {
            (NumberLocale::EnUs, "USD") => Some("$"),
            (NumberLocale::EnUs, "AUD") => Some("A$"),
            (NumberLocale::EsCo, "USD") => Some("US$"),
            (NumberLocale::EsCo, "AUD") => Some("AU$"),
            (NumberLocale::EsCo, "COP") => Some("$"),
            (_, "BRL") => Some("R$"),
            (_, "EUR") => Some("€"),
            _ => None,
        };
        match known {
            Some(sym) => (sym.to_string(), self == NumberLocale::EsCo),
            None => (code, true),
        }
    }
}

impl std::fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberLocale::EnUs => write!(f, "en_US"),
            NumberLocale::EsCo => write!(f, "es_CO"),
        }
    }
}

// ── Numbers ───────────────────────────────────────────────────────────────────

/// Format a floating-point number with the thousands and decimal separators
/// of `locale` and a fixed number of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::{format_number_locale, NumberLocale};
///
/// assert_eq!(format_number_locale(1234.5, 1, NumberLocale::EnUs), "1,234.5");
/// assert_eq!(format_number_locale(-9876.5, 1, NumberLocale::EnUs), "-9,876.5");
/// assert_eq!(format_number_locale(1234567.891, 2, NumberLocale::EsCo), "1.234.567,89");
/// ```
pub fn format_number_locale(value: f64, decimals: u32, locale: NumberLocale) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints round away from
    // zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let fixed = format!("{:.prec$}", rounded, prec = decimals as usize);
    let (int_str, frac_str) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut result = group_thousands(int_str, locale.thousands_separator());
    if let Some(frac) = frac_str {
        result.push(locale.decimal_separator());
        result.push_str(frac);
    }

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

// ── Currency ──────────────────────────────────────────────────────────────────

/// Format `amount` in `currency` (ISO 4217 code) using `locale` conventions.
///
/// ```
/// use dashboard_core::formatting::{format_money, NumberLocale};
///
/// assert_eq!(format_money(1234.56, "USD", NumberLocale::EnUs), "$1,234.56");
/// assert_eq!(format_money(-9.99, "USD", NumberLocale::EnUs), "-$9.99");
/// assert_eq!(format_money(1234.5, "USD", NumberLocale::EsCo), "US$ 1.234,50");
/// assert_eq!(format_money(99.0, "AUD", NumberLocale::EnUs), "A$99.00");
/// ```
pub fn format_money(amount: f64, currency: &str, locale: NumberLocale) -> String {
    let (symbol, spaced) = locale.currency_symbol(currency);
    let digits = format_number_locale(amount.abs(), 2, locale);
    let sign = if amount < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if spaced {
        format!("{sign}{symbol} {digits}")
    } else {
        format!("{sign}{symbol}{digits}")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert `sep` every three digits from the right of an integer string.
fn group_thousands(s: &str, sep: char) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
