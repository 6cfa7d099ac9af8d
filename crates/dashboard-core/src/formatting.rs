use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Format a floating-point number with `,` thousands separators and `.` as
/// the decimal mark.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    format_number_with(value, decimals, ',', '.')
}

/// Format `value` using explicit thousands and decimal separators.
///
/// ```
/// use dashboard_core::formatting::format_number_with;
///
/// assert_eq!(format_number_with(1234567.891, 2, '.', ','), "1.234.567,89");
/// ```
pub fn format_number_with(value: f64, decimals: u32, thousands: char, decimal: char) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by an epsilon scaled to the magnitude so exact binary midpoints
    // such as 1.005 round up.
    let factor = 10_u64.pow(decimals);
    let scaled_f = abs_value * factor as f64;
    let scaled = (scaled_f + f64::EPSILON * scaled_f).round() as u64;

    let integer_part = scaled / factor;
    let frac_part = scaled % factor;

    let grouped = group_thousands(&integer_part.to_string(), thousands);

    let mut result = if decimals == 0 {
        grouped
    } else {
        format!(
            "{}{}{:0width$}",
            grouped,
            decimal,
            frac_part,
            width = decimals as usize
        )
    };

    if negative && scaled != 0 {
        result.insert(0, '-');
    }
    result
}

// ── Currency ──────────────────────────────────────────────────────────────────

/// Display currency for monetary metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian real in `pt_BR` style: `R$ 1.234,56`.
    #[default]
    Brl,
    /// US dollar: `$1,234.56`.
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Brl => "R$",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Currency::Brl),
            "USD" => Ok(Currency::Usd),
            other => Err(DashboardError::Config(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// Format a monetary amount with two decimals in the style of `currency`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::{format_currency, Currency};
///
/// assert_eq!(format_currency(1234.56, Currency::Brl), "R$ 1.234,56");
/// assert_eq!(format_currency(1234.56, Currency::Usd), "$1,234.56");
/// assert_eq!(format_currency(-9.99, Currency::Usd),   "-$9.99");
/// ```
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let body = match currency {
        Currency::Brl => format!("R$ {}", format_number_with(amount.abs(), 2, '.', ',')),
        Currency::Usd => format!("${}", format_number(amount.abs(), 2)),
    };
    if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{body}")
    } else {
        body
    }
}

/// Format an integer count with the thousands separator of `currency`'s locale.
///
/// ```
/// use dashboard_core::formatting::{format_count, Currency};
///
/// assert_eq!(format_count(1234567, Currency::Brl), "1.234.567");
/// assert_eq!(format_count(1234567, Currency::Usd), "1,234,567");
/// ```
pub fn format_count(count: u64, currency: Currency) -> String {
    match currency {
        Currency::Brl => group_thousands(&count.to_string(), '.'),
        Currency::Usd => group_thousands(&count.to_string(), ','),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
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
