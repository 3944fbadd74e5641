//! Amount rendering for a single display currency.

use crate::config::Config;

/// Separators and precision used to print amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormat {
    pub currency: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub precision: u8,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::new("DZD", "ar-DZ")
    }
}

impl AmountFormat {
    pub fn new(currency: &str, locale: &str) -> Self {
        let currency = currency.trim().to_uppercase();
        let (decimal_separator, grouping_separator) = separators_for(locale);
        Self {
            precision: minor_units_for(&currency),
            currency,
            decimal_separator,
            grouping_separator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    /// `1234.5` becomes `1,234.50 DZD`; negatives keep a leading `-`.
    pub fn format(&self, amount: f64) -> String {
        let body = format_number(amount.abs(), self);
        let sign = if amount < 0.0 && body.chars().any(|ch| ch != '0' && ch.is_ascii_digit()) {
            "-"
        } else {
            ""
        };
        format!("{sign}{body} {}", self.currency)
    }

    /// Like [`AmountFormat::format`] but always shows the sign.
    pub fn format_signed(&self, amount: f64) -> String {
        if amount > 0.0 {
            format!("+{}", self.format(amount))
        } else {
            self.format(amount)
        }
    }
}

fn separators_for(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "fr" => (',', ' '),
        "de" | "es" | "it" | "pt" | "tr" => (',', '.'),
        _ => ('.', ','),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" | "TND" | "OMR" | "JOD" | "LYD" | "IQD" => 3,
        _ => 2,
    }
}

fn format_number(value: f64, format: &AmountFormat) -> String {
    let raw = format!("{:.*}", format.precision as usize, value);
    let (int_part, fraction) = match raw.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (raw.as_str(), None),
    };
    let mut out = group_digits(int_part, format.grouping_separator);
    if let Some(fraction) = fraction {
        out.push(format.decimal_separator);
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
