use colored::Colorize;
use fintrack_config::Config;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Success => text.bright_green().to_string(),
        MessageKind::Warning => format!("WARNING: {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("ERROR: {text}").bright_red().to_string(),
        MessageKind::Info => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Error | MessageKind::Warning => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Subheading inside a section.
pub fn heading(title: impl fmt::Display) {
    println!("{}", title.to_string().underline());
}

/// How amounts are rendered: currency label plus the locale's decimal separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub currency: String,
    pub decimal_separator: char,
}

impl MoneyFormat {
    pub fn new(currency: impl Into<String>, decimal_separator: char) -> Self {
        Self {
            currency: currency.into(),
            decimal_separator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.currency.clone(), config.decimal_separator())
    }
}

/// Two-decimal amount followed by the currency label.
pub fn money(amount: f64, format: &MoneyFormat) -> String {
    let digits = format!("{amount:.2}");
    let digits = if format.decimal_separator == '.' {
        digits
    } else {
        digits.replace('.', &format.decimal_separator.to_string())
    };
    format!("{digits} {}", format.currency)
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Left-aligned label padded to a fixed column, then the value.
pub fn labeled(label: &str, value: impl fmt::Display) -> String {
    format!("  {label:<18} {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money(42.371, &MoneyFormat::new("USD", '.')), "42.37 USD");
        assert_eq!(money(-50.0, &MoneyFormat::new("EUR", '.')), "-50.00 EUR");
    }

    #[test]
    fn money_follows_locale_separator() {
        let config = Config {
            locale: "fr-FR".into(),
            currency: "EUR".into(),
            ..Config::default()
        };
        assert_eq!(money(1234.5, &MoneyFormat::from_config(&config)), "1234,50 EUR");
    }

    #[test]
    fn labeled_pads_label_column() {
        assert_eq!(labeled("Balance", "1.00"), format!("  {:<18} 1.00", "Balance"));
    }
}
