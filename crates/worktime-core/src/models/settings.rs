use serde::{Deserialize, Serialize};

use crate::utils::NumberLocale;

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the terminal/system colors
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn code(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Get the next theme (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }

    /// Get the previous theme (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Theme::System => Theme::Dark,
            Theme::Light => Theme::System,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    It,
    En,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::It, Lang::En];

    pub fn code(&self) -> &'static str {
        match self {
            Lang::It => "it",
            Lang::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Number separators used when displaying results in this language
    pub fn number_locale(&self) -> NumberLocale {
        match self {
            Lang::It => NumberLocale::Italian,
            Lang::En => NumberLocale::English,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Lang::It => Lang::En,
            Lang::En => Lang::It,
        }
    }
}

/// Display currency. Only the symbol changes; there are no exchange rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Eur, Currency::Usd, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    /// Symbol for a raw currency code; unknown codes fall back to `€`
    pub fn symbol_for_code(code: &str) -> &'static str {
        Self::from_code(code).unwrap_or_default().symbol()
    }

    pub fn next(&self) -> Self {
        match self {
            Currency::Eur => Currency::Usd,
            Currency::Usd => Currency::Gbp,
            Currency::Gbp => Currency::Eur,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Currency::Eur => Currency::Gbp,
            Currency::Usd => Currency::Eur,
            Currency::Gbp => Currency::Usd,
        }
    }
}

/// User settings, persisted as a single JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Hourly wage exactly as typed
    pub wage: String,
    pub theme: Theme,
    pub lang: Lang,
    pub currency: Currency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.wage, "");
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.lang, Lang::It);
        assert_eq!(settings.currency, Currency::Eur);
    }

    #[test]
    fn test_settings_wire_format() {
        let settings = Settings {
            wage: "12,50".to_string(),
            theme: Theme::Dark,
            lang: Lang::En,
            currency: Currency::Gbp,
        };
        let json = serde_json::to_string(&settings).expect("serialize settings");
        assert_eq!(
            json,
            r#"{"wage":"12,50","theme":"dark","lang":"en","currency":"GBP"}"#
        );
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::Eur.symbol(), "€");
        assert_eq!(Currency::Usd.symbol(), "$");
        assert_eq!(Currency::Gbp.symbol(), "£");
        assert_eq!(Currency::symbol_for_code("JPY"), "€");
        assert_eq!(Currency::symbol_for_code("USD"), "$");
    }

    #[test]
    fn test_codes_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_code(theme.code()), Some(theme));
        }
        for lang in Lang::ALL {
            assert_eq!(Lang::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Lang::from_code("fr"), None);
        assert_eq!(Currency::from_code("eur"), None);
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Theme::Dark.next(), Theme::System);
        assert_eq!(Theme::System.prev(), Theme::Dark);
        assert_eq!(Currency::Gbp.next(), Currency::Eur);
        assert_eq!(Lang::En.next(), Lang::It);
    }
}
