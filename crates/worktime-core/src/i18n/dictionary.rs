use crate::models::{Lang, Theme};

/// User-facing strings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
    pub tagline: &'static str,
    pub hourly_wage_label: &'static str,
    pub hourly_wage_hint: &'static str,
    pub converter_title: &'static str,
    pub price_label: &'static str,
    pub clear: &'static str,
    pub copy: &'static str,
    pub note: &'static str,
    pub settings_title: &'static str,
    pub theme_label: &'static str,
    pub theme_system: &'static str,
    pub theme_light: &'static str,
    pub theme_dark: &'static str,
    pub language_label: &'static str,
    pub currency_label: &'static str,
    pub currency_hint: &'static str,
    pub save: &'static str,
    pub result_empty: &'static str,
    pub result_invalid: &'static str,
    /// Unit word after the decimal hour count
    pub hours_word: &'static str,
    pub copied: &'static str,
    pub wage_placeholder: &'static str,
    pub price_placeholder: &'static str,
}

const IT: Dictionary = Dictionary {
    tagline: "Converti prezzi in ore di lavoro",
    hourly_wage_label: "Paga oraria",
    hourly_wage_hint: "Inserisci quanto guadagni per ogni ora di lavoro.",
    converter_title: "Convertitore",
    price_label: "Prezzo",
    clear: "Pulisci",
    copy: "Copia",
    note: "Nota: il calcolo è “prezzo ÷ paga oraria”.",
    settings_title: "Impostazioni",
    theme_label: "Tema",
    theme_system: "Sistema",
    theme_light: "Chiaro",
    theme_dark: "Scuro",
    language_label: "Lingua",
    currency_label: "Valuta",
    currency_hint: "Serve solo per mostrare il simbolo.",
    save: "Salva",
    result_empty: "Inserisci paga e prezzo",
    result_invalid: "Valori non validi",
    hours_word: "ore",
    copied: "Copiato!",
    wage_placeholder: "es. 12,50",
    price_placeholder: "es. 79,99",
};

const EN: Dictionary = Dictionary {
    tagline: "Convert prices into work hours",
    hourly_wage_label: "Hourly wage",
    hourly_wage_hint: "Enter how much you earn per hour.",
    converter_title: "Converter",
    price_label: "Price",
    clear: "Clear",
    copy: "Copy",
    note: "Note: calculation is “price ÷ hourly wage”.",
    settings_title: "Settings",
    theme_label: "Theme",
    theme_system: "System",
    theme_light: "Light",
    theme_dark: "Dark",
    language_label: "Language",
    currency_label: "Currency",
    currency_hint: "Only used to display the symbol.",
    save: "Save",
    result_empty: "Enter wage and price",
    result_invalid: "Invalid values",
    hours_word: "hours",
    copied: "Copied!",
    wage_placeholder: "e.g. 12.50",
    price_placeholder: "e.g. 79.99",
};

pub fn dictionary(lang: Lang) -> &'static Dictionary {
    match lang {
        Lang::It => &IT,
        Lang::En => &EN,
    }
}

/// Dictionary for a raw language code; unknown codes fall back to Italian
pub fn dictionary_for_code(code: &str) -> &'static Dictionary {
    dictionary(Lang::from_code(code).unwrap_or_default())
}

impl Dictionary {
    pub fn theme_name(&self, theme: Theme) -> &'static str {
        match theme {
            Theme::System => self.theme_system,
            Theme::Light => self.theme_light,
            Theme::Dark => self.theme_dark,
        }
    }

    /// Look up a string by its translation key, as used in the page markup.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let text = match key {
            "tagline" => self.tagline,
            "hourlyWageLabel" => self.hourly_wage_label,
            "hourlyWageHint" => self.hourly_wage_hint,
            "converterTitle" => self.converter_title,
            "priceLabel" => self.price_label,
            "clear" => self.clear,
            "copy" => self.copy,
            "note" => self.note,
            "settingsTitle" => self.settings_title,
            "themeLabel" => self.theme_label,
            "themeSystem" => self.theme_system,
            "themeLight" => self.theme_light,
            "themeDark" => self.theme_dark,
            "languageLabel" => self.language_label,
            "currencyLabel" => self.currency_label,
            "currencyHint" => self.currency_hint,
            "save" => self.save,
            "resultEmpty" => self.result_empty,
            "resultInvalid" => self.result_invalid,
            "copied" => self.copied,
            _ => return None,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_language_falls_back_to_italian() {
        assert_eq!(dictionary_for_code("de"), dictionary(Lang::It));
        assert_eq!(dictionary_for_code("en").save, "Save");
    }

    #[test]
    fn test_lookup_by_key() {
        let en = dictionary(Lang::En);
        assert_eq!(en.get("settingsTitle"), Some("Settings"));
        assert_eq!(dictionary(Lang::It).get("clear"), Some("Pulisci"));
        assert_eq!(en.get("noSuchKey"), None);
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(dictionary(Lang::It).theme_name(Theme::Dark), "Scuro");
        assert_eq!(dictionary(Lang::En).theme_name(Theme::System), "System");
    }
}
