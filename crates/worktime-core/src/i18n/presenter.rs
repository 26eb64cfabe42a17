use crate::convert::Conversion;
use crate::models::{Currency, Lang};
use crate::utils::{format_number_in, PLACEHOLDER};

use super::dictionary::dictionary;

/// Decimals shown for the decimal hour count
const HOURS_DECIMALS: usize = 2;

/// The two result lines shown under the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub main: String,
    pub sub: String,
    pub is_error: bool,
}

impl ResultView {
    /// Text placed on the clipboard: `"main (sub)"`
    pub fn copy_text(&self) -> String {
        format!("{} ({})", self.main, self.sub)
    }
}

/// Render a conversion in `lang`.
pub fn present(conversion: &Conversion, lang: Lang) -> ResultView {
    let dict = dictionary(lang);
    match conversion {
        Conversion::Empty => ResultView {
            main: PLACEHOLDER.to_string(),
            sub: dict.result_empty.to_string(),
            is_error: false,
        },
        Conversion::Invalid => ResultView {
            main: PLACEHOLDER.to_string(),
            sub: dict.result_invalid.to_string(),
            is_error: true,
        },
        Conversion::Ok(work_time) => ResultView {
            main: format!("{}h {}m", work_time.duration.hours, work_time.duration.minutes),
            sub: format!(
                "≈ {} {}",
                format_number_in(work_time.hours, HOURS_DECIMALS, lang.number_locale()),
                dict.hours_word
            ),
            is_error: false,
        },
    }
}

/// Suffix shown after the wage input, e.g. `€/h`
pub fn wage_suffix(currency: Currency) -> String {
    format!("{}/h", currency.symbol())
}
