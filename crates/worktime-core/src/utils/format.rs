/// Shown in place of a number that cannot be rendered
pub const PLACEHOLDER: &str = "—";

/// Separator convention used when rendering numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    /// `1,234.56`
    #[default]
    English,
    /// `1.234,56`
    Italian,
}

impl NumberLocale {
    fn separators(&self) -> (char, char) {
        match self {
            NumberLocale::English => (',', '.'),
            NumberLocale::Italian => ('.', ','),
        }
    }
}

/// Round to `decimals` places with ties going away from zero.
///
/// `format!` alone rounds exact ties to even (`0.125` -> `0.12`).
fn round_half_away(n: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (n * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        n
    }
}

/// Format a number with a fixed number of decimals and thousands grouping.
/// Non-finite values render as a dash.
pub fn format_number(n: f64, decimals: usize) -> String {
    format_number_in(n, decimals, NumberLocale::default())
}

/// Format a number with a fixed number of decimals using the separators of
/// `locale`.
pub fn format_number_in(n: f64, decimals: usize, locale: NumberLocale) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let (group_sep, decimal_sep) = locale.separators();
    let fixed = format!("{:.*}", decimals, round_half_away(n, decimals));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{}{}{}{}", sign, grouped, decimal_sep, frac),
        None => format!("{}{}", sign, grouped),
    }
}
