/// U+FEFF, which `char::is_whitespace` does not cover
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a decimal number written with either `,` or `.` as decimal separator.
///
/// Whitespace anywhere in the input is ignored. When both separators are
/// present, the one appearing last is the decimal separator and the other is
/// treated as a thousands separator. A lone comma is a decimal comma.
///
/// Returns `None` for empty, unparseable or non-finite input.
///
/// A dot as the only separator is always decimal, so `"1.234"` is `1.234`,
/// never `1234`.
pub fn parse_flexible_number(text: &str) -> Option<f64> {
    let mut s: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != BYTE_ORDER_MARK)
        .collect();
    if s.is_empty() {
        return None;
    }

    let has_comma = s.contains(',');
    let has_dot = s.contains('.');

    if has_comma && !has_dot {
        s = s.replacen(',', ".", 1);
    } else if has_comma && has_dot {
        let (decimal, thousands) = if s.rfind(',') > s.rfind('.') {
            (',', '.')
        } else {
            ('.', ',')
        };
        s.retain(|c| c != thousands);
        if decimal == ',' {
            s = s.replacen(',', ".", 1);
        }
    }

    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
