use super::NumberFormat;

/// Shown instead of a mean when there is nothing to average.
pub const NO_DATA: &str = "no data";

/// Insert `,` between groups of three digits of an unsigned integer string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_count(n: usize) -> String {
    group_digits(&n.to_string())
}

pub fn format_number(value: f64, format: NumberFormat) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    match format {
        NumberFormat::Fixed2 => format!("{value:.2}"),
        NumberFormat::Grouped2 => {
            let fixed = format!("{:.2}", value.abs());
            let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            let sign = if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
                "-"
            } else {
                ""
            };
            format!("{sign}{}.{frac_part}", group_digits(int_part))
        }
    }
}

/// Display value of a metric that may be undefined.
pub fn format_mean(value: Option<f64>, format: NumberFormat) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format_number(v, format))
}
