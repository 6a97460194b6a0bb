//! Number formatting for the context text.

/// Placeholder for values that cannot be computed (empty groups, NaN).
pub const NOT_AVAILABLE: &str = "n/a";

/// Fixed decimals with comma thousands separators: `1234567.891` -> `1,234,567.89`.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let raw = format!("{:.*}", decimals, value);
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(raw.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Dollar amount with thousands separators.
pub fn money(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("${}", grouped(value, decimals))
}

/// Ratio as a percentage: `0.0523` -> `5.23%`.
pub fn percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}%", ratio * 100.0)
}

/// Ratio as a signed percentage: `0.0523` -> `+5.23%`.
pub fn signed_percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:+.2}%", ratio * 100.0)
}

/// Plain fixed-point value, `n/a` when not finite.
pub fn fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.*}", decimals, value)
}
