//! Display formatting for money, percentages and identifiers

/// Currency prefix used on client-facing documents
pub const CURRENCY_SYMBOL: &str = "RM";

/// Group digits in threes: `1234567` → `"1,234,567"`
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-unit currency amount, e.g. `"RM 765,000"`
pub fn currency(symbol: &str, amount: u64) -> String {
    format!("{} {}", symbol, thousands(amount))
}

/// Percentage without trailing zeros: `15.0` → `"15%"`, `12.5` → `"12.5%"`
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}%", rounded)
    } else {
        let s = format!("{:.2}", rounded);
        format!("{}%", s.trim_end_matches('0'))
    }
}

/// Upper-case base-36 rendering of an integer
pub fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}
