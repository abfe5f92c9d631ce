/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Filled cells for `percent` of a bar `width` cells wide, rounded down.
pub fn filled_cells(percent: f64, width: usize) -> usize {
    if !percent.is_finite() {
        return 0;
    }
    let ratio = percent.clamp(0.0, 100.0) / 100.0;
    ((ratio * width as f64).floor() as usize).min(width)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLevel {
    Normal,
    Caution,
    Warning,
}

pub fn bar_level(percent_used: f64) -> BarLevel {
    if percent_used > 80.0 {
        BarLevel::Warning
    } else if percent_used > 60.0 {
        BarLevel::Caution
    } else {
        BarLevel::Normal
    }
}
