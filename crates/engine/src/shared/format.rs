/// Форматирует сумму в индийской системе разрядов (лакхи, кроры)
///
/// # Примеры
/// ```
/// use engine::shared::format::format_indian_number;
/// assert_eq!(format_indian_number(1234567.0), "12,34,567.00");
/// assert_eq!(format_indian_number(42.5), "42.50");
/// ```
pub fn format_indian_number(value: f64) -> String {
    let negative = value < 0.0;
    let value = value.abs();

    let s = format!("{:.2}", value);
    let (int_part, dec_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let grouped = group_indian(int_part);
    let result = format!("{}.{}", grouped, dec_part);
    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Форматирует сумму как рупии
pub fn format_inr(value: f64) -> String {
    format!("\u{20b9}{}", format_indian_number(value))
}

/// Форматирует количество без дробной части
pub fn format_qty(value: f64) -> String {
    let negative = value < 0.0;
    let grouped = group_indian(&(value.abs().trunc() as i64).to_string());
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// Последние три цифры отделяются запятой, дальше группы по две
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right.to_string());
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest.to_string());
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
