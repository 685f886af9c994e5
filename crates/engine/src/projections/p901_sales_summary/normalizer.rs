use contracts::domain::sales_record::{raw_fields, CanonicalSalesRecord};
use serde_json::Value;

/// Подстановка для пустых группировочных ключей
const UNKNOWN: &str = "Unknown";

/// Преобразует сырые записи ERP в канонический вид
///
/// Порядок записей сохраняется, записи не отбрасываются и не
/// дедуплицируются. Нераспарсившиеся числа помечаются как отсутствующие,
/// но запись остаётся в выборке.
pub fn normalize(report_data: &[Value]) -> Vec<CanonicalSalesRecord> {
    let mut records = Vec::with_capacity(report_data.len());
    let mut numeric_failures = 0usize;

    for raw in report_data {
        let value = lenient_number(raw, raw_fields::SALES_VALUE);
        let qty = lenient_number(raw, raw_fields::SALES_QTY);
        if value.is_none() || qty.is_none() {
            numeric_failures += 1;
        }

        records.push(CanonicalSalesRecord {
            dealer: key_field(raw, raw_fields::COMPANY_NAME),
            state: key_field(raw, raw_fields::STATE),
            city: key_field(raw, raw_fields::CITY),
            product: key_field(raw, raw_fields::CATEGORY_NAME),
            parent_category: text_field(raw, raw_fields::PARENT_CATEGORY).unwrap_or_default(),
            code: text_field(raw, raw_fields::META_KEYWORD).unwrap_or_default(),
            value,
            qty,
            raw: raw.clone(),
        });
    }

    if numeric_failures > 0 {
        tracing::warn!(
            "Normalized {} records, {} with unparseable numeric fields",
            records.len(),
            numeric_failures
        );
    }

    records
}

/// Исключить дилеров, чьё имя содержит подстроку (без учёта регистра)
///
/// Используется фильтрами дашборда перед агрегацией.
pub fn exclude_dealer_contains(
    records: Vec<CanonicalSalesRecord>,
    needle: &str,
) -> Vec<CanonicalSalesRecord> {
    let needle = needle.to_lowercase();
    records
        .into_iter()
        .filter(|r| !r.dealer.to_lowercase().contains(&needle))
        .collect()
}

/// Текстовое поле: обрезанное, None если пустое или отсутствует
fn text_field(raw: &Value, key: &str) -> Option<String> {
    let text = match raw.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Группировочный ключ: пустое значение заменяется на "Unknown",
/// чтобы каждая запись оставалась классифицируемой
fn key_field(raw: &Value, key: &str) -> String {
    text_field(raw, key).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Терпимый разбор числа из данных вендора
///
/// null, пустая строка и литерал "None" трактуются как ноль; всё, что не
/// парсится как число, помечается отсутствующим.
fn lenient_number(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key) {
        None => None,
        Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s == "None" {
                return Some(0.0);
            }
            // "NaN" и "inf" парсятся как f64, но суммам они не нужны
            s.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_mapping_and_trim() {
        let data = vec![json!({
            "comp_nm": "  Dealer A  ",
            "state": "Maharashtra",
            "city": " Mumbai",
            "category_name": "Implants ",
            "parent_category": "Ortho",
            "meta_keyword": " K-401 ",
            "SV": "1250.50",
            "SQ": "3",
            "cust_id": "77"
        })];

        let records = normalize(&data);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.dealer, "Dealer A");
        assert_eq!(r.city, "Mumbai");
        assert_eq!(r.product, "Implants");
        assert_eq!(r.parent_category, "Ortho");
        assert_eq!(r.code, "K-401");
        assert_eq!(r.value, Some(1250.5));
        assert_eq!(r.qty, Some(3.0));
        // Неизвестные поля доступны через raw
        assert_eq!(r.raw.get("cust_id"), Some(&json!("77")));
    }

    #[test]
    fn test_empty_keys_become_unknown() {
        let data = vec![json!({ "comp_nm": "", "SV": "10", "SQ": "1" })];
        let records = normalize(&data);
        let r = &records[0];
        assert_eq!(r.dealer, "Unknown");
        assert_eq!(r.state, "Unknown");
        assert_eq!(r.city, "Unknown");
        assert_eq!(r.product, "Unknown");
        // Контекстные поля остаются пустыми
        assert_eq!(r.parent_category, "");
        assert_eq!(r.code, "");
    }

    #[test]
    fn test_lenient_numeric_coercion() {
        let data = vec![
            json!({ "SV": null, "SQ": "" }),
            json!({ "SV": "0", "SQ": "None" }),
            json!({ "SV": "abc", "SQ": "x" }),
            json!({ "SV": 12.5, "SQ": 2 }),
        ];

        let records = normalize(&data);
        assert_eq!(records[0].value, Some(0.0));
        assert_eq!(records[0].qty, Some(0.0));
        assert_eq!(records[1].value, Some(0.0));
        assert_eq!(records[1].qty, Some(0.0));
        // Мусор не роняет нормализацию, запись сохраняется
        assert_eq!(records[2].value, None);
        assert_eq!(records[2].qty, None);
        assert_eq!(records[3].value, Some(12.5));
        assert_eq!(records[3].qty, Some(2.0));
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_non_finite_strings_are_non_numeric() {
        let data = vec![
            json!({ "SV": "NaN", "SQ": "inf" }),
            json!({ "SV": "-inf", "SQ": "Infinity" }),
        ];
        let records = normalize(&data);
        for r in &records {
            assert_eq!(r.value, None);
            assert_eq!(r.qty, None);
        }
    }

    #[test]
    fn test_order_preserved_no_dedup() {
        let data = vec![
            json!({ "comp_nm": "B", "SV": "1", "SQ": "1" }),
            json!({ "comp_nm": "A", "SV": "1", "SQ": "1" }),
            json!({ "comp_nm": "B", "SV": "1", "SQ": "1" }),
        ];
        let records = normalize(&data);
        let dealers: Vec<&str> = records.iter().map(|r| r.dealer.as_str()).collect();
        assert_eq!(dealers, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_exclude_dealer_contains() {
        let data = vec![
            json!({ "comp_nm": "Innovative Ortho", "SV": "1", "SQ": "1" }),
            json!({ "comp_nm": "Dealer A", "SV": "1", "SQ": "1" }),
            json!({ "comp_nm": "INNOVATIVE SOUTH", "SV": "1", "SQ": "1" }),
        ];
        let filtered = exclude_dealer_contains(normalize(&data), "innovative");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].dealer, "Dealer A");
    }
}
