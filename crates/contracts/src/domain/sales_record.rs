use serde::{Deserialize, Serialize};

/// Каноническая запись отчёта продаж
///
/// Результат нормализации сырой записи ERP: ключевые поля переименованы и
/// очищены, числовые поля приведены к `f64`. Сырая запись сохраняется в
/// `raw` как есть — потребители могут читать из неё дополнительные поля,
/// которые нормализация не трогает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSalesRecord {
    // Группировочные ключи: после нормализации всегда непустые,
    // пустые значения заменяются на "Unknown"
    pub dealer: String,
    pub state: String,
    pub city: String,
    pub product: String,

    // Контекстные поля: пустые остаются пустыми
    pub parent_category: String,
    pub code: String,

    // Числовые поля: None означает, что значение не распарсилось.
    // Такая запись всё равно учитывается в transaction_count.
    pub value: Option<f64>,
    pub qty: Option<f64>,

    /// Сырая запись, как её вернул вендор
    pub raw: serde_json::Value,
}

impl CanonicalSalesRecord {
    /// Распарсились ли оба числовых поля
    pub fn has_numeric(&self) -> bool {
        self.value.is_some() && self.qty.is_some()
    }
}

/// Исходные имена полей в ответе вендора
pub mod raw_fields {
    pub const SALES_VALUE: &str = "SV";
    pub const SALES_QTY: &str = "SQ";
    pub const COMPANY_NAME: &str = "comp_nm";
    pub const STATE: &str = "state";
    pub const CITY: &str = "city";
    pub const CATEGORY_NAME: &str = "category_name";
    pub const PARENT_CATEGORY: &str = "parent_category";
    pub const META_KEYWORD: &str = "meta_keyword";
}
