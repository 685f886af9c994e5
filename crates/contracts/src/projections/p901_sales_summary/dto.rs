use serde::{Deserialize, Serialize};

/// DTO для строки сводки по дилеру (P901)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerSummaryRow {
    pub dealer_name: String,

    // Sums
    pub total_sales: f64,
    pub total_quantity: f64,

    /// Число сырых записей в группе, независимо от валидности чисел
    pub transaction_count: u64,
}

/// DTO для строки сводки по штату (P901)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummaryRow {
    pub state: String,

    // Sums
    pub total_sales: f64,
    pub total_quantity: f64,
    pub transaction_count: u64,
}

/// DTO для строки сводки по городу (P901)
///
/// `state` берётся из первой записи, встретившейся для этого города.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummaryRow {
    pub city: String,
    pub state: String,

    // Sums
    pub total_sales: f64,
    pub total_quantity: f64,
    pub transaction_count: u64,
}

/// DTO для строки сводки по категории товара (P901)
///
/// `parent_category` берётся из первой записи, встретившейся для товара.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummaryRow {
    pub product: String,
    pub parent_category: String,

    // Sums
    pub total_sales: f64,
    pub total_quantity: f64,
    pub transaction_count: u64,
}

/// Общая статистика по выборке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Суммарная выручка, округлённая до 2 знаков
    pub total_revenue: f64,
    /// Суммарное количество, усечённое до целого
    pub total_quantity: i64,
    /// Число записей в выборке
    pub total_orders: u64,
    pub distinct_dealers: usize,
    pub distinct_products: usize,

    /// Сырой report_data, переданный насквозь для потребителей
    pub data: Vec<serde_json::Value>,
}
