//! Контракты UseCase импорта отчёта продаж из ERP вендора

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::period::Period;
use crate::enums::tenant::Tenant;

/// Формат дат, принимаемый вендором
pub const VENDOR_DATE_FORMAT: &str = "%d-%m-%Y";

/// Запрошенное окно дат, формат DD-MM-YYYY
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Проверка окна по грамматике вендора, включая start <= end
    pub fn validate(&self) -> anyhow::Result<()> {
        let start = NaiveDate::parse_from_str(&self.start, VENDOR_DATE_FORMAT)
            .map_err(|_| anyhow::anyhow!("start date '{}' is not DD-MM-YYYY", self.start))?;
        let end = NaiveDate::parse_from_str(&self.end, VENDOR_DATE_FORMAT)
            .map_err(|_| anyhow::anyhow!("end date '{}' is not DD-MM-YYYY", self.end))?;

        if start > end {
            anyhow::bail!("start date {} is after end date {}", self.start, self.end);
        }
        Ok(())
    }
}

/// Итог запроса отчёта продаж
///
/// Все виды ошибок схлопываются в `success == false` с человекочитаемым
/// `message`; `report_data` при этом пустой, а `date_range` и `period`
/// всегда отражают исходный запрос.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReportOutcome {
    pub success: bool,
    pub message: String,
    pub tenant: Tenant,

    /// Сырые записи отчёта; пустой массив при ошибке или отсутствии данных
    #[serde(default)]
    pub report_data: Vec<serde_json::Value>,
    pub total_records: usize,

    // Эхо запроса
    pub period: Period,
    pub date_range: DateRange,
}

impl SalesReportOutcome {
    pub fn failure(
        tenant: Tenant,
        period: Period,
        date_range: DateRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            tenant,
            report_data: Vec::new(),
            total_records: 0,
            period,
            date_range,
        }
    }
}
