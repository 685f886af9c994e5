use serde::{Deserialize, Serialize};

/// Тенанты ERP-системы вендора
///
/// Оба тенанта обслуживаются одним и тем же хостом, но через разные
/// RPC-действия (`action`). Запрос к одному тенанту никогда не должен
/// возвращать данные другого.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenant {
    Avante,
    Iospl,
}

impl Tenant {
    /// Получить код тенанта
    pub fn code(&self) -> &'static str {
        match self {
            Tenant::Avante => "avante",
            Tenant::Iospl => "iospl",
        }
    }

    /// Имя RPC-действия для выборки отчёта продаж
    pub fn action_name(&self) -> &'static str {
        match self {
            Tenant::Avante => "get_sales_report",
            Tenant::Iospl => "get_iospl_sales_report",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            Tenant::Avante => "Avante Medicals",
            Tenant::Iospl => "IOSPL",
        }
    }

    /// Получить все тенанты
    pub fn all() -> Vec<Tenant> {
        vec![Tenant::Avante, Tenant::Iospl]
    }

    /// Парсинг из кода
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "avante" => Some(Tenant::Avante),
            "iospl" => Some(Tenant::Iospl),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tenant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
