use serde::{Deserialize, Serialize};

/// Метка периода отчёта
///
/// Передаётся в запрос и эхом возвращается в результате. Ядро никогда не
/// вычисляет границы окна по метке — даты всегда задаёт вызывающая сторона.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    #[default]
    Custom,
}

impl Period {
    /// Получить код периода
    pub fn code(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::Custom => "custom",
        }
    }

    /// Парсинг из кода
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            "custom" => Some(Period::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
