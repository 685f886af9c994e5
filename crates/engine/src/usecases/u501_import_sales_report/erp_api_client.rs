use chrono::{DateTime, Duration, Utc};
use contracts::enums::period::Period;
use contracts::enums::tenant::Tenant;
use contracts::usecases::u501_import_sales_report::{DateRange, SalesReportOutcome};
use serde_json::{json, Value};
use thiserror::Error;

use crate::shared::config::VendorConfig;

/// Ошибки при работе с ERP API вендора
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Vendor error: {0}")]
    Vendor(String),
}

/// Источник текущего времени
///
/// Отделён от клиента, чтобы тесты могли управлять временем жизни токена.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Транспорт до ERP: POST JSON на `<base_url>?action=<action>`
///
/// Транспорт не интерпретирует конверт ответа, только доставляет его.
pub trait VendorTransport {
    fn post(&self, action: &str, body: &Value, bearer: Option<&str>) -> Result<Value, ApiError>;
}

/// Боевой транспорт поверх reqwest (blocking)
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &VendorConfig) -> Self {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds));

        if !config.tls_verify {
            // Только через явный опт-аут в конфигурации
            tracing::warn!("TLS certificate verification is DISABLED for {}", config.base_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        Self {
            client: builder.build().expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl VendorTransport for HttpTransport {
    fn post(&self, action: &str, body: &Value, bearer: Option<&str>) -> Result<Value, ApiError> {
        let url = format!("{}?action={}", self.base_url, action);
        tracing::debug!("ERP API: POST {} body={}", url, body);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| ApiError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        tracing::debug!("ERP API response: {} for action={}", status, action);

        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ApiError::Transport(format!(
                "HTTP {} for action={}: {}",
                status, action, text
            )));
        }

        let text = response
            .text()
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(500).collect();
            ApiError::Transport(format!("Failed to parse ERP JSON: {}. Body: {}", e, preview))
        })
    }
}

/// HTTP-клиент для работы с ERP API вендора (тенанты Avante и IOSPL)
///
/// Владеет состоянием сессии: токен, refresh-токен и срок жизни токена
/// изменяются только в login/refresh/logout. Экземпляр рассчитан на
/// использование из одного потока; для параллельных выборок создавайте
/// отдельные экземпляры.
pub struct ErpApiClient {
    transport: Box<dyn VendorTransport>,
    clock: Box<dyn Clock>,

    username: String,
    password: String,
    token_lifetime: Duration,

    token: Option<String>,
    refresh_token: Option<String>,
    token_expiry: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl ErpApiClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self::with_parts(
            Box::new(HttpTransport::new(config)),
            Box::new(SystemClock),
            config,
        )
    }

    /// Собрать клиент из частей; используется тестами для подмены
    /// транспорта и часов
    pub fn with_parts(
        transport: Box<dyn VendorTransport>,
        clock: Box<dyn Clock>,
        config: &VendorConfig,
    ) -> Self {
        Self {
            transport,
            clock,
            username: config.username.clone(),
            password: config.password.clone(),
            token_lifetime: Duration::hours(config.token_lifetime_hours),
            // Преднастроенный токен живёт без срока — до logout
            token: config.preset_bearer_token.clone(),
            refresh_token: None,
            token_expiry: None,
            last_error: None,
        }
    }

    /// Последняя зафиксированная ошибка авторизации
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Аутентификация в ERP и получение токенов
    ///
    /// Неудача не является исключительной ситуацией: возвращается false,
    /// состояние сессии остаётся нетронутым.
    pub fn login(&mut self) -> bool {
        let payload = json!({
            "username": self.username,
            "password": self.password,
        });
        tracing::info!("ERP API: login request for user '{}'", self.username);

        match self.transport.post("login", &payload, None) {
            Ok(envelope) => {
                if envelope.get("status").and_then(Value::as_str) == Some("success") {
                    self.token = envelope
                        .get("token")
                        .and_then(Value::as_str)
                        .map(String::from);
                    self.refresh_token = envelope
                        .get("refresh_token")
                        .and_then(Value::as_str)
                        .map(String::from);
                    self.token_expiry = Some(self.clock.now() + self.token_lifetime);
                    self.last_error = None;
                    tracing::info!(
                        "ERP API: login successful, token expires at {:?}",
                        self.token_expiry
                    );
                    true
                } else {
                    let message = envelope
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown error")
                        .to_string();
                    tracing::error!("ERP API: login failed: {}", message);
                    self.last_error = Some(message);
                    false
                }
            }
            Err(e) => {
                tracing::error!("ERP API: login error: {}", e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Обновить access-токен по refresh-токену
    pub fn refresh_access_token(&mut self) -> bool {
        let refresh_token = match &self.refresh_token {
            Some(t) => t.clone(),
            None => return false,
        };

        let payload = json!({ "refresh_token": refresh_token });
        match self.transport.post("refresh_token", &payload, None) {
            Ok(envelope) => {
                let refreshed = envelope.get("status").and_then(Value::as_str) == Some("success")
                    || envelope.get("token").is_some();
                if refreshed {
                    if let Some(token) = envelope.get("token").and_then(Value::as_str) {
                        self.token = Some(token.to_string());
                    }
                    if let Some(rt) = envelope.get("refresh_token").and_then(Value::as_str) {
                        self.refresh_token = Some(rt.to_string());
                    }
                    self.token_expiry = Some(self.clock.now() + self.token_lifetime);
                    tracing::info!("ERP API: access token refreshed");
                }
                refreshed
            }
            Err(e) => {
                tracing::warn!("ERP API: token refresh failed: {}", e);
                false
            }
        }
    }

    /// Валиден ли текущий токен
    ///
    /// Токен без срока жизни (преднастроенный bearer) считается валидным
    /// до logout.
    pub fn is_token_valid(&self) -> bool {
        match (&self.token, &self.token_expiry) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(expiry)) => self.clock.now() < *expiry,
        }
    }

    /// Гарантировать валидный токен: refresh, затем login, без повторов
    pub fn ensure_token(&mut self) -> bool {
        if self.is_token_valid() {
            return true;
        }
        if self.refresh_token.is_some() && self.refresh_access_token() {
            return true;
        }
        self.login()
    }

    /// Завершить сессию
    ///
    /// Logout на стороне вендора выполняется по возможности; локальное
    /// состояние очищается безусловно, включая преднастроенный токен.
    pub fn logout(&mut self) -> bool {
        let bearer = self.token.clone();
        if let Err(e) = self.transport.post("logout", &json!({}), bearer.as_deref()) {
            tracing::warn!("ERP API: logout request failed: {}", e);
        }

        self.token = None;
        self.refresh_token = None;
        self.token_expiry = None;
        self.last_error = None;
        tracing::info!("ERP API: session cleared");
        true
    }

    /// Выборка отчёта продаж за окно дат
    ///
    /// Все ошибки схлопываются в `SalesReportOutcome { success: false, .. }`;
    /// эхо запроса сохраняется в любом случае.
    pub fn get_sales_report(
        &mut self,
        tenant: Tenant,
        start_date: &str,
        end_date: &str,
        period: Period,
    ) -> SalesReportOutcome {
        let date_range = DateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        };

        match self.try_get_sales_report(tenant, start_date, end_date) {
            Ok(report_data) => {
                let total_records = report_data.len();
                tracing::info!(
                    "ERP API: fetched {} records for tenant={} range={}..{}",
                    total_records,
                    tenant,
                    start_date,
                    end_date
                );
                SalesReportOutcome {
                    success: true,
                    message: "Data fetched successfully".to_string(),
                    tenant,
                    report_data,
                    total_records,
                    period,
                    date_range,
                }
            }
            Err(e) => {
                tracing::error!("ERP API: sales report fetch failed: {}", e);
                SalesReportOutcome::failure(tenant, period, date_range, e.to_string())
            }
        }
    }

    /// Вариант с типизированной ошибкой
    pub fn try_get_sales_report(
        &mut self,
        tenant: Tenant,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Value>, ApiError> {
        // Валидация окна до любого сетевого вызова
        validate_window(start_date, end_date)?;

        if !self.ensure_token() {
            let message = self
                .last_error
                .clone()
                .unwrap_or_else(|| "Authentication failed".to_string());
            return Err(ApiError::AuthFailure(message));
        }

        let payload = json!({
            "startdate": start_date,
            "enddate": end_date,
        });

        let envelope =
            self.transport
                .post(tenant.action_name(), &payload, self.token.as_deref())?;

        if envelope.get("status").and_then(Value::as_str) != Some("success") {
            let message = envelope
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            // Отказ в авторизации означает недействительный токен,
            // в том числе преднастроенный: сессия очищается, следующий
            // запрос снова пройдёт через ensure_token
            if is_auth_rejection(&message) {
                self.token = None;
                self.refresh_token = None;
                self.token_expiry = None;
                self.last_error = Some(message.clone());
                return Err(ApiError::AuthFailure(message));
            }
            return Err(ApiError::Vendor(message));
        }

        // report_data лежит в корне конверта; отсутствие поля — пустой отчёт
        let report_data = envelope
            .get("report_data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(report_data)
    }
}

// Конверт вендора, сообщающий об отказе в авторизации
fn is_auth_rejection(message: &str) -> bool {
    let m = message.to_lowercase();
    m.contains("token") || m.contains("unauthorized") || m.contains("forbidden")
}

/// Проверка окна дат по грамматике DD-MM-YYYY, включая start <= end
pub fn validate_window(start_date: &str, end_date: &str) -> Result<(), ApiError> {
    DateRange::new(start_date, end_date)
        .validate()
        .map_err(|e| ApiError::InvalidDateFormat(e.to_string()))
}
