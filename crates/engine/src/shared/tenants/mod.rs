use contracts::enums::tenant::Tenant;

use crate::shared::config::VendorConfig;
use crate::usecases::u501_import_sales_report::erp_api_client::ErpApiClient;

/// Результат проверки подключения к ERP вендора
#[derive(Debug, Clone)]
pub struct TestConnectionResult {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
}

/// Определение тенанта по коду или описанию
pub fn get_tenant(tenant_code: &str) -> Option<Tenant> {
    let code_lower = tenant_code.to_lowercase();

    // Сначала проверяем точные совпадения кодов
    if let Some(tenant) = Tenant::from_code(&code_lower) {
        return Some(tenant);
    }

    // Затем частичные совпадения
    if code_lower.contains("avante") {
        return Some(Tenant::Avante);
    }
    if code_lower.contains("iospl") {
        return Some(Tenant::Iospl);
    }

    None
}

/// Проверка подключения к ERP: login и сразу logout
///
/// Лёгкий способ убедиться, что адрес и учётные данные валидны, не
/// запрашивая отчёт.
pub fn test_vendor_connection(config: &VendorConfig) -> TestConnectionResult {
    if config.base_url.trim().is_empty() {
        return TestConnectionResult {
            success: false,
            message: "Vendor base_url is empty".into(),
            details: None,
        };
    }
    if config.preset_bearer_token.is_none() && config.username.trim().is_empty() {
        return TestConnectionResult {
            success: false,
            message: "Vendor credentials are not configured".into(),
            details: Some("Set username/password or preset_bearer_token in config.toml".into()),
        };
    }

    let mut client = ErpApiClient::new(config);
    if client.ensure_token() {
        client.logout();
        TestConnectionResult {
            success: true,
            message: "Vendor connection established".into(),
            details: None,
        }
    } else {
        TestConnectionResult {
            success: false,
            message: "Vendor authentication failed".into(),
            details: client.last_error().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tenant_exact_and_partial() {
        assert_eq!(get_tenant("avante"), Some(Tenant::Avante));
        assert_eq!(get_tenant("iospl"), Some(Tenant::Iospl));
        assert_eq!(get_tenant("Avante Medicals"), Some(Tenant::Avante));
        assert_eq!(get_tenant("IOSPL ERP"), Some(Tenant::Iospl));
        assert_eq!(get_tenant("stryker"), None);
    }

    #[test]
    fn test_connection_probe_rejects_empty_credentials() {
        let config: VendorConfig = toml::from_str(
            r#"
            base_url = "https://erp.test/API/api.php"
            username = ""
            password = ""
            "#,
        )
        .unwrap();

        let result = test_vendor_connection(&config);
        assert!(!result.success);
        assert!(result.message.contains("credentials"));
    }
}
