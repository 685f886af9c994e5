use anyhow::Result;
use contracts::domain::sales_record::CanonicalSalesRecord;
use contracts::enums::period::Period;
use contracts::enums::tenant::Tenant;
use contracts::projections::p901_sales_summary::{
    CategorySummaryRow, CitySummaryRow, DealerSummaryRow, OverallStats, StateSummaryRow,
};
use contracts::usecases::u501_import_sales_report::SalesReportOutcome;

use super::erp_api_client::ErpApiClient;
use crate::projections::p901_sales_summary::{
    by_category, by_city, by_dealer, by_state, exclude_dealer_contains, normalize, overall,
};
use crate::shared::tenants;

/// Результат прохода выборка -> нормализация -> агрегация
#[derive(Debug, Clone)]
pub struct SalesImportResult {
    pub outcome: SalesReportOutcome,
    pub records: Vec<CanonicalSalesRecord>,
    /// Число записей с нераспарсившимися числовыми полями
    pub numeric_failures: usize,

    pub overall: OverallStats,
    pub by_dealer: Vec<DealerSummaryRow>,
    pub by_state: Vec<StateSummaryRow>,
    pub by_city: Vec<CitySummaryRow>,
    pub by_category: Vec<CategorySummaryRow>,
}

/// Выполнить полный проход импорта отчёта продаж для тенанта
///
/// `exclude_dealer` — опциональный фильтр дашборда: дилеры, чьё имя
/// содержит подстроку, исключаются до агрегации.
pub fn run_sales_import(
    client: &mut ErpApiClient,
    tenant: Tenant,
    start_date: &str,
    end_date: &str,
    period: Period,
    exclude_dealer: Option<&str>,
) -> Result<SalesImportResult> {
    let outcome = client.get_sales_report(tenant, start_date, end_date, period);
    if !outcome.success {
        anyhow::bail!("Sales report fetch failed for {}: {}", tenant, outcome.message);
    }

    let mut records = normalize(&outcome.report_data);
    if let Some(needle) = exclude_dealer {
        let before = records.len();
        records = exclude_dealer_contains(records, needle);
        tracing::info!(
            "Dealer filter '{}' removed {} of {} records",
            needle,
            before - records.len(),
            before
        );
    }

    let numeric_failures = records.iter().filter(|r| !r.has_numeric()).count();

    let result = SalesImportResult {
        overall: overall(&records),
        by_dealer: by_dealer(&records),
        by_state: by_state(&records),
        by_city: by_city(&records),
        by_category: by_category(&records),
        numeric_failures,
        records,
        outcome,
    };

    tracing::info!(
        "Sales import for {}: {} records, {} dealers, {} numeric failures",
        tenant,
        result.records.len(),
        result.by_dealer.len(),
        result.numeric_failures
    );

    Ok(result)
}

/// То же, но с тенантом, заданным строковым кодом
pub fn run_sales_import_for_code(
    client: &mut ErpApiClient,
    tenant_code: &str,
    start_date: &str,
    end_date: &str,
    period: Period,
    exclude_dealer: Option<&str>,
) -> Result<SalesImportResult> {
    let tenant = tenants::get_tenant(tenant_code)
        .ok_or_else(|| anyhow::anyhow!("Unknown tenant code: {}", tenant_code))?;
    run_sales_import(client, tenant, start_date, end_date, period, exclude_dealer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::VendorConfig;
    use crate::usecases::u501_import_sales_report::erp_api_client::{
        ApiError, SystemClock, VendorTransport,
    };
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct QueueTransport {
        responses: RefCell<VecDeque<Value>>,
    }

    impl VendorTransport for QueueTransport {
        fn post(&self, _action: &str, _body: &Value, _bearer: Option<&str>) -> Result<Value, ApiError> {
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Transport("no scripted response".to_string()))
        }
    }

    fn client_with(responses: Vec<Value>) -> ErpApiClient {
        crate::shared::logging::init();
        let config: VendorConfig = toml::from_str(
            r#"
            base_url = "https://erp.test/API/api.php"
            username = "user"
            password = "pass"
            "#,
        )
        .unwrap();
        ErpApiClient::with_parts(
            Box::new(QueueTransport {
                responses: RefCell::new(responses.into()),
            }),
            Box::new(SystemClock),
            &config,
        )
    }

    fn report(records: Value) -> Value {
        json!({ "status": "success", "report_data": records })
    }

    fn login_ok() -> Value {
        json!({ "status": "success", "token": "T", "refresh_token": "R" })
    }

    #[test]
    fn test_full_import_pass() {
        let mut client = client_with(vec![
            login_ok(),
            report(json!([
                { "comp_nm": "A", "state": "S1", "city": "C1", "category_name": "P", "SV": "100", "SQ": "2" },
                { "comp_nm": "B", "SV": "abc", "SQ": "1" },
            ])),
        ]);

        let result = run_sales_import(
            &mut client,
            Tenant::Avante,
            "01-01-2025",
            "31-01-2025",
            Period::Month,
            None,
        )
        .unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.numeric_failures, 1);
        assert_eq!(result.overall.total_revenue, 100.0);
        assert_eq!(result.by_dealer.len(), 2);
        assert_eq!(result.by_dealer[0].dealer_name, "A");
        assert!(result.outcome.success);
        assert_eq!(result.outcome.total_records, 2);
    }

    #[test]
    fn test_dealer_filter_applied_before_aggregation() {
        let mut client = client_with(vec![
            login_ok(),
            report(json!([
                { "comp_nm": "Innovative Ortho", "SV": "500", "SQ": "5" },
                { "comp_nm": "Dealer A", "SV": "100", "SQ": "1" },
            ])),
        ]);

        let result = run_sales_import(
            &mut client,
            Tenant::Avante,
            "01-01-2025",
            "31-01-2025",
            Period::Month,
            Some("innovative"),
        )
        .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.overall.total_revenue, 100.0);
        assert_eq!(result.by_dealer.len(), 1);
        assert_eq!(result.by_dealer[0].dealer_name, "Dealer A");
    }

    #[test]
    fn test_failed_fetch_becomes_error() {
        let mut client = client_with(vec![
            login_ok(),
            json!({ "status": "error", "message": "quota" }),
        ]);

        let err = run_sales_import(
            &mut client,
            Tenant::Iospl,
            "01-01-2025",
            "31-01-2025",
            Period::Month,
            None,
        )
        .unwrap_err();

        assert!(err.to_string().contains("quota"));
    }

    #[test]
    fn test_tenant_resolved_from_code() {
        let mut client = client_with(vec![login_ok(), report(json!([]))]);

        let result = run_sales_import_for_code(
            &mut client,
            "iospl",
            "01-01-2025",
            "31-01-2025",
            Period::Custom,
            None,
        )
        .unwrap();
        assert_eq!(result.outcome.tenant, Tenant::Iospl);

        let err = run_sales_import_for_code(
            &mut client,
            "stryker",
            "01-01-2025",
            "31-01-2025",
            Period::Custom,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown tenant"));
    }
}
