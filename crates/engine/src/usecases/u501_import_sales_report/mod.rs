pub mod erp_api_client;
pub mod executor;

pub use erp_api_client::{ApiError, ErpApiClient, HttpTransport, VendorTransport};
pub use executor::{run_sales_import, run_sales_import_for_code, SalesImportResult};
