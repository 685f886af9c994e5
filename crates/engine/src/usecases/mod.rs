pub mod u501_import_sales_report;
