pub mod p901_sales_summary;
