//! Product Sheet Crawler
//!
//! Crawls product search pages listed in a seed spreadsheet, visits every
//! product's detail page and writes one spreadsheet row per unique product.
//! Detail attributes become extra columns after the fixed
//! `Product Name`, `Rating` and `Price` columns.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{RunReport, run};
pub use domain::{ColumnSchema, OutputTable, ProductRecord};
pub use infrastructure::AppConfig;
