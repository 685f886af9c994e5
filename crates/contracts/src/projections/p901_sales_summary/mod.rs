pub mod dto;

pub use dto::{
    CategorySummaryRow, CitySummaryRow, DealerSummaryRow, OverallStats, StateSummaryRow,
};
