pub mod builder;
pub mod normalizer;

pub use builder::{
    by_category, by_city, by_dealer, by_state, overall, top_city_by_count, top_dealer_by_count,
    top_state_by_count,
};
pub use normalizer::{exclude_dealer_contains, normalize};
