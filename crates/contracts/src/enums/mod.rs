pub mod period;
pub mod tenant;
