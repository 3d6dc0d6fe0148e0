pub mod backend;
pub mod metrics;
