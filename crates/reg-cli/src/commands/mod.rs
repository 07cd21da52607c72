pub mod config;
pub mod dispatch;
pub mod events;
pub mod metrics;
pub mod profile;
pub mod resample;
pub mod run;
pub mod schema;
