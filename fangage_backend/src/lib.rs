pub mod api;
pub mod caption;
pub mod config;
pub mod logs;
pub mod media;
pub mod posts;
pub mod sessions;
pub mod store;
pub mod telemetry;
