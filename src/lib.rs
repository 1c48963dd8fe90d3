// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod scheduler;
pub mod sources;
pub mod version;
