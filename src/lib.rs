pub mod config;
pub mod dashboard;
pub mod data;
pub mod output;
pub mod pipeline;
