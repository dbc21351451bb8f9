pub mod analyzers;
pub mod collector;
pub mod config;
pub mod delay;
pub mod fetch;
pub mod infra;
pub mod observation;
pub mod output;
pub mod parser;
pub mod services;
pub mod speed;
