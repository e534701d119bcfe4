//! Application service layer - intake use case, config, scanning, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
pub mod scanner;
