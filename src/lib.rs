pub mod config;
pub mod errors;
pub mod logo_assets;
pub mod models;
pub mod resolver;
pub mod services;
pub mod utils;
