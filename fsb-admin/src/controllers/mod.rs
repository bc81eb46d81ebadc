pub mod bots;
pub mod dashboard;
pub mod files;
pub mod health;
pub mod settings;
pub mod stats;
