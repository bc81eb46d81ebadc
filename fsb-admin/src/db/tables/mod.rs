//! Table operations - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for one table.

mod bots;     // bots
mod files;    // files
mod settings; // settings
