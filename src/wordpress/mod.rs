// src/wordpress/mod.rs
pub mod client;
pub mod models;

pub use client::SqliteContentStore;
