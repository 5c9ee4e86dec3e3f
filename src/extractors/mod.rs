// src/extractors/mod.rs
pub mod attributes;
pub mod shortcode;

// Re-export key extraction types for convenience
pub use shortcode::ShortcodeExtractor;
