pub mod analyze;
pub mod config;
pub mod error;
pub mod parse;
pub mod store;
pub mod validate;
pub mod wasm;
