pub mod format;
pub mod json;

pub use json::ApiJson;
