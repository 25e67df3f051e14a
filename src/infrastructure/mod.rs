pub mod catalog;
pub mod chat_api;
pub mod config;
pub mod store;

pub use catalog::*;
pub use chat_api::*;
pub use config::*;
pub use store::*;
