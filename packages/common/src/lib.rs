pub mod config;
pub mod document;
pub mod identity;
pub mod models;
pub mod return_type;
pub mod storage;
pub mod validation;

pub use return_type::ReturnType;
