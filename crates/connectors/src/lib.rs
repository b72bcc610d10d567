pub mod adapter;
pub mod elasticsearch;
pub mod error;
