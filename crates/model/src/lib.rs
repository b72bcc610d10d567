pub mod pagination;
pub mod query;
pub mod records;
