pub mod filter;
pub mod order;
