pub mod duration;
pub mod filter;
pub mod request;
pub mod spec;
