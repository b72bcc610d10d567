pub mod buffer;
pub mod decode;
pub mod error;
pub mod producer;
