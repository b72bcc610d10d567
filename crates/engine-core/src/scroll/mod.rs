pub mod cursor;
pub mod stream;

pub use cursor::{CursorState, ScrollCursor};
