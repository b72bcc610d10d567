pub mod hit;
pub mod record;
