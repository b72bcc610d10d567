pub mod status;
pub mod worker;

pub use status::SessionStatus;
pub use worker::{FetchWorker, FetchWorkerParams};
