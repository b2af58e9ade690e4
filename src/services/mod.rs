pub use auth::*;
pub use storage::*;

mod auth;
mod storage;
