pub mod forms;
pub mod handlers;
pub mod helpers;
pub mod middleware;
pub mod notice;
pub mod security;
pub mod state;
pub mod templates;
pub mod uploads;

pub use handlers::configure;
pub use state::AppState;
