pub mod error;
pub mod functions;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
