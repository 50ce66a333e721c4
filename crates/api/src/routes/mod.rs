pub mod climate;
mod error;
pub mod health;
pub mod home;

pub use climate::*;
pub use error::{ApiError, ErrorResponse};
pub use health::*;
pub use home::*;
