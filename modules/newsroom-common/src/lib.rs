pub mod config;
pub mod error;
pub mod primitives;
pub mod quality;
pub mod types;

pub use config::Config;
pub use error::NewsroomError;
pub use primitives::*;
pub use quality::*;
pub use types::*;
