mod config;
mod constants;
mod data;
mod error;
mod round;
mod stats;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use error::*;
pub use round::*;
pub use stats::*;
