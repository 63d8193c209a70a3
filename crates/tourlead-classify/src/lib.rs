pub mod config;
pub mod error;
pub mod factory;
pub mod providers;
pub mod traits;

pub use config::*;
pub use error::ClassifierError;
pub use factory::*;
pub use traits::*;
