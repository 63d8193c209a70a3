pub mod budget;
pub mod error;
pub mod lexicon;
pub mod policy;
pub mod scoring;
pub mod summary;
pub mod types;

pub use budget::{simulate, BudgetSimulator};
pub use error::InputError;
pub use lexicon::*;
pub use policy::*;
pub use scoring::{score, LeadScorer};
pub use types::*;
