//! Domain models for the drug recommender.

mod condition;
mod ranking;
mod review;

pub use condition::*;
pub use ranking::*;
pub use review::*;
