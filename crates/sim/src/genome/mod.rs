//! Individual records and their identifiers.

mod individual;

pub use individual::{Individual, IndividualId, Sex};
