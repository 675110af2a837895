pub mod demo;
pub mod entitlement;
pub mod oscola;
pub mod study;
pub mod transcripts;
pub mod vendors;
pub mod wellbeing;
pub mod writing;

pub use entitlement::{Entitlement, Feature};
