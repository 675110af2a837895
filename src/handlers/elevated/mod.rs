// handlers/elevated/mod.rs - admin cookie required (see `AdminSession`)
pub mod access_requests;
pub mod subscriptions;
