// handlers/public/mod.rs - no authentication
pub mod access;
pub mod admin_session;
pub mod demo;
pub mod root;
