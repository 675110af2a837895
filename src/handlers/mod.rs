// handlers/mod.rs - three security tiers
//
// Public (no auth) → Protected (session token) → Elevated (admin cookie)
//
// Authentication is an extractor argument on each handler rather than a layer,
// so method routing answers 405 before any 401 and body parsing runs last.
pub mod elevated;
pub mod protected;
pub mod public;
pub mod validate;
