// handlers/protected/mod.rs - session token required
//
// Every handler takes `SessionUser` and scopes its single store call to that id.
// `chat` and `voice` additionally require an entitlement.
pub mod awy;
pub mod billing;
pub mod chat;
pub mod feedback;
pub mod journal;
pub mod lectures;
pub mod oscola;
pub mod study;
pub mod tasks;
pub mod transcripts;
pub mod voice;
pub mod wellbeing;
pub mod whoami;
pub mod writing;
