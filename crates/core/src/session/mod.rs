//! Current-user session and its durable mirror.

mod manager;
pub mod mirror;

pub use manager::SessionManager;
pub use mirror::{FileMirror, MemoryMirror, SessionMirror};
