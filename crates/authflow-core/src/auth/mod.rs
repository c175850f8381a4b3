//! Session lifecycle: in-memory state, durable persistence, and the
//! login / refresh / logout operations that move between states.
//!
//! - `Session`: the token pair, their expiries, and the user record
//! - `SessionStore`: owns the `Session` and mirrors every field to storage
//! - `SessionController`: the only way to mutate a session
//! - `SessionHandle`: a cloneable, lock-guarded controller for sharing across tasks

pub mod controller;
pub mod error;
pub mod handle;
pub mod session;
pub mod store;

pub use controller::{AuthOutcome, SessionController};
pub use error::SessionError;
pub use handle::SessionHandle;
pub use session::Session;
pub use store::{Field, SessionStore};
