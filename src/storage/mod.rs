//! Storage traits for the external database collaborator.
//!
//! The hand-off flow never talks to a database directly. Everything it needs
//! is expressed through these traits: account lookup, session records, and
//! two-factor verification existence checks. Production implementations wrap
//! a real database; the `test` submodules provide in-memory stores.
//!
//! All calls are issued sequentially within a single request. Correctness
//! under concurrent logins relies on the backing store's own transactional
//! guarantees; no locking happens at this layer.

pub mod account;
pub mod session;
pub mod verification;

pub use account::{Account, AccountStore};
pub use session::{Session, SessionStore};
pub use verification::VerificationStore;
