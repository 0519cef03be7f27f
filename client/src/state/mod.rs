//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`credentials`, `auth`, `notify`) so pages can
//! depend on small focused handles. Every handle is `Clone` and shares its
//! backing state; the `App` creates each handle once and injects clones.

pub mod auth;
pub mod credentials;
pub mod notify;
