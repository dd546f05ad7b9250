//! Domain models owned by the storefront layer.

pub mod session;

pub use session::{ProfilePatch, Registration, Session};
