//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Simulated authentication against the demo account table
//! - `checkout` - Stock verification and decrement for the cart contents

pub mod auth;
pub mod checkout;
