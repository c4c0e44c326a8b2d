//! Credential and session models: token secrets, the credential pair, and the explicit
//! session handle that replaces ambient authentication state.

pub mod credential;
pub mod secret;
pub mod session;

pub use credential::*;
pub use secret::*;
pub use session::*;
