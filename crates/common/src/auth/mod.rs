//! OAuth token lifecycle
//!
//! Token acquisition is split in two. A [`TokenGrantClient`] knows how to talk
//! to a token endpoint (password and refresh grants). The [`TokenManager`]
//! owns the cached [`TokenSet`] and decides which grant to run:
//!
//! 1. A cached token that is still valid past the expiry buffer is returned
//!    without any network call.
//! 2. Otherwise a refresh token, if held, is exchanged first.
//! 3. If the refresh grant fails, or no refresh token exists, the password
//!    grant runs from scratch.

pub mod types;

#[cfg(feature = "runtime")]
pub mod token_manager;
#[cfg(feature = "runtime")]
pub mod traits;

#[cfg(feature = "runtime")]
pub use token_manager::TokenManager;
#[cfg(feature = "runtime")]
pub use traits::TokenGrantClient;
pub use types::{AuthError, TokenResponse, TokenSet};
