// Authentication module
// Manages the session token pair, its storage, and the refresh flow

mod credentials;
mod logout;
mod manager;
mod refresh;
mod types;

pub use credentials::{FileSessionStore, MemorySessionStore, SessionStore};
pub use logout::{LoginRedirect, LogoutHandler};
pub use manager::{AuthManager, RefreshOutcome};
pub use refresh::{endpoint, TOKEN_OBTAIN_PATH, TOKEN_REFRESH_PATH};
pub use types::{token_preview, RefreshMode, SessionTokens, TokenKind};
