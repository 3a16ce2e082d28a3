//! Session Domain
//!
//! Everything the dashboard keeps per signed-in user: the upstream auth
//! token obtained at login, display preferences, and the wizard the user
//! is working on. Sessions live in a [`SessionStore`] and are handed out
//! as [`SessionHandle`]s; each handle serialises access to its session so
//! only one mutating action runs at a time.
//!
//! ```rust,ignore
//! let auth = AuthService::new(port, store.clone());
//! let handle = auth.login(Credentials::new("admin", "secret")).await?;
//! handle.lock().await.preferences.toggle_theme();
//! ```

pub mod credentials;
pub mod preferences;
pub mod session;
pub mod service;
pub mod ports;
pub mod error;

pub use credentials::{AuthToken, Credentials, PasswordResetRequest};
pub use preferences::{Preferences, Theme};
pub use session::{CurrentUser, SessionHandle, SessionStore, UserSession};
pub use service::AuthService;
pub use ports::AuthPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockAuthPort;
pub use error::SessionError;
