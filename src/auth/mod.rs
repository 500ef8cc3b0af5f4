pub mod provider;
pub mod session;

pub use provider::{AuthError, IdentityProvider, IdentityToolkitProvider};
pub use session::{CurrentSession, Session, SessionRegistry};
