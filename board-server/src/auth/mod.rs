pub mod callback;
pub mod dev;
pub mod identity;
pub mod token;

pub use callback::*;
pub use dev::DevIdentityProvider;
pub use identity::*;
pub use token::{AuthError, AuthService};
