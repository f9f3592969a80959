//! Account command handlers.

mod login;
mod signup;

pub use login::{LoginCommand, LoginHandler};
pub use signup::{SignupCommand, SignupHandler};
