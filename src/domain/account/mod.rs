//! Account module - registered users and the chats they have ended.

mod email;
mod user;

pub use email::Email;
pub use user::{AccountError, ChatEntry, UserAccount};
