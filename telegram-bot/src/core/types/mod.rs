//! Core types: user, chat, message, handler response, and Handler trait.

mod chat;
mod handler;
mod message;
mod response;
mod user;

pub use chat::Chat;
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::{MediaFlags, Message, MessageDirection};
pub use response::HandlerResponse;
pub use user::User;
