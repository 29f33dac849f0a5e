pub mod event;
pub mod handler;

pub use event::{BotEvent, Reply};
pub use handler::{EventHandler, GiftBotHandler};
