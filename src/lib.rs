pub mod bot;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;
pub mod session;

pub use error::{AppError, ColorParseError, ConfigError, ExtractionError};

pub use bot::{BotEvent, EventHandler, GiftBotHandler, Reply};
pub use common::{Color, Item, UserId};
pub use config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use pipeline::{ColorExtractionService, RankingMode, RankingService};
pub use session::SessionStore;
