use bytes::Bytes;
use uuid::Uuid;

use crate::common::UserId;

/// Inbound message from whatever transport feeds the bot.
#[derive(Debug, Clone)]
pub enum BotEvent {
    Start {
        user: UserId,
    },
    Photo {
        user: UserId,
        caption: Option<String>,
        image: Bytes,
    },
    Order {
        user: UserId,
    },
}

impl BotEvent {
    pub fn user(&self) -> UserId {
        match self {
            Self::Start { user } | Self::Photo { user, .. } | Self::Order { user } => *user,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Photo { .. } => "photo",
            Self::Order { .. } => "order",
        }
    }
}

/// Text to send back to a user, tagged with the event it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub event_id: Uuid,
    pub user: UserId,
    pub text: String,
}

impl Reply {
    pub fn new(event_id: Uuid, user: UserId, text: impl Into<String>) -> Self {
        Self {
            event_id,
            user,
            text: text.into(),
        }
    }
}
