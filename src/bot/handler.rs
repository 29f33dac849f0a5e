use async_trait::async_trait;
use bytes::Bytes;
use tower::ServiceExt;
use uuid::Uuid;

use crate::bot::event::{BotEvent, Reply};
use crate::common::{Item, UserId};
use crate::error::{AppError, ExtractionError};
use crate::pipeline::services::{ColorExtractionService, RankRequest, RankingMode, RankingService};
use crate::session::SessionStore;

pub const GREETING: &str = "Hello 👋 Send me photos of your gifts (one per message). \
When you’re ready, type /order to get a color-sorted list.";
pub const EMPTY_SESSION: &str = "No gifts yet — send me some photos first!";
pub const UNREADABLE_IMAGE: &str =
    "Sorry, I couldn't read that image. Please send a JPEG or PNG photo.";
pub const PROCESSING_FAILED: &str =
    "Sorry, something went wrong while processing that photo. Please try again.";

/// Turns one inbound event into one reply.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&mut self, event_id: Uuid, event: BotEvent) -> Result<Reply, AppError>;
    fn name(&self) -> &'static str;
}

/// Collects gift photos per user and answers `/order` with a hue ranking.
pub struct GiftBotHandler {
    sessions: SessionStore,
    extractor: ColorExtractionService,
    ranker: RankingService,
    mode: RankingMode,
}

impl GiftBotHandler {
    pub fn new(sessions: SessionStore, mode: RankingMode) -> Self {
        Self {
            sessions,
            extractor: ColorExtractionService::new(),
            ranker: RankingService::new(),
            mode,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn on_photo(
        &mut self,
        user: UserId,
        caption: Option<String>,
        image: Bytes,
    ) -> String {
        let color = match self.extractor.oneshot(image).await {
            Ok(color) => color,
            Err(e) => return extraction_failure_reply(user, &e).to_string(),
        };

        let item = self.sessions.record(user, caption.as_deref(), color);
        format!(
            "Saved: {} — dominant color {}",
            item.label(),
            item.color().to_hex()
        )
    }

    async fn on_order(&self, user: UserId) -> String {
        let items = self.sessions.items(user);
        if items.is_empty() {
            return EMPTY_SESSION.to_string();
        }

        tracing::debug!("Ranking {} items for {} by {}", items.len(), user, self.mode);
        let request = RankRequest::new(items.to_vec(), self.mode.clone());
        let ranked = self
            .ranker
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        render_order(&ranked)
    }
}

/// Every failed photo still gets an answer; nothing is recorded for it.
fn extraction_failure_reply(user: UserId, error: &ExtractionError) -> &'static str {
    match error {
        ExtractionError::Decode(e) => {
            tracing::warn!("Could not decode photo from {}: {}", user, e);
            UNREADABLE_IMAGE
        }
        ExtractionError::Join(e) => {
            tracing::error!("Color extraction for {} failed: {}", user, e);
            PROCESSING_FAILED
        }
    }
}

/// Numbered listing, one `"{n}. {label} (#RRGGBB)"` line per item.
pub fn render_order(items: &[Item]) -> String {
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.render()))
        .collect();
    format!("Suggested order:\n{}", lines.join("\n"))
}

#[async_trait]
impl EventHandler for GiftBotHandler {
    async fn handle(&mut self, event_id: Uuid, event: BotEvent) -> Result<Reply, AppError> {
        let user = event.user();
        tracing::debug!("Handling {} event {} for {}", event.kind(), event_id, user);

        let text = match event {
            BotEvent::Start { user } => {
                self.sessions.start(user);
                GREETING.to_string()
            }
            BotEvent::Photo {
                user,
                caption,
                image,
            } => self.on_photo(user, caption, image).await,
            BotEvent::Order { user } => self.on_order(user).await,
        };

        Ok(Reply::new(event_id, user, text))
    }

    fn name(&self) -> &'static str {
        "gift_bot"
    }
}
