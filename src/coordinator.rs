use crate::{
    bot::{BotEvent, EventHandler, GiftBotHandler, Reply},
    config::Configuration,
    error::AppError,
    session::SessionStore,
};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

type Envelope = (Uuid, BotEvent);

/// Runs an [`EventHandler`] on its own task, one event at a time.
///
/// Events go in through [`Coordinator::submit`], replies come out of the
/// receiver returned by [`CoordinatorBuilder::build`].
pub struct Coordinator {
    event_tx: Option<Sender<Envelope>>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl Coordinator {
    fn new(
        configuration: &Configuration,
        handler: Box<dyn EventHandler>,
    ) -> (Self, Receiver<Reply>) {
        let cancel_token = CancellationToken::new();
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(configuration.event_buffer_size);
        let (reply_tx, reply_rx) = tokio::sync::mpsc::channel(configuration.reply_buffer_size);
        let handler_task =
            Self::start_handler_task(handler, event_rx, reply_tx, cancel_token.clone());

        let coordinator = Self {
            event_tx: Some(event_tx),
            handler_task: Some(handler_task),
            cancel_token,
        };
        (coordinator, reply_rx)
    }

    fn start_handler_task(
        mut handler: Box<dyn EventHandler>,
        mut event_rx: Receiver<Envelope>,
        reply_tx: Sender<Reply>,
        cancel_token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Handler {} started", handler.name());
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    envelope = event_rx.recv() => {
                        let Some((event_id, event)) = envelope else {
                            break;
                        };
                        match handler.handle(event_id, event).await {
                            Ok(reply) => {
                                if reply_tx.send(reply).await.is_err() {
                                    tracing::warn!("Reply receiver dropped, stopping handler");
                                    break;
                                }
                            }
                            Err(e) => tracing::error!("Handler error on event {}: {}", event_id, e),
                        }
                    }
                }
            }
            tracing::info!("Handler {} stopped", handler.name());
        })
    }

    /// Queues an event and returns the id its reply will carry.
    pub async fn submit(&self, event: BotEvent) -> Result<Uuid, AppError> {
        let event_tx = self.event_tx.as_ref().ok_or(AppError::ChannelClosed)?;
        let event_id = Uuid::new_v4();
        event_tx
            .send((event_id, event))
            .await
            .map_err(|_| AppError::ChannelClosed)?;
        Ok(event_id)
    }

    /// Stops accepting events and waits until every queued event is handled.
    pub async fn finish(mut self) {
        self.event_tx.take();
        if let Some(task) = self.handler_task.take() {
            if let Err(e) = task.await {
                tracing::error!("Handler task failed: {}", e);
            }
        }
    }

    /// Stops immediately, dropping queued events.
    pub fn stop(&self) {
        self.cancel_token.cancel();
        if let Some(task) = &self.handler_task {
            task.abort();
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    handler: Option<Box<dyn EventHandler>>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            handler: None,
        }
    }

    // Adjusts the event buffer size, this will override the default configuration.
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.configuration.event_buffer_size = event_buffer_size;
        self
    }

    // Adjusts the reply buffer size, this will override the default configuration.
    pub fn reply_buffer_size(mut self, reply_buffer_size: usize) -> Self {
        self.configuration.reply_buffer_size = reply_buffer_size;
        self
    }

    // Sets the ranking mode used for /order, this will override the default configuration.
    pub fn ranking_mode(mut self, ranking_mode: impl Into<String>) -> Self {
        self.configuration.ranking_mode = ranking_mode.into();
        self
    }

    // Sets the prefix for uncaptioned items, this will override the default configuration.
    pub fn default_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.configuration.default_label_prefix = prefix.into();
        self
    }

    // Replaces the gift bot handler entirely.
    pub fn handler(mut self, handler: Box<dyn EventHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Must be called from within a tokio runtime.
    pub fn build(self) -> (Coordinator, Receiver<Reply>) {
        let configuration = self.configuration;
        let handler = self.handler.unwrap_or_else(|| {
            Box::new(GiftBotHandler::new(
                SessionStore::new(configuration.default_label_prefix.clone()),
                configuration.ranking_mode(),
            ))
        });
        Coordinator::new(&configuration, handler)
    }
}
