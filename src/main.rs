use bytes::Bytes;
use giftbot_rust::{AppError, BotEvent, Configuration, CoordinatorBuilder, UserId};
use std::path::Path;
use tracing::Level;

// Single local session standing in for a chat user.
const LOCAL_USER: UserId = UserId(0);

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let configuration = Configuration::load()?;
    init_logging(configuration.log_level()?);

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: giftbot-rust <image>...");
        return Ok(());
    }

    let (coordinator, mut replies) = CoordinatorBuilder::new(configuration).build();
    let printer = tokio::spawn(async move {
        while let Some(reply) = replies.recv().await {
            println!("{}\n", reply.text);
        }
    });

    coordinator.submit(BotEvent::Start { user: LOCAL_USER }).await?;
    for path in &paths {
        match read_photo(path).await {
            Ok(event) => {
                coordinator.submit(event).await?;
            }
            Err(e) => tracing::warn!("Skipping: {}", e),
        }
    }
    coordinator.submit(BotEvent::Order { user: LOCAL_USER }).await?;
    coordinator.finish().await;

    if let Err(e) = printer.await {
        tracing::error!("Reply printer failed: {}", e);
    }
    Ok(())
}

async fn read_photo(path: &str) -> Result<BotEvent, AppError> {
    let image = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::ReadError(path.to_string(), e))?;
    let caption = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    Ok(BotEvent::Photo {
        user: LOCAL_USER,
        caption,
        image: Bytes::from(image),
    })
}
