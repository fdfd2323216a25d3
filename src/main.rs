use std::sync::Arc;

use futures::StreamExt;

use smartstart_bot::bot::Dispatcher;
use smartstart_bot::config::BotConfig;
use smartstart_bot::event::Payload;
use smartstart_bot::forms::SessionStore;
use smartstart_bot::forms::state::{IdleTimeout, spawn_sweep_task};
use smartstart_bot::notify::TelegramNotifier;
use smartstart_bot::telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env()?;

    eprintln!("🤖 Smart Start USA bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Operator chat: {}", config.operator_chat_id);
    eprintln!(
        "   Session TTL: {}",
        config
            .session_ttl
            .map(|ttl| format!("{}s", ttl.as_secs()))
            .unwrap_or_else(|| "none".to_string())
    );

    let client = Arc::new(TelegramClient::new(config.bot_token.clone()));
    client.health_check().await?;

    let store = match config.session_ttl {
        Some(ttl) => Arc::new(SessionStore::with_policy(Box::new(IdleTimeout(ttl)))),
        None => Arc::new(SessionStore::new()),
    };
    if config.session_ttl.is_some() {
        let _sweep_handle = spawn_sweep_task(
            Arc::clone(&store),
            std::time::Duration::from_secs(60),
        );
    }

    let notifier = Arc::new(TelegramNotifier::new(
        Arc::clone(&client),
        config.operator_chat_id,
    ));
    let dispatcher = Dispatcher::new(store, notifier);

    let mut updates = client.start();
    tracing::info!("Bot running");

    while let Some(event) = updates.next().await {
        // Acknowledge button presses so they stop spinning, even when the
        // tag turns out to be unroutable.
        if let Payload::Callback { id, .. } = &event.payload
            && let Err(e) = client.answer_callback(id).await
        {
            tracing::warn!("answerCallbackQuery failed: {e}");
        }

        let replies = dispatcher.handle(&event).await;
        for reply in replies {
            if let Err(e) = client.send_reply(event.chat_id, &reply).await {
                tracing::warn!(chat_id = event.chat_id, "Failed to send reply: {e}");
            }
        }
    }

    Ok(())
}
