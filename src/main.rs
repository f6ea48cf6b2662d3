use std::sync::Arc;

use serenity::http::Http;

use kolkra::{
    bot,
    config::Config,
    data::{record::RecordRepository, store::RecordStore},
    error::AppError,
    scheduler::Scheduler,
    service::{
        bump_reminder::BumpReminderService,
        moderation::gateway::{DiscordModerationGateway, ModerationGateway},
    },
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db));

    let http = Arc::new(Http::new(&config.discord_bot_token));
    let gateway: Arc<dyn ModerationGateway> =
        Arc::new(DiscordModerationGateway::new(http.clone(), config.guild_id));

    // Lift callbacks stay registered so timed actions stored by earlier runs expire
    let registry = startup::build_registry(&config, store.clone(), http, gateway)?;
    let scheduler = Scheduler::new(store, Arc::new(registry));

    // Recover before the bot can create new tasks
    scheduler.restore_all().await?;

    let bump_reminder = config
        .bump
        .as_ref()
        .map(|bump| BumpReminderService::new(scheduler.clone(), bump.channel_id));
    let state = AppState::new(scheduler.clone(), bump_reminder);

    let client = bot::start::init_bot(&config, state).await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        tracing::info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    let result = bot::start::start_bot(client).await;

    scheduler.shutdown();

    result
}
