//! StayBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::Update};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use StayBuddy::{
    config::Settings,
    database::{
        connection::{create_pool, run_migrations},
        DatabaseService,
    },
    handlers::{
        callbacks::handle_callback_query,
        commands::{handle_command, Command},
        messages::{
            handle_chat_join_request, handle_left_chat_member, handle_new_chat_members,
            handle_reply,
        },
    },
    services::{BotIdentity, ServiceFactory},
    state::{MenuCache, PromptStorage},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging, keeping the file writer guard alive until exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", StayBuddy::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = StayBuddy::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(30),
        idle_timeout: Some(std::time::Duration::from_secs(600)),
        max_lifetime: Some(std::time::Duration::from_secs(1800)),
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize prompt storage
    info!("Connecting to Redis...");
    let prompt_storage = PromptStorage::new(settings.redis.clone()).await?;
    let menu_cache = MenuCache::new();

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    let me = bot.get_me().await?;
    let identity = BotIdentity {
        username: me.username().to_string(),
    };
    info!(username = %identity.username, "Bot identity resolved");

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), &database_service);

    // Start the eviction sweeper
    let shutdown = CancellationToken::new();
    let sweeper = services.build_sweeper(&settings.sweeper);
    let sweeper_handle = sweeper.spawn(shutdown.clone());

    info!("Setting up bot handlers...");

    // Wrap shared components in Arc for dependency injection
    let services_arc = Arc::new(services);
    let menu_cache_arc = Arc::new(menu_cache);
    let prompt_storage_arc = Arc::new(prompt_storage);
    let identity_arc = Arc::new(identity);

    // Create the handler
    let handler = create_handler();

    // Create dispatcher with dependencies registered
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![
            services_arc,
            menu_cache_arc,
            prompt_storage_arc,
            identity_arc
        ])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("StayBuddy bot is ready!");

    // Start the bot
    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!("Webhook URL configured: {}", webhook_url);
        info!("Note: Webhook setup not implemented in this version, falling back to polling");
    }

    info!("Starting bot with polling mode...");

    dispatcher.dispatch().await;

    // Dispatch returned, stop the sweeper as well
    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        error!(error = %e, "Eviction sweeper task failed to shut down cleanly");
    }

    info!("StayBuddy bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle members joining directly
                    dptree::filter(|msg: Message| msg.new_chat_members().is_some())
                        .endpoint(handle_new_members),
                )
                .branch(
                    // Handle members leaving
                    dptree::filter(|msg: Message| msg.left_chat_member().is_some())
                        .endpoint(handle_left_member),
                )
                .branch(
                    // Handle replies to force-reply prompts
                    dptree::filter(|msg: Message| msg.reply_to_message().is_some())
                        .endpoint(handle_replies),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
        .branch(
            // Handle pending join requests
            Update::filter_chat_join_request().endpoint(handle_join_requests),
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    menu_cache: Arc<MenuCache>,
    identity: Arc<BotIdentity>,
) -> HandlerResult {
    let services = (*services).clone();
    let menu_cache = (*menu_cache).clone();
    let identity = (*identity).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services, menu_cache, identity).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle members joining directly
async fn handle_new_members(msg: Message, services: Arc<ServiceFactory>) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_new_chat_members(msg, services).await {
        error!(error = %e, "Error handling new chat members");
        return Err(e.into());
    }

    Ok(())
}

/// Handle members leaving
async fn handle_left_member(msg: Message, services: Arc<ServiceFactory>) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_left_chat_member(msg, services).await {
        error!(error = %e, "Error handling left chat member");
        return Err(e.into());
    }

    Ok(())
}

/// Handle replies to force-reply prompts
async fn handle_replies(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    prompts: Arc<PromptStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let prompts = (*prompts).clone();

    if let Err(e) = handle_reply(bot, msg, services, prompts).await {
        error!(error = %e, "Error handling prompt reply");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    menu_cache: Arc<MenuCache>,
    prompts: Arc<PromptStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let menu_cache = (*menu_cache).clone();
    let prompts = (*prompts).clone();

    if let Err(e) = handle_callback_query(bot, query, services, menu_cache, prompts).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}

/// Handle pending join requests
async fn handle_join_requests(
    request: teloxide::types::ChatJoinRequest,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_chat_join_request(request, services).await {
        error!(error = %e, "Error handling chat join request");
        return Err(e.into());
    }

    Ok(())
}
