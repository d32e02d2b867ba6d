use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booklog_app::{AppConfig, AppResult, Booklog};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booklog=debug,booklog_app=debug,booklog_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "Booklog failed to start");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // --- Configuration ---
    let config = AppConfig::from_env()?;
    tracing::info!(
        database_url = %config.database_url,
        google_books_url = %config.google_books_url,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = booklog_db::create_pool(&config.database_url).await?;
    booklog_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    booklog_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Library ---
    let booklog = Booklog::from_config(pool, &config)?;
    let selected = booklog.ensure_default_board().await?;

    for board in booklog.boards().await? {
        let columns = booklog.statuses(board.id).await?;
        let mut books = 0;
        for status in &columns {
            books += booklog.books(status.id).await?.len();
        }
        tracing::info!(
            board = %board.name,
            statuses = columns.len(),
            books,
            selected = board.id == selected.id,
            "Board"
        );
    }

    booklog.pool().close().await;
    Ok(())
}
