mod config;

use std::sync::Arc;

use pinboard_api::Pinboard;
use pinboard_crypto::TokenSigner;
use pinboard_db::Database;
use tracing::info;

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinboard=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            eprintln!("       Set it in your .env file and restart.");
            std::process::exit(1);
        }
    };

    // Create tables, then reopen for the long-lived handle.
    pinboard_db::migrations::initialize(&config.db_path)?;
    let db = Arc::new(Database::open(&config.db_path)?);
    let signer = Arc::new(TokenSigner::new(&config.secret_key));
    let app = Pinboard::new(db, signer);

    // Listing pins resolves every board reference, so orphans left behind by
    // earlier board deletions are moved to the default board here.
    let boards = app.boards.list()?;
    let pins = app.pins.list()?;

    info!(
        boards = boards.len(),
        pins = pins.len(),
        "Pinboard store ready at {}",
        config.db_path.display()
    );
    Ok(())
}
