//! Background task that polls the Soroban RPC and stores decoded ledger events.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{self, Cursor};
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Poll until `shutdown` is cancelled. The cursor is persisted after every
/// page, so a restart resumes where the previous run stopped.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(contract = %state.config.contract_id, "Indexer starting");

    let mut cursor = match db::load_cursor(&state.pool).await {
        Ok(saved) if saved.last_ledger > 0 => saved,
        Ok(_) => Cursor {
            last_ledger: i64::from(state.config.start_ledger),
            page: None,
        },
        Err(e) => {
            error!("Could not read the saved cursor: {e}");
            return;
        }
    };
    info!(ledger = cursor.last_ledger, "Resuming");

    loop {
        match poll_once(&state.pool, &state.client, &state.config, &cursor).await {
            Ok(next) => cursor = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(ledger = cursor.last_ledger, "Indexer stopped");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Fetch, decode and store one page, then persist and return the next cursor.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    cursor: &Cursor,
) -> Result<Cursor> {
    let start_ledger = u32::try_from(cursor.last_ledger).unwrap_or(config.start_ledger);
    let page = rpc::fetch_events(
        client,
        &config.rpc_url,
        &config.contract_id,
        start_ledger,
        cursor.page.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(pool, &decoded).await?;
        info!(
            raw = page.events.len(),
            stored = inserted,
            "Indexed events"
        );
    }

    // With a page cursor the next call continues inside the same range;
    // otherwise jump to the newest ledger the RPC reported.
    let next = Cursor {
        last_ledger: page
            .latest_ledger
            .map(|l| (l as i64).max(cursor.last_ledger))
            .unwrap_or(cursor.last_ledger),
        page: page.cursor,
    };
    db::save_cursor(pool, &next).await?;
    Ok(next)
}
