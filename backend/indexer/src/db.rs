//! Database layer: migrations, event queries and the polling cursor.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventKind, EventRecord, LedgerEvent, TimelineEntry};

const SELECT_EVENTS: &str = r#"
    SELECT id, event_id, event_type, campaign_id, request_id, actor, amount, ledger, timestamp,
           contract_id, tx_hash, created_at
    FROM   events
"#;

/// Open the SQLite pool (creating the file if needed) and apply pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let url = if url.contains('?') || url.contains(":memory:") {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────

/// Where the poller left off: the last ledger scanned and an optional
/// pagination cursor inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub last_ledger: i64,
    pub page: Option<String>,
}

pub async fn load_cursor(pool: &SqlitePool) -> Result<Cursor> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row
        .map(|(last_ledger, page)| Cursor { last_ledger, page })
        .unwrap_or_default())
}

pub async fn save_cursor(pool: &SqlitePool, cursor: &Cursor) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(cursor.last_ledger)
        .bind(cursor.page.as_deref())
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Writes
// ─────────────────────────────────────────────────────────

/// Store a batch of decoded events in one transaction and return how many
/// rows were new. An event whose RPC id is already stored is skipped.
pub async fn insert_events(pool: &SqlitePool, events: &[LedgerEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for ev in events {
        inserted += sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, campaign_id, request_id, actor, amount, ledger,
                 timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.campaign_id)
        .bind(&ev.request_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected() as usize;
    }

    tx.commit().await?;
    Ok(inserted)
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?)
}

/// Every event of one campaign, oldest first.
pub async fn get_events_for_campaign(
    pool: &SqlitePool,
    campaign_id: u64,
) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} WHERE campaign_id = ?1 ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(campaign_id.to_string())
        .fetch_all(pool)
        .await?)
}

/// Donations, refunds and releases of one campaign, oldest first.
pub async fn get_timeline_for_campaign(
    pool: &SqlitePool,
    campaign_id: u64,
) -> Result<Vec<TimelineEntry>> {
    let sql = format!(
        "{SELECT_EVENTS} WHERE campaign_id = ?1 AND event_type IN (?2, ?3, ?4) \
         ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(campaign_id.to_string())
        .bind(EventKind::DonationReceived.as_str())
        .bind(EventKind::DonationRefunded.as_str())
        .bind(EventKind::FundsReleased.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().filter_map(TimelineEntry::from_record).collect())
}
