//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::{EventRecord, TimelineEntry};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct CampaignEventsResponse {
    pub campaign_id: u64,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub campaign_id: u64,
    pub count: usize,
    pub entries: Vec<TimelineEntry>,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<AllEventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /campaigns/:id/events`
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<CampaignEventsResponse>> {
    let campaign_id = parse_campaign_id(&raw_id)?;
    let events = db::get_events_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(CampaignEventsResponse {
        campaign_id,
        count: events.len(),
        events,
    }))
}

/// `GET /campaigns/:id/timeline`
///
/// Donations, refunds and withdrawals of one campaign, oldest first.
pub async fn get_campaign_timeline(
    State(state): State<Arc<ApiState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<TimelineResponse>> {
    let campaign_id = parse_campaign_id(&raw_id)?;
    let entries = db::get_timeline_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(TimelineResponse {
        campaign_id,
        count: entries.len(),
        entries,
    }))
}

fn parse_campaign_id(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| IndexerError::InvalidCampaignId(raw.to_string()))
}
