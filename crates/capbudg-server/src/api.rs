//! HTTP API
//!
//! | Route                | Query                     |
//! |----------------------|---------------------------|
//! | `GET /`              |                           |
//! | `GET /list_tables`   |                           |
//! | `GET /get_table_details` | `table_name`          |
//! | `GET /row_sum`       | `table_name`, `row_name`  |
//!
//! The workbook is read again for every request; nothing is cached.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use capbudg_data::TableSet;

use crate::config::Settings;
use crate::error::ApiError;
use crate::load_tables;

/// Banner returned by `GET /`
pub const BANNER: &str = "Capital Budgeting Excel Processor API";

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `GET /list_tables`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

/// Body of `GET /get_table_details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDetailsResponse {
    pub table_name: String,
    pub row_names: Vec<String>,
}

/// Body of `GET /row_sum`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSumResponse {
    pub table_name: String,
    pub row_name: String,
    pub sum: f64,
}

impl TablesResponse {
    pub fn from_tables(tables: &TableSet) -> Self {
        Self {
            tables: tables.table_names().into_iter().map(String::from).collect(),
        }
    }
}

impl TableDetailsResponse {
    pub fn from_tables(tables: &TableSet, table_name: &str) -> capbudg_data::Result<Self> {
        let row_names = tables.row_names(table_name)?;
        Ok(Self {
            table_name: table_name.to_string(),
            row_names: row_names.into_iter().map(String::from).collect(),
        })
    }
}

impl RowSumResponse {
    pub fn from_tables(
        tables: &TableSet,
        table_name: &str,
        row_name: &str,
    ) -> capbudg_data::Result<Self> {
        let sum = tables.row_sum(table_name, row_name)?;
        Ok(Self {
            table_name: table_name.to_string(),
            row_name: row_name.to_string(),
            sum,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TableQuery {
    table_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RowQuery {
    table_name: Option<String>,
    row_name: Option<String>,
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Load and extract the workbook off the async runtime
    async fn tables(&self) -> Result<TableSet, ApiError> {
        let settings = Arc::clone(&self.settings);
        tokio::task::spawn_blocking(move || load_tables(&settings))
            .await
            .map_err(|e| ApiError::Internal(format!("workbook load task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

/// Build the API router
pub fn router(settings: Settings) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/list_tables", get(list_tables))
        .route("/get_table_details", get(get_table_details))
        .route("/row_sum", get(row_sum))
        .with_state(AppState::new(settings))
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(settings: Settings) -> Result<()> {
    let listener = TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.bind))?;

    info!(
        addr = %listener.local_addr()?,
        workbook = %settings.workbook.path.display(),
        sheet = %settings.workbook.sheet,
        "capbudg API listening"
    );

    axum::serve(listener, router(settings))
        .await
        .context("HTTP server failed")
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: BANNER.to_string(),
    })
}

async fn list_tables(State(state): State<AppState>) -> Result<Json<TablesResponse>, ApiError> {
    info!("list_tables");
    let tables = state.tables().await?;
    Ok(Json(TablesResponse::from_tables(&tables)))
}

async fn get_table_details(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableDetailsResponse>, ApiError> {
    let table_name = query
        .table_name
        .ok_or(ApiError::MissingParam("table_name"))?;
    info!(table = %table_name, "get_table_details");

    let tables = state.tables().await?;
    Ok(Json(TableDetailsResponse::from_tables(&tables, &table_name)?))
}

async fn row_sum(
    State(state): State<AppState>,
    Query(query): Query<RowQuery>,
) -> Result<Json<RowSumResponse>, ApiError> {
    let table_name = query
        .table_name
        .ok_or(ApiError::MissingParam("table_name"))?;
    let row_name = query.row_name.ok_or(ApiError::MissingParam("row_name"))?;
    info!(table = %table_name, row = %row_name, "row_sum");

    let tables = state.tables().await?;
    Ok(Json(RowSumResponse::from_tables(
        &tables,
        &table_name,
        &row_name,
    )?))
}
