//! Generic CRUD handlers, instantiated once per resource kind.
//!
//! Every successful mutation ends with a notice broadcast; the response never
//! depends on how that broadcast went.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, MethodFilter},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use wsrelay_core::error::WsRelayError;
use wsrelay_core::protocol::{Notice, ResourceKind};

use crate::api_error::{ApiError, ApiJson};
use crate::app_state::AppState;

use super::model::{Category, Item, Resource, User, Validate};
use super::notify::announce;
use super::store::Page;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Category>("/categories"))
        .merge(resource_routes::<Item>("/items"))
        .merge(resource_routes::<User>("/users"))
}

fn resource_routes<R: Resource>(base: &str) -> Router<AppState> {
    // Users take PUT, the other kinds PATCH; both apply only the fields sent.
    let update = match R::KIND {
        ResourceKind::User => MethodFilter::PUT,
        ResourceKind::Category | ResourceKind::Item => MethodFilter::PATCH,
    };
    Router::new()
        .route(base, post(create_one::<R>).get(list::<R>))
        .route(
            &format!("{base}/:id"),
            get(get_one::<R>).delete(delete_one::<R>).on(update, update_one::<R>),
        )
}

fn not_found<R: Resource>(id: u64) -> ApiError {
    ApiError(WsRelayError::NotFound(format!("{} {id}", R::KIND)))
}

async fn create_one<R: Resource>(
    State(app): State<AppState>,
    ApiJson(input): ApiJson<R::Create>,
) -> ApiResult<(StatusCode, Json<R>)> {
    input.validate()?;
    let row = R::store(app.stores()).create(input).await?;
    announce::<R>(&app, Notice::Added { kind: R::KIND, label: row.label() }).await;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn list<R: Resource>(
    State(app): State<AppState>,
    Query(q): Query<PageQuery>,
) -> ApiResult<Json<Vec<R>>> {
    let limits = &app.cfg().resources;
    let page = Page {
        skip: q.skip.unwrap_or(0),
        limit: q.limit.unwrap_or(limits.default_page_limit).min(limits.max_page_limit),
    };
    let rows = R::store(app.stores()).list(page).await?;
    Ok(Json(rows))
}

async fn get_one<R: Resource>(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<R>> {
    R::store(app.stores())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<R>(id))
}

async fn update_one<R: Resource>(
    State(app): State<AppState>,
    Path(id): Path<u64>,
    ApiJson(patch): ApiJson<R::Update>,
) -> ApiResult<Json<R>> {
    patch.validate()?;
    let row = R::store(app.stores())
        .update(id, patch)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    announce::<R>(&app, Notice::Updated { kind: R::KIND, label: row.label() }).await;
    Ok(Json(row))
}

async fn delete_one<R: Resource>(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    if !R::store(app.stores()).delete(id).await? {
        return Err(not_found::<R>(id));
    }
    announce::<R>(&app, Notice::Deleted { kind: R::KIND, id }).await;
    Ok(Json(json!({ "message": format!("{} deleted", R::KIND) })))
}
