//! JSON routes over [`IdService`].
//!
//! | route | purpose |
//! |---|---|
//! | `GET /healthz` | liveness, `503` once shutdown has begun |
//! | `POST /v1/identifiers` | issue from `{"category": ..}` or `{"food_safety": ..}` |
//! | `GET /v1/identifiers?prefix=..` | raw issued strings starting with `prefix` |
//! | `GET /v1/identifiers/{id}` | components of an issued identifier |

use crate::server::{
    error::{Error, Result},
    service::handler::IdService,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use qms_id::{Allocation, Identifier, PrefixTable};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

pub fn router(service: IdService) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/identifiers", get(list).post(issue))
        .route("/v1/identifiers/{id}", get(lookup))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Body of `POST /v1/identifiers`. Exactly one field must be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueRequest {
    pub category: Option<String>,
    pub food_safety: Option<bool>,
}

impl IssueRequest {
    fn category(&self) -> Result<&str> {
        match (&self.category, self.food_safety) {
            (Some(category), None) => Ok(category),
            (None, Some(true)) => Ok(PrefixTable::FOOD_SAFETY),
            (None, Some(false)) => Ok(PrefixTable::NON_FOOD_SAFETY),
            (Some(_), Some(_)) => Err(Error::InvalidRequest {
                reason: "set either `category` or `food_safety`, not both".to_string(),
            }),
            (None, None) => Err(Error::InvalidRequest {
                reason: "missing `category` or `food_safety`".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Serialize)]
pub struct IdentifierList {
    pub identifiers: Vec<String>,
}

/// The components of an identifier as returned to clients.
#[derive(Debug, Serialize)]
pub struct IdentifierView {
    pub id: Identifier,
    pub prefix: String,
    pub year: u16,
    pub month: u8,
    pub sequence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

impl From<Identifier> for IdentifierView {
    fn from(id: Identifier) -> Self {
        Self {
            prefix: id.prefix().to_string(),
            year: id.period().year(),
            month: id.period().month(),
            sequence: id.sequence(),
            fallback: None,
            id,
        }
    }
}

impl From<Allocation> for IdentifierView {
    fn from(allocation: Allocation) -> Self {
        let fallback = allocation.used_fallback();
        Self {
            fallback: Some(fallback),
            ..Self::from(allocation.id)
        }
    }
}

async fn healthz(State(service): State<IdService>) -> (StatusCode, &'static str) {
    if service.is_shutting_down() {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting down")
    } else {
        (StatusCode::OK, "ok")
    }
}

async fn issue(
    State(service): State<IdService>,
    payload: core::result::Result<Json<IssueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IdentifierView>)> {
    let Json(request) = payload.map_err(|rejection| Error::InvalidRequest {
        reason: rejection.body_text(),
    })?;

    let allocation = service.issue(request.category()?).await?;
    Ok((StatusCode::CREATED, Json(allocation.into())))
}

async fn list(
    State(service): State<IdService>,
    Query(params): Query<ListParams>,
) -> Result<Json<IdentifierList>> {
    let identifiers = service.list(&params.prefix)?;
    Ok(Json(IdentifierList { identifiers }))
}

async fn lookup(
    State(service): State<IdService>,
    Path(id): Path<String>,
) -> Result<Json<IdentifierView>> {
    let id = service.lookup(&id)?;
    Ok(Json(id.into()))
}
