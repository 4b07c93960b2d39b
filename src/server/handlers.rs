//! HTTP handler functions for the complaint API.

use std::time::Instant;

use actix_web::rt::time::timeout;
use actix_web::web::{self, Bytes};
use actix_web::HttpResponse;
use tracing::warn;

use super::events::event_stream;
use super::requests::{
    parse_body, ComplaintEnvelope, ComplaintList, CreateComplaintRequest, Health, ListQuery,
    RouteRequest, RouteResponse, StatusRequest,
};
use super::AppState;
use crate::error::{Error, Result};
use crate::model::ComplaintId;

/// Run store-backed work on the blocking pool, bounded by the store timeout.
///
/// Work still queued when the deadline passes never touches the store. Work
/// already running cannot be cancelled, so its expiry is reported as
/// [`Error::Timeout`] rather than as a failure.
async fn blocking<T, F>(state: &web::Data<AppState>, work: F) -> Result<T>
where
    F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let limit = state.store_timeout;
    let deadline = Instant::now() + limit;
    let state = state.clone();
    let task = web::block(move || {
        if Instant::now() >= deadline {
            return Err(Error::store("request expired before reaching the store"));
        }
        work(state.get_ref())
    });
    match timeout(limit, task).await {
        Err(_) => {
            warn!(?limit, "store request timed out");
            Err(Error::Timeout(format!(
                "no answer within {limit:?}, the request may still complete"
            )))
        }
        Ok(Err(err)) => Err(Error::store(err.to_string())),
        Ok(Ok(result)) => result,
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/complaints`
///
/// Creates a complaint and broadcasts `new_complaint`.
pub async fn create_complaint(state: web::Data<AppState>, body: Bytes) -> Result<HttpResponse> {
    let input = parse_body::<CreateComplaintRequest>(&body)?.into_new_complaint()?;
    let complaint = blocking(&state, move |state| state.lifecycle.create(input)).await?;
    Ok(HttpResponse::Created().json(ComplaintEnvelope::from(complaint)))
}

/// `GET /api/complaints?status=&priority=`
///
/// Lists complaints, most severe first, oldest first within a priority.
pub async fn list_complaints(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let complaints = blocking(&state, move |state| state.lifecycle.list(&filter)).await?;
    Ok(HttpResponse::Ok().json(ComplaintList { complaints }))
}

/// `GET /api/complaint/{id}`
pub async fn get_complaint(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id: ComplaintId = path.parse()?;
    let complaint = blocking(&state, move |state| state.lifecycle.get(&id)).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

/// `POST /api/complaint/{id}/status`
///
/// Applies a status and/or assignment change and broadcasts `status_update`.
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Bytes,
) -> Result<HttpResponse> {
    let id: ComplaintId = path.parse()?;
    let update = parse_body::<StatusRequest>(&body)?.into_update()?;
    let complaint = blocking(&state, move |state| state.lifecycle.update_status(&id, update)).await?;
    Ok(HttpResponse::Ok().json(ComplaintEnvelope::from(complaint)))
}

/// `POST /api/compute_route`
///
/// Body: `{"start": {"lat", "lng"}, "complaint_ids": [...]}`. Returns the
/// complaints in greedy nearest-neighbor order from `start`.
pub async fn compute_route(state: web::Data<AppState>, body: Bytes) -> Result<HttpResponse> {
    let (start, ids) = parse_body::<RouteRequest>(&body)?.into_parts()?;
    let planned = blocking(&state, move |state| state.planner.plan(start, &ids)).await?;
    Ok(HttpResponse::Ok().json(RouteResponse::from(planned)))
}

/// `GET /api/events`
///
/// Server-sent events: `connected`, then `new_complaint` and `status_update`
/// as they happen.
pub async fn events(state: web::Data<AppState>) -> HttpResponse {
    let receiver = state.bus.subscribe();
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(event_stream(receiver))
}
