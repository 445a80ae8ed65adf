//! In-memory stand-in for the Snapchat Ads API.
//!
//! Serves the seeded `Store` under `/v1` in the API's envelope format.
//! Test hooks on every request:
//!
//! - `Authorization: Bearer <token>` is required; anything else is a 401.
//! - `x-mock-status: <code>` answers with that status and an error envelope.
//! - `x-mock-delay-ms: <n>` sleeps before answering.
//!
//! `POST`/`PUT /v1/echo` reports the method, framing headers and body length
//! it received, for checking what a client actually put on the wire.

pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

use store::{Ad, AdAccount, AdSquad, Campaign, FundingSource, Organization, Record, Store};

/// Token accepted by `app()`.
pub const DEFAULT_TOKEN: &str = "mock-token";

pub const STATUS_HEADER: &str = "x-mock-status";
pub const DELAY_HEADER: &str = "x-mock-delay-ms";

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    token: Arc<str>,
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::seeded())),
        token: Arc::from(token),
    };

    let api = Router::new()
        .route("/me", get(me))
        .route("/me/organizations", get(list_organizations))
        .route("/organizations/{id}", get(get_organization))
        .route("/organizations/{id}/adaccounts", get(list_ad_accounts))
        .route("/organizations/{id}/funding-sources", get(list_funding_sources))
        .route("/adaccounts/{id}", get(get_ad_account))
        .route("/adaccounts/{id}/campaigns", get(list_campaigns))
        .route("/adaccounts/{id}/adsquads", get(list_ad_squads_by_account))
        .route("/adaccounts/{id}/ads", get(list_ads_by_account))
        .route("/fundingsources/{id}", get(get_funding_source))
        .route("/campaigns/{id}", get(get_campaign).delete(delete_campaign))
        .route("/campaigns/{id}/adsquads", get(list_ad_squads_by_campaign))
        .route("/adsquads/{id}", get(get_ad_squad).delete(delete_ad_squad))
        .route("/adsquads/{id}/ads", get(list_ads_by_ad_squad))
        .route("/adsquads/{id}/stats", get(ad_squad_stats))
        .route("/ads/{id}", get(get_ad).delete(delete_ad))
        .route("/echo", post(echo).put(echo))
        .route_layer(middleware::from_fn_with_state(state.clone(), mock_controls))
        .with_state(state);

    Router::new().nest("/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn mock_controls(State(state): State<AppState>, request: Request, next: Next) -> Response {
    debug!(method = %request.method(), path = %request.uri().path(), "mock request");

    let headers = request.headers();
    if let Some(ms) = header_value::<u64>(headers, DELAY_HEADER) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    let expected = format!("Bearer {}", state.token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "E3003", "invalid or missing access token");
    }

    if let Some(status) =
        header_value::<u16>(headers, STATUS_HEADER).and_then(|code| StatusCode::from_u16(code).ok())
    {
        return error(status, "E9999", "status forced by x-mock-status");
    }

    next.run(request).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "request_status": "SUCCESS",
        "request_id": request_id(),
        "method": method.as_str(),
        "content_length": text(header::CONTENT_LENGTH),
        "content_type": text(header::CONTENT_TYPE),
        "body_len": body.len(),
    }))
}

fn header_value<T: std::str::FromStr>(headers: &axum::http::HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

fn request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "request_status": "ERROR",
        "request_id": request_id(),
        "debug_message": message,
        "display_message": message,
        "error_code": code,
    });
    (status, Json(body)).into_response()
}

fn not_found(label: &str, id: &str) -> Response {
    error(
        StatusCode::NOT_FOUND,
        "E1008",
        &format!("{label} with id {id} does not exist"),
    )
}

fn sub_envelope<T: Record>(store: &Store, row: &T) -> Value {
    let mut entry = Map::new();
    match store.failure(row.id()) {
        Some(reason) => {
            entry.insert("sub_request_status".into(), "ERROR".into());
            entry.insert("sub_request_error_reason".into(), reason.into());
        }
        None => {
            entry.insert("sub_request_status".into(), "SUCCESS".into());
        }
    }
    entry.insert(
        T::SINGULAR.into(),
        serde_json::to_value(row).unwrap_or(Value::Null),
    );
    Value::Object(entry)
}

fn envelope<T: Record>(store: &Store, rows: &[T]) -> Response {
    let mut body = Map::new();
    body.insert("request_status".into(), "SUCCESS".into());
    body.insert("request_id".into(), request_id().into());
    body.insert(
        T::PLURAL.into(),
        rows.iter().map(|row| sub_envelope(store, row)).collect(),
    );
    Json(Value::Object(body)).into_response()
}

fn single<T: Record>(store: &Store, rows: &[T], id: &str) -> Response {
    match rows.iter().find(|row| row.id() == id) {
        Some(row) => envelope(store, std::slice::from_ref(row)),
        None => not_found(T::SINGULAR, id),
    }
}

fn remove<T: Record>(rows: &mut Vec<T>, id: &str) -> Response {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    if rows.len() == before {
        return not_found(T::SINGULAR, id);
    }
    let mut body = Map::new();
    body.insert("request_status".into(), "SUCCESS".into());
    body.insert("request_id".into(), request_id().into());
    body.insert(T::PLURAL.into(), Value::Array(Vec::new()));
    Json(Value::Object(body)).into_response()
}

fn exists<T: Record>(rows: &[T], id: &str) -> bool {
    rows.iter().any(|row| row.id() == id)
}

async fn me(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    Json(json!({ "request_id": request_id(), "me": store.user }))
}

async fn list_organizations(State(state): State<AppState>) -> Response {
    let store = state.db.read().await;
    let orgs: Vec<Organization> = store
        .organizations
        .iter()
        .filter(|org| org.id == store.user.organization_id)
        .cloned()
        .collect();
    envelope(&store, &orgs)
}

async fn get_organization(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.organizations, &id)
}

async fn list_ad_accounts(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.organizations, &id) {
        return not_found("organization", &id);
    }
    let accounts: Vec<AdAccount> = store
        .ad_accounts
        .iter()
        .filter(|account| account.organization_id == id)
        .cloned()
        .collect();
    envelope(&store, &accounts)
}

async fn list_funding_sources(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.organizations, &id) {
        return not_found("organization", &id);
    }
    let sources: Vec<FundingSource> = store
        .funding_sources
        .iter()
        .filter(|source| source.organization_id == id)
        .cloned()
        .collect();
    envelope(&store, &sources)
}

async fn get_ad_account(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.ad_accounts, &id)
}

async fn list_campaigns(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.ad_accounts, &id) {
        return not_found("adaccount", &id);
    }
    let campaigns: Vec<Campaign> = store
        .campaigns
        .iter()
        .filter(|campaign| campaign.ad_account_id == id)
        .cloned()
        .collect();
    envelope(&store, &campaigns)
}

async fn list_ad_squads_by_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let store = state.db.read().await;
    if !exists(&store.ad_accounts, &id) {
        return not_found("adaccount", &id);
    }
    envelope(&store, &store.ad_squads_for_account(&id))
}

async fn list_ads_by_account(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.ad_accounts, &id) {
        return not_found("adaccount", &id);
    }
    envelope(&store, &store.ads_for_account(&id))
}

async fn get_funding_source(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.funding_sources, &id)
}

async fn get_campaign(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.campaigns, &id)
}

async fn delete_campaign(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.db.write().await;
    remove(&mut store.campaigns, &id)
}

async fn list_ad_squads_by_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let store = state.db.read().await;
    if !exists(&store.campaigns, &id) {
        return not_found("campaign", &id);
    }
    let squads: Vec<AdSquad> = store
        .ad_squads
        .iter()
        .filter(|squad| squad.campaign_id == id)
        .cloned()
        .collect();
    envelope(&store, &squads)
}

async fn get_ad_squad(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.ad_squads, &id)
}

async fn delete_ad_squad(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.db.write().await;
    remove(&mut store.ad_squads, &id)
}

async fn list_ads_by_ad_squad(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.ad_squads, &id) {
        return not_found("adsquad", &id);
    }
    let ads: Vec<Ad> = store
        .ads
        .iter()
        .filter(|ad| ad.ad_squad_id == id)
        .cloned()
        .collect();
    envelope(&store, &ads)
}

async fn ad_squad_stats(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    if !exists(&store.ad_squads, &id) {
        return not_found("adsquad", &id);
    }
    let stats = store.stats.get(&id).cloned().unwrap_or_default();
    let body = json!({
        "request_status": "SUCCESS",
        "request_id": request_id(),
        "total_stats": [{
            "sub_request_status": "SUCCESS",
            "total_stat": {
                "id": id,
                "type": "AD_SQUAD",
                "granularity": "TOTAL",
                "stats": stats,
            }
        }]
    });
    Json(body).into_response()
}

async fn get_ad(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.db.read().await;
    single(&store, &store.ads, &id)
}

async fn delete_ad(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.db.write().await;
    remove(&mut store.ads, &id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_envelope_marks_failed_rows() {
        let store = Store::seeded();
        let failed = sub_envelope(&store, &store.ads[1]);
        assert_eq!(failed["sub_request_status"], "ERROR");
        assert_eq!(failed["sub_request_error_reason"], "creative failed review");
        assert_eq!(failed["ad"]["id"], "ad-2");

        let ok = sub_envelope(&store, &store.ads[0]);
        assert_eq!(ok["sub_request_status"], "SUCCESS");
        assert!(ok.get("sub_request_error_reason").is_none());
    }

    #[test]
    fn remove_reports_unknown_ids() {
        let mut store = Store::seeded();
        assert_eq!(remove(&mut store.ads, "ad-404").status(), StatusCode::NOT_FOUND);
        assert_eq!(remove(&mut store.ads, "ad-1").status(), StatusCode::OK);
        assert!(!exists(&store.ads, "ad-1"));
    }
}
