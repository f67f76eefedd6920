//! # API REST
//!
//! Read-only REST surface over the body-site taxonomy.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! The server keeps no navigation sessions. A client sends the ids it has selected so far and
//! gets back the state a navigator reaches by replaying them from the root.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use body_sites::{NodeKind, SiteCode, Taxonomy};
use ipc_core::{
    BodySiteNavigator, NavigationSnapshot, NavigatorState, NodeSummary, SiteSelection,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    taxonomy: Arc<Taxonomy>,
}

impl AppState {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Request to replay a drill-down path.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NavigateReq {
    /// Node ids selected so far, root first.
    #[serde(default)]
    pub path: Vec<String>,
    /// Site code already stored on the record, if any.
    #[serde(default)]
    pub selected_code: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct NodeRes {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub code: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectionRes {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationRes {
    pub state: NavigatorState,
    pub path: Vec<String>,
    pub breadcrumb: Vec<String>,
    pub options: Vec<NodeRes>,
    pub resolved: Option<SelectionRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteRes {
    pub code: String,
    pub label: String,
    /// Labels of the enclosing regions, root first.
    pub breadcrumb: Vec<String>,
}

impl From<NodeSummary> for NodeRes {
    fn from(node: NodeSummary) -> Self {
        Self {
            id: node.id,
            label: node.label,
            kind: node.kind,
            code: node.code.map(|c| c.to_string()),
        }
    }
}

impl From<SiteSelection> for SelectionRes {
    fn from(selection: SiteSelection) -> Self {
        let (code, label) = selection.to_pair();
        Self { code, label }
    }
}

impl From<NavigationSnapshot> for NavigationRes {
    fn from(snapshot: NavigationSnapshot) -> Self {
        Self {
            state: snapshot.state,
            path: snapshot.path,
            breadcrumb: snapshot.breadcrumb,
            options: snapshot.options.into_iter().map(NodeRes::from).collect(),
            resolved: snapshot.resolved.map(SelectionRes::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, root_sites, navigate, site_by_code),
    components(schemas(
        HealthRes,
        NavigateReq,
        NavigationRes,
        NavigatorState,
        NodeKind,
        NodeRes,
        SelectionRes,
        SiteRes
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/body-sites", get(root_sites))
        .route("/body-sites/navigate", post(navigate))
        .route("/body-sites/codes/:code", get(site_by_code))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "IPC REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/body-sites",
    responses(
        (status = 200, description = "Root body-site regions", body = NavigationRes)
    )
)]
/// Root regions of the body-site taxonomy
#[axum::debug_handler]
async fn root_sites(State(state): State<AppState>) -> Json<NavigationRes> {
    let navigator = BodySiteNavigator::new(&state.taxonomy);
    Json(navigator.snapshot().into())
}

#[utoipa::path(
    post,
    path = "/body-sites/navigate",
    request_body = NavigateReq,
    responses(
        (status = 200, description = "Navigator state after replaying the path", body = NavigationRes),
        (status = 400, description = "A path id is not offered at its depth")
    )
)]
/// Replay a drill-down path
///
/// Starts from `selected_code` when it names a known site (so the path is ignored), otherwise
/// from the root, then selects each id in `path` in order.
#[axum::debug_handler]
async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateReq>,
) -> Result<Json<NavigationRes>, (StatusCode, String)> {
    let mut navigator =
        BodySiteNavigator::with_selected_code(&state.taxonomy, req.selected_code.as_deref());

    for id in &req.path {
        if let Err(e) = navigator.select_id(id) {
            tracing::debug!("navigate rejected: {}", e);
            return Err((StatusCode::BAD_REQUEST, e.to_string()));
        }
    }

    Ok(Json(navigator.snapshot().into()))
}

#[utoipa::path(
    get,
    path = "/body-sites/codes/{code}",
    params(
        ("code" = String, Path, description = "Site code as stored on incident records")
    ),
    responses(
        (status = 200, description = "Site for the code", body = SiteRes),
        (status = 400, description = "Code is not a positive integer"),
        (status = 404, description = "No site carries the code")
    )
)]
/// Look up a body site by code
#[axum::debug_handler]
async fn site_by_code(
    State(state): State<AppState>,
    AxumPath(code): AxumPath<String>,
) -> Result<Json<SiteRes>, (StatusCode, String)> {
    let code = SiteCode::parse(&code).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    match (state.taxonomy.find_leaf(code), state.taxonomy.path_to(code)) {
        (Some(leaf), Some(chain)) => Ok(Json(SiteRes {
            code: code.to_string(),
            label: leaf.label().to_owned(),
            breadcrumb: chain.iter().map(|b| b.label().to_owned()).collect(),
        })),
        _ => Err((
            StatusCode::NOT_FOUND,
            format!("No body site has code {code}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let taxonomy = Taxonomy::builtin().expect("embedded taxonomy is valid");
        router(AppState::new(Arc::new(taxonomy.clone())))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.expect("response");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec();
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn navigate_request(req: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/body-sites/navigate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(req.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let (status, body) = send(get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let res: HealthRes = serde_json::from_slice(&body).expect("json");
        assert!(res.ok);
    }

    #[tokio::test]
    async fn root_lists_four_regions() {
        let (status, body) = send(get_request("/body-sites")).await;
        assert_eq!(status, StatusCode::OK);

        let res: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(res["state"], "browsing");
        assert_eq!(res["path"], serde_json::json!([]));
        let options = res["options"].as_array().expect("options");
        assert_eq!(options.len(), 4);
        assert!(options
            .iter()
            .all(|o| o["kind"] == "branch" && o["code"].is_null()));
    }

    #[tokio::test]
    async fn navigate_replays_path_to_resolution() {
        let (status, body) = send(navigate_request(serde_json::json!({
            "path": ["hands_fingers", "right_hand", "fingers_r", "index_r_tip"]
        })))
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(res["state"], "resolved");
        assert_eq!(
            res["resolved"],
            serde_json::json!({"code": "4", "label": "Index Tip (R)"})
        );
        assert_eq!(
            res["breadcrumb"],
            serde_json::json!(["Hands & Fingers", "Right Hand", "Fingers (Right)"])
        );
        assert_eq!(res["options"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn navigate_starts_resolved_from_selected_code() {
        let (status, body) = send(navigate_request(serde_json::json!({
            "path": ["torso"],
            "selected_code": "31"
        })))
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(res["state"], "resolved");
        assert_eq!(res["path"], serde_json::json!([]));
        assert_eq!(res["resolved"]["label"], "Abdomen");
    }

    #[test]
    fn node_kind_and_state_serialise_in_lowercase() {
        let taxonomy = Taxonomy::builtin().expect("embedded taxonomy is valid");
        let mut navigator = BodySiteNavigator::new(taxonomy);
        navigator.select_id("torso").expect("offered");

        let res = NavigationRes::from(navigator.snapshot());
        assert_eq!(res.state, NavigatorState::Browsing);
        assert_eq!(res.options[0].kind, NodeKind::Leaf);
        assert_eq!(res.options[0].code.as_deref(), Some("30"));

        let json = serde_json::to_value(&res).expect("serialise");
        assert_eq!(json["state"], "browsing");
        assert_eq!(json["options"][0]["kind"], "leaf");
    }

    #[test]
    fn openapi_documents_enum_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise openapi");
        let schemas = &doc["components"]["schemas"];
        assert_eq!(schemas["NodeKind"]["enum"], serde_json::json!(["branch", "leaf"]));
        assert_eq!(
            schemas["NavigatorState"]["enum"],
            serde_json::json!(["browsing", "resolved"])
        );
    }

    #[tokio::test]
    async fn navigate_rejects_ids_not_offered() {
        let (status, body) = send(navigate_request(serde_json::json!({
            "path": ["torso", "right_hand"]
        })))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8_lossy(&body).contains("right_hand"));
    }

    #[tokio::test]
    async fn lookup_by_code() {
        let (status, body) = send(get_request("/body-sites/codes/4")).await;
        assert_eq!(status, StatusCode::OK);
        let res: SiteRes = serde_json::from_slice(&body).expect("json");
        assert_eq!(res.label, "Index Tip (R)");
        assert_eq!(res.breadcrumb, ["Hands & Fingers", "Right Hand", "Fingers (Right)"]);

        let (status, _) = send(get_request("/body-sites/codes/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(get_request("/body-sites/codes/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
