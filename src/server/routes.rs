//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::controller::{
    DirectionsOutcome, DirectionsPhase, ExploreOutcome, ExplorePhase, LocateView, Origin,
};
use crate::coord::Coordinate;
use crate::destination::Destination;
use crate::discovery::{PlaceDiscovery, PlaceSummary};
use crate::error::Error;
use crate::geo::GeoBackend;
use crate::geolocation::fixed::FixedPositionSource;
use crate::map::MapSnapshot;
use crate::server::state::AppState;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router<G, D>(state: Arc<AppState<G, D>>) -> Router
where
    G: GeoBackend + 'static,
    D: PlaceDiscovery + 'static,
{
    // Static files next to the binary win over a missing ./static
    let static_path = if std::path::Path::new("static").exists() {
        std::path::PathBuf::from("static")
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
            .filter(|path| path.exists())
            .unwrap_or_else(|| std::path::PathBuf::from("static"))
    };

    Router::new()
        .route("/api/search", post(search_handler::<G, D>))
        .route("/api/locate", post(locate_handler::<G, D>))
        .route(
            "/api/destination",
            get(get_destination_handler::<G, D>).post(select_destination_handler::<G, D>),
        )
        .route("/api/directions", post(directions_handler::<G, D>))
        .route("/api/map", get(explore_map_handler::<G, D>))
        .route("/api/directions/map", get(directions_map_handler::<G, D>))
        .route("/api/status", get(status_handler::<G, D>))
        .fallback_service(ServeDir::new(static_path).append_index_html_on_directories(true))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_QUERY" | "INVALID_COORDINATES" | "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            "PERMISSION_DENIED" => StatusCode::FORBIDDEN,
            "SERVICE_ERROR" | "MALFORMED_RESPONSE" | "POSITION_UNAVAILABLE" => {
                StatusCode::BAD_GATEWAY
            }
            "LOCATION_TIMEOUT" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError {
            error: err.notice(),
            code: err.code().to_string(),
        }
    }
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Search a place and list popular places around it
///
/// POST /api/search
async fn search_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ExploreOutcome>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(state.controller.search(&req.query).await?))
}

/// Position reported by the browser
#[derive(Debug, Deserialize)]
pub struct LocateRequest {
    pub lat: f64,
    pub lng: f64,
    /// Meters; treated as precise when absent
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Show the device position
///
/// POST /api/locate
///
/// An empty body falls back to the IP-based position.
async fn locate_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
    body: Bytes,
) -> Result<Json<LocateView>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Json(state.controller.locate(&state.ip_source).await?));
    }

    let req: LocateRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid locate request: {}", e)))?;
    let coordinate = Coordinate::new(req.lat, req.lng)?;
    let source = FixedPositionSource::new(coordinate, req.accuracy.unwrap_or(0.0).max(0.0));

    Ok(Json(state.controller.locate(&source).await?))
}

/// Current destination
///
/// GET /api/destination
async fn get_destination_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
) -> Result<Json<Destination>, ApiError> {
    Ok(Json(state.controller.store().load()?))
}

/// Pick a destination
///
/// POST /api/destination
async fn select_destination_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
    payload: Result<Json<PlaceSummary>, JsonRejection>,
) -> Result<Json<Destination>, ApiError> {
    let Json(place) = payload?;
    Ok(Json(state.controller.select(&place)?))
}

/// Directions request body
///
/// Either `from` (free text) or `lat` and `lng`.
#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl DirectionsRequest {
    fn origin(self) -> Result<Origin, ApiError> {
        match (self.lat, self.lng, self.from) {
            (Some(lat), Some(lng), _) => Ok(Origin::Position(Coordinate::new(lat, lng)?)),
            (None, None, from) => Ok(Origin::Query(from.unwrap_or_default())),
            _ => Err(ApiError::bad_request("Both lat and lng are required")),
        }
    }
}

/// Route to the selected destination
///
/// POST /api/directions
async fn directions_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> Result<Json<DirectionsOutcome>, ApiError> {
    let Json(req) = payload?;
    let origin = req.origin()?;
    Ok(Json(state.controller.directions(&origin).await?))
}

/// Explore page map
///
/// GET /api/map
async fn explore_map_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
) -> Json<MapSnapshot> {
    Json(state.controller.explore_map().lock().await.snapshot())
}

/// Directions page map
///
/// GET /api/directions/map
async fn directions_map_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
) -> Json<MapSnapshot> {
    Json(state.controller.directions_map().lock().await.snapshot())
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Place discovery backend
    pub discovery: String,
    pub explore: ExplorePhase,
    pub directions: DirectionsPhase,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G: GeoBackend, D: PlaceDiscovery>(
    State(state): State<Arc<AppState<G, D>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        discovery: state.controller.discovery().name().to_string(),
        explore: state.controller.explore_phase().await,
        directions: state.controller.directions_phase().await,
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{controller, geocoder};
    use crate::discovery::fake::FakeDiscovery;
    use crate::geo::fake::FakeGeocoder;
    use crate::geolocation::ip::IpPositionSource;
    use crate::test_support::spawn_router;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    type TestState = Arc<AppState<FakeGeocoder, FakeDiscovery>>;

    fn create_test_state(geocoder: FakeGeocoder) -> (TempDir, TestState) {
        let (dir, controller) = controller(geocoder, FakeDiscovery::default());
        let state = AppState::with_controller(controller);
        (dir, Arc::new(state))
    }

    /// State whose IP fallback answers with `reply`
    async fn create_ip_state(reply: Value) -> (TempDir, TestState) {
        let ip_api = Router::new().route(
            "/json",
            get(move || {
                let reply = reply.clone();
                async move { Json(reply) }
            }),
        );
        let base = spawn_router(ip_api).await;
        let source = IpPositionSource::without_cache().with_endpoint(format!("{}/json", base));

        let (dir, controller) = controller(geocoder(), FakeDiscovery::default());
        let state = AppState::with_controller(controller).with_ip_source(source);
        (dir, Arc::new(state))
    }

    async fn call(state: &TestState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let app = create_router(state.clone());
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(&state, "GET", "/api/status", None).await;

        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.discovery, "fake");
        assert_eq!(status.explore, ExplorePhase::Idle);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(&state, "POST", "/api/search", Some(json!({"query": "Paris"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["places"]["kind"], "cards");
        assert_eq!(body["places"]["value"][0]["place"]["name"], "Paris sight 1");

        let (_, map) = call(&state, "GET", "/api/map", None).await;
        assert_eq!(map["marker"]["label"], "Paris, Ile-de-France, Metropolitan France");
        assert_eq!(map["view"]["zoom"], 14.0);
    }

    #[tokio::test]
    async fn test_search_not_found() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(&state, "POST", "/api/search", Some(json!({"query": "Atlantis"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.error, "Location not found. Please check the spelling.");
    }

    #[tokio::test]
    async fn test_search_service_down() {
        let (_dir, state) = create_test_state(FakeGeocoder::failing());
        let (status, body) = call(&state, "POST", "/api/search", Some(json!({"query": "Paris"}))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Error searching location. Please try again.");
    }

    #[tokio::test]
    async fn test_locate_with_position() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(
            &state,
            "POST",
            "/api/locate",
            Some(json!({"lat": 35.6762, "lng": 139.6503, "accuracy": 30.0})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["precise"], true);
        assert_eq!(body["location"]["display_name"], "Your Location");
    }

    #[tokio::test]
    async fn test_locate_without_body_uses_ip() {
        let (_dir, state) = create_ip_state(json!({
            "status": "success",
            "lat": 48.1372,
            "lon": 11.5756,
            "city": "Munich",
            "regionName": "Bavaria",
            "country": "Germany"
        }))
        .await;
        let (status, body) = call(&state, "POST", "/api/locate", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["precise"], false);
        assert_eq!(body["reading"]["accuracy_m"], 5000.0);
        assert_eq!(body["reading"]["coordinate"]["lat"], 48.1372);

        let (_, map) = call(&state, "GET", "/api/map", None).await;
        assert_eq!(map["accuracy_circle"]["radius_m"], 300.0);
    }

    #[tokio::test]
    async fn test_locate_ip_lookup_failed() {
        let (_dir, state) = create_ip_state(json!({
            "status": "fail",
            "message": "private range"
        }))
        .await;
        let (status, body) = call(&state, "POST", "/api/locate", None).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "POSITION_UNAVAILABLE");
        assert_eq!(
            body["error"],
            "Error getting location: Location information unavailable"
        );
    }

    #[tokio::test]
    async fn test_search_empty_body_is_bad_request() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(&state, "POST", "/api/search", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "BAD_REQUEST");
        assert!(err.error.contains("query"));
    }

    #[tokio::test]
    async fn test_destination_without_name_is_bad_request() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(&state, "POST", "/api/destination", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_locate_rejects_bad_coordinates() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, body) = call(
            &state,
            "POST",
            "/api/locate",
            Some(json!({"lat": 135.0, "lng": 0.0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_destination_roundtrip_and_directions() {
        let (_dir, state) = create_test_state(geocoder());

        let (status, body) = call(&state, "GET", "/api/destination", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No destination selected");

        let (status, _) = call(
            &state,
            "POST",
            "/api/destination",
            Some(json!({"name": "Eiffel Tower", "description": "Iron lattice tower."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&state, "GET", "/api/destination", None).await;
        assert_eq!(body["name"], "Eiffel Tower");

        let (status, body) = call(&state, "POST", "/api/directions", Some(json!({"from": "Louvre"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["destination"]["name"], "Eiffel Tower");
        assert!(body["times"]["walk"].as_u64().unwrap() > 0);

        let (_, map) = call(&state, "GET", "/api/directions/map", None).await;
        assert_eq!(map["marker"]["label"], "Eiffel Tower");
        assert!(map["route"].is_object());
    }

    #[tokio::test]
    async fn test_directions_from_position() {
        let (_dir, state) = create_test_state(geocoder());
        call(&state, "POST", "/api/destination", Some(json!({"name": "Louvre"}))).await;

        let (status, body) = call(
            &state,
            "POST",
            "/api/directions",
            Some(json!({"lat": 48.8566, "lng": 2.3522})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["from"]["display_name"], "Your Location");
    }

    #[tokio::test]
    async fn test_directions_half_position_is_bad_request() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, _) = call(&state, "POST", "/api/directions", Some(json!({"lat": 1.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_directions_unknown_origin() {
        let (_dir, state) = create_test_state(geocoder());
        call(&state, "POST", "/api/destination", Some(json!({"name": "Louvre"}))).await;

        let (status, body) = call(&state, "POST", "/api/directions", Some(json!({"from": "Atlantis"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Could not find one or both locations. Please try again.");
    }

    #[tokio::test]
    async fn test_initial_map_snapshot() {
        let (_dir, state) = create_test_state(geocoder());
        let (status, map) = call(&state, "GET", "/api/map", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(map["view"]["zoom"], 2.0);
        assert!(map["marker"].is_null());
        assert_eq!(map["interaction"]["zoom_control"], "bottom_right");
    }
}
