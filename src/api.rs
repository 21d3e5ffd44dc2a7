// 🌐 HTTP Transport - REST API over the ledger (feature = "server")
//
// The ledger sits behind one mutex so map and registry are always updated together.

use crate::error::LedgerError;
use crate::ledger::{ParkOutcome, ParkRequest, ParkingLedger, UnparkOutcome};
use crate::model::{EntranceOccupancy, NewVehicle, ParkingMap, VehicleStatus};
use crate::store::ParkingStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state
pub struct AppState<S: ParkingStore> {
    ledger: Arc<Mutex<ParkingLedger<S>>>,
}

// Manual impl: derive would require S: Clone
impl<S: ParkingStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<S: ParkingStore> AppState<S> {
    pub fn new(ledger: ParkingLedger<S>) -> Self {
        AppState {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    // Every operation commits in one call, so a panicked holder cannot leave
    // half-written state behind and the poison flag can be ignored.
    fn lock(&self) -> MutexGuard<'_, ParkingLedger<S>> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Request was valid but changed nothing
    fn info(data: T, message: &str) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.to_string()),
        }
    }
}

fn ok_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
}

fn error_response(err: LedgerError) -> Response {
    let status = match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Storage(_) | LedgerError::Inconsistent(_) => {
            error!(error = %err, "ledger operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    };

    let body = ApiResponse {
        success: false,
        data: serde_json::Value::Null,
        error: Some(err.to_string()),
    };
    (status, Json(body)).into_response()
}

// ============================================================================
// Request / Response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct MapBody {
    #[serde(default)]
    map: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParkBody {
    vehicle: Option<serde_json::Value>,
    vehicle_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnparkBody {
    vehicle_id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_slots: usize,
    free_slots: usize,
    parked: usize,
    unparked: usize,
    entrances: Vec<EntranceOccupancy>,
}

fn parse_vehicle_id(raw: &serde_json::Value) -> Result<u64, LedgerError> {
    raw.as_u64()
        .ok_or_else(|| LedgerError::InvalidInput(format!("vehicleId must be a non-negative integer (got {})", raw)))
}

impl ParkBody {
    /// `vehicleId` wins when both are present
    fn into_request(self) -> Result<ParkRequest, LedgerError> {
        if let Some(raw) = &self.vehicle_id {
            return Ok(ParkRequest::Existing(parse_vehicle_id(raw)?));
        }

        match self.vehicle {
            Some(raw) => Ok(ParkRequest::New(parse_new_vehicle(&raw)?)),
            None => Err(LedgerError::InvalidInput(
                "missing parameter 'vehicle' or 'vehicleId'".to_string(),
            )),
        }
    }
}

/// Checks the shape of `vehicle`; the range of `size` is left to the ledger.
fn parse_new_vehicle(raw: &serde_json::Value) -> Result<NewVehicle, LedgerError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| LedgerError::InvalidInput(format!("vehicle must be an object (got {})", raw)))?;

    let name = match fields.get("name") {
        None | Some(serde_json::Value::Null) => "",
        Some(value) => value
            .as_str()
            .ok_or_else(|| LedgerError::InvalidInput(format!("vehicle name must be a string (got {})", value)))?,
    };

    let size = fields
        .get("size")
        .ok_or_else(|| LedgerError::InvalidInput("missing parameter 'vehicle.size'".to_string()))?;
    let size = size
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| LedgerError::InvalidInput(format!("size can only be 0, 1 or 2 (got {})", size)))?;

    Ok(NewVehicle::new(name, size))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/map - Current parking map
async fn get_map<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>) -> Response {
    match state.lock().map() {
        Ok(map) => ok_response(map),
        Err(e) => error_response(e),
    }
}

/// POST /api/map - Replace the map and reset the registry
async fn set_map<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>, Json(body): Json<MapBody>) -> Response {
    let map = match ParkingMap::from_value(body.map) {
        Ok(map) => map,
        Err(e) => return error_response(e),
    };

    match state.lock().set_map(map) {
        Ok(map) => ok_response(map),
        Err(e) => error_response(e),
    }
}

/// GET /api/vehicles - Vehicle registry
async fn get_vehicles<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>) -> Response {
    match state.lock().vehicles() {
        Ok(vehicles) => ok_response(vehicles),
        Err(e) => error_response(e),
    }
}

/// GET /api/stats - Occupancy summary
async fn get_stats<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>) -> Response {
    let ledger = state.lock();

    let (map, vehicles) = match ledger.map().and_then(|map| Ok((map, ledger.vehicles()?))) {
        Ok(loaded) => loaded,
        Err(e) => return error_response(e),
    };

    let entrances = map.occupancy();
    let parked = vehicles.iter().filter(|v| v.status == VehicleStatus::Parked).count();

    ok_response(StatsResponse {
        total_slots: entrances.iter().map(|e| e.total).sum(),
        free_slots: entrances.iter().map(|e| e.free).sum(),
        parked,
        unparked: vehicles.len() - parked,
        entrances,
    })
}

/// POST /api/park - Park a new vehicle or re-park an existing one
async fn park<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>, Json(body): Json<ParkBody>) -> Response {
    let request = match body.into_request() {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };

    match state.lock().park(request) {
        Ok(ParkOutcome::Parked { vehicles, .. }) => ok_response(vehicles),
        Ok(ParkOutcome::AlreadyParked(vehicle)) => {
            (StatusCode::OK, Json(ApiResponse::info(vehicle, "vehicle already parked"))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/unpark - Free the slot and bill the stay
async fn unpark<S: ParkingStore + Send + 'static>(State(state): State<AppState<S>>, Json(body): Json<UnparkBody>) -> Response {
    let id = match body.vehicle_id.as_ref() {
        Some(raw) => match parse_vehicle_id(raw) {
            Ok(id) => id,
            Err(e) => return error_response(e),
        },
        None => return error_response(LedgerError::InvalidInput("missing parameter 'vehicleId'".to_string())),
    };

    match state.lock().unpark(id) {
        Ok(UnparkOutcome::Unparked(receipt)) => ok_response(receipt),
        Ok(UnparkOutcome::AlreadyUnparked(vehicle)) => {
            (StatusCode::OK, Json(ApiResponse::info(vehicle, "vehicle already unparked"))).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router<S>(ledger: ParkingLedger<S>) -> Router
where
    S: ParkingStore + Send + 'static,
{
    let state = AppState::new(ledger);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/map", get(get_map::<S>).post(set_map::<S>))
        .route("/vehicles", get(get_vehicles::<S>))
        .route("/stats", get(get_stats::<S>))
        .route("/park", post(park::<S>))
        .route("/unpark", post(unpark::<S>))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
