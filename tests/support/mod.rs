//! In-process mock of the energy API
//!
//! Serves the handful of routes the client uses on an ephemeral port and
//! counts the calls the tests care about.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use energy_monitor::auth::decode_claims;
use energy_monitor::{ApiClient, ApiClientConfig, AuthTokens, MemorySessionStore, SessionStore, User};

pub const PASSWORD: &str = "secreto";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ROTATED_REFRESH_TOKEN: &str = "refresh-2";

/// Unsigned JWT carrying `exp` (unix seconds)
pub fn mint_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "sub": 1,
            "email": "ana@example.com",
            "nombre": "Ana",
            "apellido": "Ruiz",
            "exp": exp,
            "iat": exp - 900,
        })
        .to_string(),
    );
    format!("{}.{}.sig", header, payload)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Token valid for an hour
pub fn fresh_token() -> String {
    mint_token(now() + 3600)
}

pub fn user() -> User {
    serde_json::from_value(json!({
        "id": 1,
        "nombre": "Ana",
        "apellido": "Ruiz",
        "email": "ana@example.com",
        "estaActivo": true,
        "fechaCreacion": "2024-03-01T00:00:00.000Z"
    }))
    .unwrap()
}

/// What the mock has seen
#[derive(Default)]
pub struct Calls {
    pub refresh: AtomicUsize,
    pub logout: AtomicUsize,
    pub profile: AtomicUsize,
    pub monitoring: AtomicUsize,
    pub historical: AtomicUsize,
    /// Refresh endpoint answers 401 when set
    pub refresh_fails: AtomicBool,
    pub last_authorization: Mutex<Option<String>>,
    pub last_query: Mutex<Option<String>>,
    pub last_refresh_body: Mutex<Option<Value>>,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    pub fn query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

pub struct MockApi {
    pub base_url: String,
    pub calls: Arc<Calls>,
}

impl MockApi {
    pub async fn start() -> Self {
        let calls = Arc::new(Calls::default());
        let app = router(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            calls,
        }
    }

    pub fn client(&self, session: Arc<MemorySessionStore>) -> ApiClient {
        let config = ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            ..ApiClientConfig::default()
        };
        ApiClient::new(config, session as Arc<dyn SessionStore>).unwrap()
    }
}

/// Session holding `access_token` and the mock's refresh token
pub fn session_with(access_token: String) -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_tokens(AuthTokens::new(
        access_token,
        REFRESH_TOKEN,
    )))
}

fn router(calls: Arc<Calls>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh-token", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
        .route("/centros", get(centros))
        .route("/centros/:id", get(centro))
        .route("/areas", get(areas))
        .route("/areas/:id", get(area))
        .route("/areas/centro/:id", get(areas_by_centro))
        .route("/sensores", get(sensores))
        .route("/sensores/:id", get(sensor))
        .route("/mediciones", get(mediciones))
        .route("/mediciones/sensor/:id", get(mediciones_by_sensor))
        .route("/mediciones/resumen/sensor/:id", get(resumen_by_sensor))
        .route("/mediciones/centro/:id/monitoring", get(monitoring))
        .route("/mediciones/historico", get(historico))
        .with_state(calls)
}

fn record_auth(calls: &Calls, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *calls.last_authorization.lock().unwrap() = value;
}

fn bearer_is_valid(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| decode_claims(token).ok())
        .map(|claims| claims.exp > now())
        .unwrap_or(false)
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return unauthorized("Credenciales inválidas");
    }
    Json(json!({
        "accessToken": fresh_token(),
        "refreshToken": REFRESH_TOKEN,
        "user": user(),
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (StatusCode::CONFLICT, Json(json!({}))).into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "accessToken": fresh_token(),
            "refreshToken": REFRESH_TOKEN,
        })),
    )
        .into_response()
}

async fn refresh(State(calls): State<Arc<Calls>>, Json(body): Json<Value>) -> Response {
    calls.refresh.fetch_add(1, Ordering::SeqCst);
    *calls.last_refresh_body.lock().unwrap() = Some(body);

    if calls.refresh_fails.load(Ordering::SeqCst) {
        return unauthorized("Refresh token inválido");
    }
    Json(json!({
        "accessToken": fresh_token(),
        "refreshToken": ROTATED_REFRESH_TOKEN,
    }))
    .into_response()
}

async fn logout(State(calls): State<Arc<Calls>>, headers: HeaderMap) -> StatusCode {
    calls.logout.fetch_add(1, Ordering::SeqCst);
    record_auth(&calls, &headers);
    StatusCode::OK
}

async fn profile(State(calls): State<Arc<Calls>>, headers: HeaderMap) -> Response {
    calls.profile.fetch_add(1, Ordering::SeqCst);
    if !bearer_is_valid(&headers) {
        return unauthorized("Unauthorized");
    }
    Json(user()).into_response()
}

async fn centros(State(calls): State<Arc<Calls>>, headers: HeaderMap) -> Response {
    record_auth(&calls, &headers);
    if !bearer_is_valid(&headers) {
        return unauthorized("Unauthorized");
    }
    Json(json!([
        { "id": 1, "nombre": "Planta Norte", "direccion": "Av. 1" },
        { "id": 2, "nombre": "Planta Sur", "direccion": "Av. 2" }
    ]))
    .into_response()
}

async fn areas(State(calls): State<Arc<Calls>>, headers: HeaderMap) -> Response {
    record_auth(&calls, &headers);
    Json(json!([
        { "id": 10, "nombre": "Línea 1", "centroId": 1 },
        { "id": 20, "nombre": "Bodega", "centroId": 2 }
    ]))
    .into_response()
}

async fn areas_by_centro(Path(id): Path<i64>) -> Json<Value> {
    Json(json!([{ "id": id * 10, "nombre": "Línea 1", "centroId": id }]))
}

async fn sensores() -> Json<Value> {
    Json(json!([
        { "id": 100, "nombre": "Medidor A", "sensorUid": "ESP32-A", "areaId": 10 },
        { "id": 200, "nombre": "Medidor B", "areaId": 20 }
    ]))
}

async fn centro(Path(id): Path<i64>) -> Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Centro no encontrado" })))
            .into_response();
    }
    Json(json!({ "id": id, "nombre": "Planta Norte", "direccion": "Av. 1" })).into_response()
}

async fn area(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "id": id, "nombre": "Línea 1", "centroId": 1 }))
}

async fn sensor(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "nombre": "Medidor A",
        "tipo": "corriente",
        "estado": "activo",
        "sensorUid": "ESP32-A",
        "areaId": 10,
        "area": { "id": 10, "nombre": "Línea 1", "centroId": 1 }
    }))
}

fn medicion(id: i64, sensor_id: i64) -> Value {
    json!({
        "id": id,
        "fecha": "2024-05-08",
        "hora": "10:00:00",
        "voltaje": 127.1,
        "corriente": 2.5,
        "potencia": 317.75,
        "energiaConsumida": 0.32,
        "sensorId": sensor_id
    })
}

async fn mediciones(State(calls): State<Arc<Calls>>, RawQuery(query): RawQuery) -> Json<Value> {
    *calls.last_query.lock().unwrap() = query;
    Json(json!({
        "data": [medicion(1, 100), medicion(2, 200)],
        "total": 42,
        "page": 2,
        "limit": 2
    }))
}

async fn mediciones_by_sensor(
    State(calls): State<Arc<Calls>>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    *calls.last_query.lock().unwrap() = query;
    Json(json!([medicion(1, id)]))
}

async fn resumen_by_sensor(
    State(calls): State<Arc<Calls>>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    *calls.last_query.lock().unwrap() = query;
    Json(json!({
        "promedioVoltaje": 126.8,
        "promedioCorriente": 2.6,
        "potenciaTotal": 1520.5,
        "energiaConsumidaTotal": 12.4
    }))
}

async fn monitoring(
    State(calls): State<Arc<Calls>>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> Response {
    calls.monitoring.fetch_add(1, Ordering::SeqCst);
    *calls.last_query.lock().unwrap() = query;

    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Centro no encontrado" })))
            .into_response();
    }

    Json(json!({
        "centroId": id,
        "centroNombre": "Planta Norte",
        "consumoTotal": 12.345,
        "eficiencia": 91.5,
        "voltajeCorrienteSeries": [
            { "fecha": "2024-05-08", "hora": "10:00:00", "voltaje": 127.1, "corriente": 2.5 },
            { "fecha": "2024-05-08", "hora": "10:05:00", "voltaje": 126.4, "corriente": 2.8 }
        ],
        "dispositivos": [
            { "id": 100, "nombre": "Medidor A", "estado": "activo",
              "ultimaActualizacion": chrono::Utc::now().to_rfc3339(), "consumo": 4.26 },
            { "id": 200, "nombre": "Medidor B", "estado": "inactivo",
              "ultimaActualizacion": "", "consumo": null }
        ],
        "energiaPorDispositivo": [
            { "nombre": "Medidor A", "valor": 4.26 }
        ],
        "consumoPorTipo": []
    }))
    .into_response()
}

async fn historico(State(calls): State<Arc<Calls>>, RawQuery(query): RawQuery) -> Json<Value> {
    calls.historical.fetch_add(1, Ordering::SeqCst);
    *calls.last_query.lock().unwrap() = query;

    Json(json!({
        "medicionesHistorial": [
            {
                "fecha": "2024-05-01T00:00:00.000Z",
                "centroid": 1,
                "centronombre": "Planta Norte",
                "areaid": 10,
                "areanombre": "Línea 1",
                "sensorid": 100,
                "sensoruid": "ESP32-A",
                "voltajepromedio": "127.04",
                "corrientepromedio": "2.51",
                "consumopromedio": "0.32"
            }
        ],
        "medicionesPorDia": [
            { "fecha": "2024-05-01", "voltajepromedio": "127.04", "corrientepromedio": "2.51" }
        ]
    }))
}
