//! Data Model
//!
//! Records exchanged with the remote energy API. Field names on the wire
//! follow the API (Spanish, mostly camelCase); Rust field names are English.
//!
//! - Auth: [`User`], [`AuthTokens`], login/register/refresh requests
//! - Reference entities: [`Centro`], [`Area`], [`Sensor`]
//! - Measurements: [`Medicion`], [`ResumenSensor`], [`CentroMonitoringData`],
//!   [`HistoricalData`]

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================
// AUTH
// ============================================

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "estaActivo", default)]
    pub is_active: bool,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: String,
}

impl User {
    /// "Nombre Apellido"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First letter of each name part, used for the header avatar
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

/// The persisted session record: a token pair plus the cached profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user: None,
        }
    }

    /// Builder method: attach a cached user
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================
// REFERENCE ENTITIES
// ============================================

/// A physical site grouping areas and sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centro {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
}

/// A sub-location within a centro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "centroId", default)]
    pub centro_id: i64,
}

/// A measurement device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(rename = "areaId", default)]
    pub area_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    /// Hardware identifier shown in the historical filters
    #[serde(rename = "sensorUid", default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Sensor {
    /// Label for filter drop-downs: the hardware uid, else the name
    pub fn label(&self) -> &str {
        self.uid.as_deref().unwrap_or(&self.name)
    }
}

// ============================================
// MEASUREMENTS
// ============================================

/// A single measurement record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicion {
    pub id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "voltaje")]
    pub voltage: f64,
    #[serde(rename = "corriente")]
    pub current: f64,
    #[serde(rename = "potencia", default)]
    pub power: f64,
    #[serde(rename = "energiaConsumida", default)]
    pub energy: f64,
    #[serde(rename = "sensorId")]
    pub sensor_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Sensor>,
}

/// Paged list wrapper for `/mediciones?page=&limit=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Aggregates for one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumenSensor {
    #[serde(rename = "promedioVoltaje")]
    pub avg_voltage: f64,
    #[serde(rename = "promedioCorriente")]
    pub avg_current: f64,
    #[serde(rename = "potenciaTotal")]
    pub total_power: f64,
    #[serde(rename = "energiaConsumidaTotal")]
    pub total_energy: f64,
}

/// Everything the monitoring page shows for one centro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroMonitoringData {
    #[serde(rename = "centroId")]
    pub centro_id: i64,
    #[serde(rename = "centroNombre", default)]
    pub centro_name: String,
    #[serde(rename = "consumoTotal", default)]
    pub total_consumption: f64,
    #[serde(rename = "eficiencia", default)]
    pub efficiency: f64,
    #[serde(rename = "voltajeCorrienteSeries", default)]
    pub series: Vec<VoltageCurrentSample>,
    #[serde(rename = "dispositivos", default)]
    pub devices: Vec<Dispositivo>,
    #[serde(rename = "energiaPorDispositivo", default)]
    pub energy_by_device: Vec<NamedValue>,
    #[serde(rename = "consumoPorTipo", default)]
    pub consumption_by_type: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageCurrentSample {
    #[serde(rename = "fecha", default)]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "voltaje")]
    pub voltage: f64,
    #[serde(rename = "corriente")]
    pub current: f64,
}

/// A device row in the monitoring response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispositivo {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    /// Timestamp of the last reading; `null` when the device never reported
    #[serde(rename = "ultimaActualizacion", default)]
    pub last_update: Option<String>,
    #[serde(rename = "consumo", default)]
    pub consumption: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "valor")]
    pub value: f64,
}

/// Response of `/mediciones/historico`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    #[serde(rename = "medicionesHistorial", default)]
    pub records: Vec<HistoricalRecord>,
    #[serde(rename = "medicionesPorDia", default)]
    pub daily: Vec<DailyAverage>,
}

/// One row of the historical detail table. Averages usually arrive as
/// decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "fecha", default)]
    pub date: Option<String>,
    #[serde(rename = "centroid", default)]
    pub centro_id: Option<i64>,
    #[serde(rename = "centronombre", default)]
    pub centro_name: Option<String>,
    #[serde(rename = "areaid", default)]
    pub area_id: Option<i64>,
    #[serde(rename = "areanombre", default)]
    pub area_name: Option<String>,
    #[serde(rename = "sensorid", default)]
    pub sensor_id: Option<i64>,
    #[serde(rename = "sensoruid", default)]
    pub sensor_uid: Option<String>,
    #[serde(rename = "voltajepromedio", default, deserialize_with = "lenient_decimal")]
    pub avg_voltage: Option<String>,
    #[serde(rename = "corrientepromedio", default, deserialize_with = "lenient_decimal")]
    pub avg_current: Option<String>,
    #[serde(rename = "consumopromedio", default, deserialize_with = "lenient_decimal")]
    pub avg_consumption: Option<String>,
}

/// One point of the per-day historical series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "voltajepromedio", default, deserialize_with = "lenient_decimal")]
    pub avg_voltage: Option<String>,
    #[serde(rename = "corrientepromedio", default, deserialize_with = "lenient_decimal")]
    pub avg_current: Option<String>,
}

/// Averages come from SQL `AVG`: normally a decimal string, sometimes a
/// bare number, `null` when every input row was null.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_tokens_wire_format() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "user": {
                "id": 7,
                "nombre": "Ana",
                "apellido": "Ruiz",
                "email": "ana@example.com",
                "estaActivo": true,
                "fechaCreacion": "2024-03-01T00:00:00.000Z"
            }
        }"#;

        let tokens: AuthTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "r");
        let user = tokens.user.unwrap();
        assert_eq!(user.full_name(), "Ana Ruiz");
        assert_eq!(user.initials(), "AR");
    }

    #[test]
    fn test_tokens_without_user_skip_field() {
        let tokens = AuthTokens::new("a", "r");
        let json = serde_json::to_value(&tokens).unwrap();
        assert!(json.get("user").is_none());
        assert_eq!(json["accessToken"], "a");
    }

    #[test]
    fn test_monitoring_data_defaults_missing_lists() {
        let json = r#"{"centroId": 1, "consumoTotal": 12.34, "eficiencia": 88}"#;
        let data: CentroMonitoringData = serde_json::from_str(json).unwrap();
        assert!(data.devices.is_empty());
        assert!(data.series.is_empty());
        assert!(data.consumption_by_type.is_empty());
        assert_eq!(data.efficiency, 88.0);
    }

    #[test]
    fn test_historical_lowercase_fields() {
        let json = r#"{
            "medicionesHistorial": [{
                "fecha": "2024-05-01T00:00:00.000Z",
                "centroid": 1,
                "centronombre": "Norte",
                "areaid": 2,
                "areanombre": "Bodega",
                "sensorid": 3,
                "sensoruid": "S-003",
                "voltajepromedio": "127.45",
                "corrientepromedio": "3.2",
                "consumopromedio": "0.41"
            }],
            "medicionesPorDia": [{"fecha": "2024-05-01", "voltajepromedio": "127", "corrientepromedio": "3"}]
        }"#;

        let data: HistoricalData = serde_json::from_str(json).unwrap();
        assert_eq!(data.records[0].sensor_uid.as_deref(), Some("S-003"));
        assert_eq!(data.daily[0].avg_voltage.as_deref(), Some("127"));
    }

    #[test]
    fn test_historical_averages_accept_numbers_and_null() {
        let json = r#"{
            "medicionesHistorial": [{"fecha": "2024-05-01", "voltajepromedio": 127.04, "corrientepromedio": null}],
            "medicionesPorDia": [{"fecha": "2024-05-01", "voltajepromedio": null, "corrientepromedio": 3}]
        }"#;

        let data: HistoricalData = serde_json::from_str(json).unwrap();
        assert_eq!(data.records[0].avg_voltage.as_deref(), Some("127.04"));
        assert_eq!(data.records[0].avg_current, None);
        assert_eq!(data.records[0].avg_consumption, None);
        assert_eq!(data.daily[0].avg_voltage, None);
        assert_eq!(data.daily[0].avg_current.as_deref(), Some("3"));
    }

    #[test]
    fn test_device_without_last_update() {
        let json = r#"{
            "centroId": 1,
            "dispositivos": [
                {"id": 1, "nombre": "A", "estado": "activo", "ultimaActualizacion": null},
                {"id": 2, "nombre": "B", "estado": "inactivo"}
            ]
        }"#;
        let data: CentroMonitoringData = serde_json::from_str(json).unwrap();
        assert_eq!(data.devices[0].last_update, None);
        assert_eq!(data.devices[1].last_update, None);
    }

    #[test]
    fn test_sensor_label_prefers_uid() {
        let mut sensor: Sensor =
            serde_json::from_str(r#"{"id": 1, "nombre": "Tablero A"}"#).unwrap();
        assert_eq!(sensor.label(), "Tablero A");
        sensor.uid = Some("S-001".to_string());
        assert_eq!(sensor.label(), "S-001");
    }
}
