//! Garden system data model as published by the server.
//!
//! Field names follow the server's JSON encoding (`Identifier`, `CreatedAt`,
//! `GardenSystemID`, ...). The server writes unset timestamps as the zero time
//! `0001-01-01T00:00:00Z` and empty collections as `null`; both are normalised
//! on decode so the rest of the crate only sees `None` and empty vectors.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A remote monitored unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenSystem {
    #[serde(rename = "Identifier")]
    pub id: String,

    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "CreatedAt", default)]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: DateTime<Utc>,

    #[serde(rename = "DeletedAt", default, deserialize_with = "optional_time")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(rename = "Announcement", default, deserialize_with = "null_as_default")]
    pub announcement: Announcement,

    #[serde(rename = "LastReading", default, deserialize_with = "optional_reading")]
    pub last_reading: Option<Reading>,

    /// History in arrival order, not necessarily sorted by timestamp.
    #[serde(rename = "Readings", default, deserialize_with = "null_as_default")]
    pub readings: Vec<Reading>,
}

/// Self-reported metadata, replaced wholesale on every announcement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "GardenSystemID", default)]
    pub garden_system_id: String,

    /// Only virtual systems send this.
    #[serde(rename = "IsEmulator", default)]
    pub is_emulator: bool,

    /// Connected through the mesh rather than directly over MQTT.
    #[serde(rename = "IsMesh", default)]
    pub is_mesh: bool,

    /// Wi-Fi channel, only meaningful for the mesh coordinator.
    #[serde(rename = "Channel", default)]
    pub channel: i32,

    #[serde(rename = "RestartReason", default)]
    pub restart_reason: String,

    #[serde(rename = "CoreVersion", default)]
    pub core_version: String,

    #[serde(rename = "SdkVersion", default)]
    pub sdk_version: String,

    #[serde(rename = "FilesystemUsedSize", default)]
    pub filesystem_used_size: u64,

    #[serde(rename = "FilesystemTotalSize", default)]
    pub filesystem_total_size: u64,

    #[serde(rename = "Sensors", default, deserialize_with = "null_as_default")]
    pub sensors: Vec<String>,
}

/// One timestamped measurement, or a failed attempt at one.
///
/// A failed reading never carries measurements, whatever the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireReading")]
pub struct Reading {
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "GardenSystemID")]
    pub garden_system_id: String,

    #[serde(rename = "Error")]
    pub error: bool,

    #[serde(rename = "Temperature")]
    pub temperature: Option<f32>,

    #[serde(rename = "Humidity")]
    pub humidity: Option<f32>,
}

#[derive(Deserialize)]
struct WireReading {
    #[serde(rename = "CreatedAt")]
    created_at: DateTime<Utc>,

    #[serde(rename = "GardenSystemID", default)]
    garden_system_id: String,

    #[serde(rename = "Error", default)]
    error: bool,

    #[serde(rename = "Temperature", default)]
    temperature: Option<f32>,

    #[serde(rename = "Humidity", default)]
    humidity: Option<f32>,
}

impl From<WireReading> for Reading {
    fn from(wire: WireReading) -> Self {
        // The server zero-fills the measurements of a failed reading
        let (temperature, humidity) = if wire.error {
            (None, None)
        } else {
            (wire.temperature, wire.humidity)
        };

        Self {
            created_at: wire.created_at,
            garden_system_id: wire.garden_system_id,
            error: wire.error,
            temperature,
            humidity,
        }
    }
}

impl GardenSystem {
    /// A freshly announced system with no readings yet.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            announcement: Announcement {
                garden_system_id: id.clone(),
                ..Announcement::default()
            },
            id,
            name: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            last_reading: None,
            readings: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// User-facing label: the configured name, or the identifier if unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl Announcement {
    pub fn filesystem_usage_percent(&self) -> Option<f64> {
        if self.filesystem_total_size == 0 {
            return None;
        }
        Some(self.filesystem_used_size as f64 * 100.0 / self.filesystem_total_size as f64)
    }
}

impl Reading {
    pub fn new(garden_system_id: impl Into<String>, temperature: f32, humidity: f32) -> Self {
        Self {
            created_at: Utc::now(),
            garden_system_id: garden_system_id.into(),
            error: false,
            temperature: Some(temperature),
            humidity: Some(humidity),
        }
    }

    /// A reading the sensor failed to take.
    pub fn failed(garden_system_id: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            garden_system_id: garden_system_id.into(),
            error: true,
            temperature: None,
            humidity: None,
        }
    }
}

fn is_zero_time(time: &DateTime<Utc>) -> bool {
    time.year() <= 1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let time = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(time.filter(|t| !is_zero_time(t)))
}

// The server always sends a LastReading object; before the first reading it is
// the zero value.
fn optional_reading<'de, D>(deserializer: D) -> Result<Option<Reading>, D::Error>
where
    D: Deserializer<'de>,
{
    let reading = Option::<Reading>::deserialize(deserializer)?;
    Ok(reading.filter(|r| !is_zero_time(&r.created_at)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

    fn server_json() -> String {
        format!(
            r#"{{
                "Identifier": "a1b2c3d4e5f6",
                "Name": "",
                "CreatedAt": "2021-06-01T10:00:00.123456-04:00",
                "UpdatedAt": "2021-06-01T12:30:00Z",
                "DeletedAt": "{ZERO_TIME}",
                "Announcement": {{
                    "GardenSystemID": "a1b2c3d4e5f6",
                    "IsEmulator": false,
                    "IsMesh": true,
                    "Channel": 6,
                    "RestartReason": "Power on",
                    "CoreVersion": "2.7.4",
                    "SdkVersion": "2.2.2-dev(38a443e)",
                    "FilesystemUsedSize": 8192,
                    "FilesystemTotalSize": 32768,
                    "Sensors": ["DHT22", "Soil"]
                }},
                "LastReading": {{
                    "CreatedAt": "2021-06-01T12:30:00Z",
                    "GardenSystemID": "a1b2c3d4e5f6",
                    "Error": false,
                    "Temperature": 21.5,
                    "Humidity": 48
                }},
                "Readings": null
            }}"#
        )
    }

    #[test]
    fn test_decode_server_system() {
        let system: GardenSystem = serde_json::from_str(&server_json()).unwrap();

        assert_eq!(system.id, "a1b2c3d4e5f6");
        assert!(system.deleted_at.is_none());
        assert!(!system.is_deleted());
        assert!(system.readings.is_empty());
        assert_eq!(system.announcement.sensors, vec!["DHT22", "Soil"]);
        assert!(system.announcement.is_mesh);
        assert_eq!(system.announcement.channel, 6);
        assert_eq!(
            system.created_at.to_rfc3339(),
            "2021-06-01T14:00:00.123456+00:00"
        );

        let reading = system.last_reading.unwrap();
        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.humidity, Some(48.0));
    }

    #[test]
    fn test_zero_last_reading_is_absent() {
        let json = format!(
            r#"{{
                "Identifier": "a1b2c3d4e5f6",
                "LastReading": {{
                    "CreatedAt": "{ZERO_TIME}",
                    "GardenSystemID": "",
                    "Error": false,
                    "Temperature": 0,
                    "Humidity": 0
                }}
            }}"#
        );
        let system: GardenSystem = serde_json::from_str(&json).unwrap();
        assert!(system.last_reading.is_none());
    }

    #[test]
    fn test_error_reading_without_measurements() {
        let json = r#"{"CreatedAt": "2021-06-01T12:30:00Z", "GardenSystemID": "a1b2c3d4e5f6", "Error": true}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(reading.error);
        assert!(reading.temperature.is_none());
        assert!(reading.humidity.is_none());
    }

    #[test]
    fn test_error_reading_drops_zero_filled_measurements() {
        let json = r#"{
            "Identifier": "a1b2c3d4e5f6",
            "LastReading": {
                "CreatedAt": "2021-06-01T12:30:00Z",
                "GardenSystemID": "a1b2c3d4e5f6",
                "Error": true,
                "Temperature": 0,
                "Humidity": 0
            },
            "Readings": [
                {"CreatedAt": "2021-06-01T12:00:00Z", "Error": false, "Temperature": 0, "Humidity": 35},
                {"CreatedAt": "2021-06-01T12:30:00Z", "Error": true, "Temperature": 0, "Humidity": 0}
            ]
        }"#;
        let system: GardenSystem = serde_json::from_str(json).unwrap();

        let last = system.last_reading.unwrap();
        assert!(last.error);
        assert!(last.temperature.is_none());
        assert!(last.humidity.is_none());

        // A successful reading keeps a genuine zero
        assert_eq!(system.readings[0].temperature, Some(0.0));
        assert!(system.readings[1].temperature.is_none());
    }

    #[test]
    fn test_deleted_system() {
        let json = r#"{"Identifier": "a1b2c3d4e5f6", "DeletedAt": "2021-07-01T00:00:00Z"}"#;
        let system: GardenSystem = serde_json::from_str(json).unwrap();
        assert!(system.is_deleted());
    }

    #[test]
    fn test_minimal_system_uses_defaults() {
        let system: GardenSystem =
            serde_json::from_str(r#"{"Identifier": "d1", "Readings": []}"#).unwrap();
        assert_eq!(system.display_name(), "d1");
        assert!(system.last_reading.is_none());
        assert!(system.announcement.sensors.is_empty());
    }

    #[test]
    fn test_display_name_prefers_name() {
        let mut system = GardenSystem::new("a1b2c3d4e5f6");
        assert_eq!(system.display_name(), "a1b2c3d4e5f6");
        system.name = "Tomatoes".to_string();
        assert_eq!(system.display_name(), "Tomatoes");
    }

    #[test]
    fn test_filesystem_usage_percent() {
        let mut announcement = Announcement::default();
        assert_eq!(announcement.filesystem_usage_percent(), None);

        announcement.filesystem_used_size = 8192;
        announcement.filesystem_total_size = 32768;
        assert_eq!(announcement.filesystem_usage_percent(), Some(25.0));
    }

    #[test]
    fn test_reencoded_system_decodes_identically() {
        let mut system = GardenSystem::new("a1b2c3d4e5f6");
        system.last_reading = Some(Reading::new("a1b2c3d4e5f6", 19.0, 55.0));
        system.readings.push(Reading::failed("a1b2c3d4e5f6"));

        let json = serde_json::to_string(&system).unwrap();
        let decoded: GardenSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, system);
    }
}
