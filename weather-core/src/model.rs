use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound payload for creating a weather record.
///
/// `date` and `location` default to empty strings when absent so that a
/// missing field is reported the same way as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWeatherRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

impl CreateWeatherRequest {
    pub fn new(date: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            location: location.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWeatherResponse {
    pub id: String,
}

/// A stored weather lookup: the caller's request plus the provider's
/// current-conditions payload, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: String,
    pub date: String,
    pub location: String,
    pub notes: String,
    pub weather: Value,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
