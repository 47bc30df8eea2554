//! Trading configuration posted by the frontend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

use super::lenient;

/// Typed view of the stored configuration.
///
/// The relay keeps the posted JSON untouched and only interprets it when a
/// signal arrives, so every field is optional. An absent threshold makes its
/// comparison fail rather than rejecting the whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradingConfig {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub leverage: Option<u32>,
    /// Percent above entry.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    /// Percent below entry.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// Display label only.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub di_plus_threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub di_minus_threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub adx_minimum: Option<f64>,
}

impl TradingConfig {
    /// Interpret a stored configuration value.
    ///
    /// Values that are not JSON objects carry no usable fields and come back
    /// as an empty configuration.
    pub fn from_value(value: &Value) -> Self {
        // Derived struct deserializers also accept arrays positionally.
        if !value.is_object() {
            warn!("Stored configuration is not an object; treating every field as unset");
            return Self::default();
        }

        match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Stored configuration could not be read; treating every field as unset");
                Self::default()
            }
        }
    }
}
