//! Indicator signal delivered to the webhook.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use super::lenient;

/// Directional-movement reading from the alerting source.
///
/// No range or presence validation; a missing value fails its comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Signal {
    #[serde(rename = "plusDI", default, deserialize_with = "lenient::number")]
    pub plus_di: Option<f64>,
    #[serde(rename = "minusDI", default, deserialize_with = "lenient::number")]
    pub minus_di: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub adx: Option<f64>,
}

impl Signal {
    pub fn new(plus_di: f64, minus_di: f64, adx: f64) -> Self {
        Self {
            plus_di: Some(plus_di),
            minus_di: Some(minus_di),
            adx: Some(adx),
        }
    }

    /// Read a webhook body. Anything other than a JSON object carries no
    /// readings.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            debug!("Webhook body is not an object; every reading is unset");
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
