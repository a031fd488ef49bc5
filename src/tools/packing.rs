//! Packing recommendations keyed on a weather condition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{required_str, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStatus {
    Success,
}

/// Result of `get_packing_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingResult {
    pub status: PackingStatus,
    pub recommendations: Vec<String>,
}

const RULES: &[(&[&str], &[&str])] = &[
    (&["rain", "shower"], &["Raincoat", "Umbrella", "Waterproof shoes"]),
    (&["snow", "ice"], &["Heavy coat", "Gloves", "Hat", "Thermal layers"]),
    (&["sunny", "clear"], &["Sunscreen", "Sunglasses", "Light jacket", "Hat"]),
];

const DEFAULT_ITEMS: &[&str] = &["Light layers", "Comfortable shoes", "Travel adapter"];

/// Recommend items for a condition string. Case-insensitive, first rule wins.
pub fn recommend(condition: &str) -> PackingResult {
    let condition_lower = condition.to_lowercase();
    let items = RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| condition_lower.contains(n)))
        .map(|(_, items)| *items)
        .unwrap_or(DEFAULT_ITEMS);

    PackingResult {
        status: PackingStatus::Success,
        recommendations: items.iter().map(|s| s.to_string()).collect(),
    }
}

/// Tool wrapper around [`recommend`].
pub struct GetPackingList;

#[async_trait]
impl Tool for GetPackingList {
    fn name(&self) -> &str {
        "get_packing_list"
    }

    fn description(&self) -> &str {
        "Get packing recommendations for a weather condition. Pass the 'condition' value returned by get_current_weather."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "condition": {
                    "type": "string",
                    "description": "Weather condition, e.g. 'rainy' or 'snowy'"
                }
            },
            "required": ["condition"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let condition = required_str(&args, "condition")?;
        let result = recommend(condition);
        tracing::debug!(condition, items = result.recommendations.len(), "get_packing_list");
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_showers_get_rain_gear() {
        let result = recommend("light rain showers");
        assert_eq!(result.status, PackingStatus::Success);
        assert_eq!(result.recommendations[0], "Raincoat");
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            recommend("SNOW and ice").recommendations,
            vec!["Heavy coat", "Gloves", "Hat", "Thermal layers"]
        );
    }

    #[test]
    fn same_condition_same_list() {
        assert_eq!(recommend("sunny"), recommend("sunny"));
        assert_eq!(recommend("Clear skies").recommendations[0], "Sunscreen");
    }

    #[test]
    fn rain_beats_snow_when_both_present() {
        assert_eq!(recommend("snow turning to rain").recommendations[0], "Raincoat");
    }

    #[test]
    fn unknown_condition_gets_default_items() {
        assert_eq!(
            recommend("foggy").recommendations,
            vec!["Light layers", "Comfortable shoes", "Travel adapter"]
        );
        assert_eq!(recommend("").recommendations.len(), 3);
    }

    #[test]
    fn serializes_status_as_success() {
        let value = serde_json::to_value(recommend("rainy")).unwrap();
        assert_eq!(value["status"], "success");
    }
}
