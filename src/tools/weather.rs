//! Mock weather lookup keyed on destination keywords.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{required_str, Tool};

/// Synthetic weather category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Snowy,
    Sunny,
    Rainy,
    Clear,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snowy => "snowy",
            Self::Sunny => "sunny",
            Self::Rainy => "rainy",
            Self::Clear => "clear",
        }
    }

    /// Temperature label reported for this condition.
    pub fn temperature(&self) -> &'static str {
        match self {
            Self::Snowy => "-5°C",
            Self::Sunny => "28°C",
            Self::Rainy => "12°C",
            Self::Clear => "20°C",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of `get_current_weather`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub location: String,
    pub condition: WeatherCondition,
    #[serde(rename = "temp")]
    pub temperature: String,
}

/// Keyword rules, checked in order. First hit wins.
const RULES: &[(&[&str], WeatherCondition)] = &[
    (&["helsinki", "snow", "cold"], WeatherCondition::Snowy),
    (&["miami", "dubai", "sunny", "hot"], WeatherCondition::Sunny),
    (&["london", "rain", "seattle"], WeatherCondition::Rainy),
];

/// Classify a destination into a synthetic observation.
///
/// Matching is case-insensitive substring search. Anything that matches no
/// rule, including the empty string, is `clear`.
pub fn classify(city: &str) -> WeatherObservation {
    let city_lower = city.to_lowercase();
    let condition = RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| city_lower.contains(k)))
        .map(|(_, condition)| *condition)
        .unwrap_or(WeatherCondition::Clear);

    WeatherObservation {
        location: city.to_string(),
        condition,
        temperature: condition.temperature().to_string(),
    }
}

/// Tool wrapper around [`classify`].
pub struct GetCurrentWeather;

#[async_trait]
impl Tool for GetCurrentWeather {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city. Returns the location, a condition (snowy, sunny, rainy or clear) and a temperature."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The exact city or destination the user asked about"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let city = required_str(&args, "city")?;
        let observation = classify(city);
        tracing::debug!(city, condition = %observation.condition, "get_current_weather");
        Ok(serde_json::to_value(observation)?)
    }
}
