//! Current conditions from a wttr.in-compatible JSON endpoint.

use crate::error::SkillError;
use crate::skill::Skill;
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use simon_rs_config::WeatherSkillConfig;
use simon_rs_protocol::Action;
use std::time::Duration;

const TRIGGERS: &[&str] = &[
    "weather",
    "forecast",
    "temperature outside",
    "how hot",
    "how cold",
];
const LOCATION_MARKERS: &[&str] = &["weather in ", "weather for ", "weather at "];
const USER_AGENT: &str = "Simon-Assistant";

/// Answers weather questions with a one-sentence summary.
#[derive(Debug, Clone)]
pub struct WeatherSkill {
    client: reqwest::Client,
    endpoint: String,
    default_location: String,
}

impl WeatherSkill {
    pub fn new(config: &WeatherSkillConfig) -> Result<Self, SkillError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            default_location: config.default_location.clone(),
        })
    }

    /// Location named after "weather in/for/at", or the configured default.
    pub fn location_for(&self, utterance: &str) -> String {
        let lowered = utterance.to_lowercase();
        LOCATION_MARKERS
            .iter()
            .find_map(|marker| lowered.split_once(marker).map(|(_, rest)| rest))
            .map(|rest| rest.trim().trim_end_matches(['?', '.', '!']).trim())
            .filter(|location| !location.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_location.clone())
    }

    async fn report(&self, location: &str) -> Result<String, SkillError> {
        let url = format!(
            "{}/{}?format=j1",
            self.endpoint,
            urlencoding::encode(location)
        );
        debug!("fetching weather (url={url})");
        let payload: WttrPayload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        payload.describe()
    }
}

#[async_trait]
impl Skill for WeatherSkill {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Get current weather for any location"
    }

    fn triggers(&self) -> &[&str] {
        TRIGGERS
    }

    async fn execute(&self, utterance: &str) -> Action {
        let location = self.location_for(utterance);
        match self.report(&location).await {
            Ok(sentence) => Action::speak(sentence),
            Err(err) => {
                warn!("weather lookup failed (location={location}): {err}");
                Action::speak(format!("Sorry, I couldn't get the weather: {err}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WttrPayload {
    #[serde(default)]
    current_condition: Vec<CurrentCondition>,
    #[serde(default)]
    nearest_area: Vec<NearestArea>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<TextValue>,
    humidity: String,
}

#[derive(Debug, Deserialize)]
struct NearestArea {
    #[serde(rename = "areaName", default)]
    area_name: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

impl WttrPayload {
    fn describe(&self) -> Result<String, SkillError> {
        let current = self
            .current_condition
            .first()
            .ok_or(SkillError::MissingField("current_condition"))?;
        let description = current
            .weather_desc
            .first()
            .ok_or(SkillError::MissingField("weatherDesc"))?;
        let city = self
            .nearest_area
            .first()
            .and_then(|area| area.area_name.first())
            .ok_or(SkillError::MissingField("nearest_area"))?;
        Ok(format!(
            "In {}, it's currently {}°C ({}°F), {}, with {}% humidity.",
            city.value,
            current.temp_c,
            current.temp_f,
            description.value.to_lowercase(),
            current.humidity
        ))
    }
}
