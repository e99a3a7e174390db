// OneHand Public Name APIs
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Fallback source: agify (age), nationalize (origin) and genderize (gender),
// queried concurrently. Each endpoint contributes its field or nothing.

use serde_json::Value;
use tracing::{debug, warn};

use super::countries::country_name;
use super::profile::{format_percent, normalize_name, NameEstimate};

#[derive(Debug, Clone)]
pub struct PublicApiUrls {
    pub age: String,
    pub origin: String,
    pub gender: String,
}

impl Default for PublicApiUrls {
    fn default() -> Self {
        Self {
            age: "https://api.agify.io/".to_string(),
            origin: "https://api.nationalize.io/".to_string(),
            gender: "https://api.genderize.io/".to_string(),
        }
    }
}

pub struct PublicNameApis {
    client: reqwest::Client,
    urls: PublicApiUrls,
}

impl PublicNameApis {
    pub fn new(urls: PublicApiUrls) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls,
        }
    }

    pub async fn estimate(&self, name: &str) -> NameEstimate {
        let (age, origin, gender) = tokio::join!(
            self.fetch(&self.urls.age, name),
            self.fetch(&self.urls.origin, name),
            self.fetch(&self.urls.gender, name),
        );

        let mut estimate = NameEstimate {
            name: name.to_string(),
            ..Default::default()
        };

        if let Some(body) = age {
            estimate.age_prediction = parse_age(&body);
        }
        if let Some(body) = origin {
            estimate.origin = parse_origin(&body);
        }
        if let Some(body) = gender {
            if let Some((gender, probability)) = parse_gender(&body) {
                estimate.gender = Some(gender);
                estimate.gender_probability = Some(probability);
            }
        }

        estimate
    }

    /// GET `<base>?name=<name>`; any transport error, non-200 or bad JSON yields `None`.
    async fn fetch(&self, base: &str, name: &str) -> Option<Value> {
        let resp = match self.client.get(base).query(&[("name", name)]).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("[NAMES] {} unreachable: {}", base, e);
                return None;
            }
        };

        if resp.status() != reqwest::StatusCode::OK {
            debug!("[NAMES] {} answered {}", base, resp.status());
            return None;
        }

        match resp.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!("[NAMES] {} returned invalid JSON: {}", base, e);
                None
            }
        }
    }
}

fn percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

pub fn parse_age(body: &Value) -> Option<u32> {
    body.get("age")?.as_u64().and_then(|a| u32::try_from(a).ok())
}

/// Top country as `"<Country> (confidence: P%)"`.
pub fn parse_origin(body: &Value) -> Option<String> {
    let top = body.get("country")?.as_array()?.first()?;
    let code = top.get("country_id")?.as_str()?;
    let probability = top.get("probability").and_then(Value::as_f64).unwrap_or(0.0);

    let label = country_name(code).unwrap_or(code);
    Some(format!("{} (confidence: {}%)", label, format_percent(percent(probability))))
}

/// Title-cased gender with its probability as a percentage.
pub fn parse_gender(body: &Value) -> Option<(String, f64)> {
    let gender = body.get("gender")?.as_str()?;
    let probability = body.get("probability").and_then(Value::as_f64).unwrap_or(0.0);
    Some((normalize_name(gender), percent(probability)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age(&json!({ "name": "juan", "age": 52, "count": 10 })), Some(52));
        assert_eq!(parse_age(&json!({ "name": "zzz", "age": null })), None);
        assert_eq!(parse_age(&json!({})), None);
    }

    #[test]
    fn test_parse_origin_uses_top_country() {
        let body = json!({
            "name": "dela cruz",
            "country": [
                { "country_id": "PH", "probability": 0.87654 },
                { "country_id": "US", "probability": 0.05 }
            ]
        });
        assert_eq!(
            parse_origin(&body).as_deref(),
            Some("Philippines (confidence: 87.65%)")
        );
    }

    #[test]
    fn test_parse_origin_unknown_code_and_empty_list() {
        let body = json!({ "country": [{ "country_id": "XK", "probability": 0.5 }] });
        assert_eq!(parse_origin(&body).as_deref(), Some("XK (confidence: 50.0%)"));
        assert_eq!(parse_origin(&json!({ "country": [] })), None);
    }

    #[test]
    fn test_parse_gender() {
        let body = json!({ "name": "maria", "gender": "female", "probability": 0.98 });
        assert_eq!(parse_gender(&body), Some(("Female".to_string(), 98.0)));
        assert_eq!(parse_gender(&json!({ "gender": null })), None);
    }
}
