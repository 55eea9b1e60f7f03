use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{AirQualitySample, Location, WeatherReading};

use super::ConditionsProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    location: Location,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, location: Location) -> Self {
        Self {
            api_key,
            location,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a local fixture server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let lat = self.location.latitude.to_string();
        let lon = self.location.longitude.to_string();

        debug!(%url, %lat, %lon, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", self.api_key.as_str())])
            .query(extra)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        // Error statuses still carry a JSON body; its shape decides how it is handled.
        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        debug!(%status, body = %truncate_body(&body), "OpenWeather {endpoint} responded");

        serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse OpenWeather {endpoint} JSON (status {status}): {}",
                truncate_body(&body)
            )
        })
    }
}

/// `None` when the payload has no `main` object. Each field inside is read
/// on its own, so one mistyped value does not hide the others.
fn weather_from_payload(payload: &Value) -> Option<WeatherReading> {
    let main = payload.get("main").filter(|main| main.is_object())?;

    Some(WeatherReading {
        temperature_c: main.get("temp").and_then(Value::as_f64),
        humidity_pct: main.get("humidity").and_then(Value::as_f64),
        observed_at: payload.get("dt").and_then(Value::as_i64).and_then(unix_to_utc),
    })
}

/// `None` only when `list` is missing. Only `list[0]` is inspected; any
/// deeper mismatch yields a sample without PM2.5.
fn air_quality_from_payload(payload: &Value) -> Option<AirQualitySample> {
    let first = payload.get("list")?.get(0);

    Some(AirQualitySample {
        pm2_5: first
            .and_then(|entry| entry.get("components"))
            .and_then(|components| components.get("pm2_5"))
            .and_then(Value::as_f64),
        observed_at: first
            .and_then(|entry| entry.get("dt"))
            .and_then(Value::as_i64)
            .and_then(unix_to_utc),
    })
}

#[async_trait]
impl ConditionsProvider for OpenWeatherProvider {
    async fn fetch_weather(&self) -> Result<WeatherReading> {
        let payload = self.get_json("weather", &[("units", "metric")]).await?;

        Ok(weather_from_payload(&payload).unwrap_or_else(|| {
            warn!(payload = %truncate_body(&payload.to_string()), "Weather API response not ready yet");
            WeatherReading::default()
        }))
    }

    async fn fetch_air_quality(&self) -> Result<Option<AirQualitySample>> {
        let payload = self.get_json("air_pollution", &[]).await?;

        let sample = air_quality_from_payload(&payload);
        if sample.is_none() {
            warn!(payload = %truncate_body(&payload.to_string()), "AQI API response not ready yet");
        }

        Ok(sample)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::mpsc,
    };

    /// Serves one canned JSON body per connection, in order, and reports the
    /// request line of every request it receives.
    async fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let request = String::from_utf8_lossy(&request);
                let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{addr}"), rx)
    }

    fn provider(base_url: &str) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".to_string(), Location::default()).with_base_url(base_url)
    }

    #[test]
    fn weather_payload_with_main_is_parsed() {
        let payload = json!({
            "dt": 1_700_000_000,
            "main": { "temp": 12.5, "feels_like": 11.0, "humidity": 81 },
            "name": "Delhi"
        });

        let reading = weather_from_payload(&payload).expect("main is present");
        assert_eq!(reading.temperature_c, Some(12.5));
        assert_eq!(reading.humidity_pct, Some(81.0));
        assert_eq!(reading.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn weather_payload_without_main_is_rejected() {
        let payload = json!({ "cod": 401, "message": "Invalid API key." });
        assert!(weather_from_payload(&payload).is_none());
    }

    #[test]
    fn weather_payload_with_partial_main_keeps_what_is_there() {
        let payload = json!({ "main": { "humidity": 40 } });

        let reading = weather_from_payload(&payload).unwrap();
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.humidity_pct, Some(40.0));
    }

    #[test]
    fn pollution_payload_is_parsed() {
        let payload = json!({
            "coord": { "lon": 77.209, "lat": 28.6139 },
            "list": [{
                "main": { "aqi": 5 },
                "components": { "pm2_5": 182.4, "pm10": 240.1 },
                "dt": 1_700_000_000
            }]
        });

        let sample = air_quality_from_payload(&payload).unwrap();
        assert_eq!(sample.pm2_5, Some(182.4));
        assert!(sample.observed_at.is_some());
    }

    #[test]
    fn pollution_payload_without_list_is_absent() {
        assert!(air_quality_from_payload(&json!({ "cod": 401 })).is_none());
        assert!(air_quality_from_payload(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn pollution_payload_with_unexpected_shape_has_no_pm25() {
        for payload in [
            json!({ "list": [] }),
            json!({ "list": null }),
            json!({ "list": [{ "dt": 1 }] }),
            json!({ "list": [{ "components": { "pm10": 3.0 } }] }),
            json!({ "list": "oops" }),
        ] {
            let sample = air_quality_from_payload(&payload).expect("list key is present");
            assert_eq!(sample.pm2_5, None, "payload: {payload}");
        }
    }

    #[test]
    fn mistyped_timestamp_keeps_weather_readings() {
        let payload = json!({ "main": { "temp": 10.0, "humidity": 80 }, "dt": "soon" });

        let reading = weather_from_payload(&payload).expect("main is present");
        assert_eq!(reading.temperature_c, Some(10.0));
        assert_eq!(reading.humidity_pct, Some(80.0));
        assert_eq!(reading.observed_at, None);
    }

    #[test]
    fn mistyped_temperature_keeps_humidity() {
        let payload = json!({ "main": { "temp": "hot", "humidity": 75 } });

        let reading = weather_from_payload(&payload).unwrap();
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.humidity_pct, Some(75.0));
    }

    #[test]
    fn non_object_main_is_rejected() {
        assert!(weather_from_payload(&json!({ "main": null })).is_none());
        assert!(weather_from_payload(&json!({ "main": "x" })).is_none());
    }

    #[test]
    fn only_first_pollution_entry_matters() {
        let payload = json!({
            "list": [
                { "components": { "pm2_5": 80.0 }, "dt": "later" },
                { "components": "x" },
                42
            ]
        });

        let sample = air_quality_from_payload(&payload).unwrap();
        assert_eq!(sample.pm2_5, Some(80.0));
        assert_eq!(sample.observed_at, None);
    }

    #[test]
    fn truncate_body_is_char_safe() {
        let long = "µ".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn fetches_both_endpoints_with_location_query() {
        let (base, mut requests) = serve(vec![
            (200, json!({ "main": { "temp": 21.5, "humidity": 60 } }).to_string()),
            (200, json!({ "list": [{ "components": { "pm2_5": 48.0 } }] }).to_string()),
        ])
        .await;
        let provider = provider(&base);

        let weather = provider.fetch_weather().await.unwrap();
        let air = provider.fetch_air_quality().await.unwrap();

        assert_eq!(weather.temperature_c, Some(21.5));
        assert_eq!(air.and_then(|a| a.pm2_5), Some(48.0));

        let first = requests.recv().await.unwrap();
        assert!(first.starts_with("GET /weather?"), "{first}");
        assert!(first.contains("lat=28.6139"));
        assert!(first.contains("lon=77.209"));
        assert!(first.contains("appid=KEY"));
        assert!(first.contains("units=metric"));

        let second = requests.recv().await.unwrap();
        assert!(second.starts_with("GET /air_pollution?"), "{second}");
        assert!(!second.contains("units="));
    }

    #[tokio::test]
    async fn unauthorized_responses_degrade_to_missing_data() {
        let unauthorized = json!({ "cod": 401, "message": "Invalid API key." }).to_string();
        let (base, _requests) =
            serve(vec![(401, unauthorized.clone()), (401, unauthorized)]).await;
        let provider = provider(&base);

        assert_eq!(provider.fetch_weather().await.unwrap(), WeatherReading::default());
        assert_eq!(provider.fetch_air_quality().await.unwrap(), None);
    }

    #[tokio::test]
    async fn weather_without_main_adds_no_weather_reasons() {
        use crate::{model::RiskFactor, model::UserTriggers, risk::calculate_risk};

        let body = json!({ "cod": "200", "name": "Delhi" }).to_string();
        let (base, _requests) = serve(vec![(200, body)]).await;

        let weather = provider(&base).fetch_weather().await.unwrap();
        let result = calculate_risk(&weather, None, &UserTriggers::none());

        assert!(weather.is_empty());
        assert!(!result.reasons.contains(&RiskFactor::ColdAir));
        assert!(!result.reasons.contains(&RiskFactor::HighHumidity));
        assert_eq!(result.score, 0);
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let (base, _requests) = serve(vec![(502, "<html>bad gateway</html>".to_string())]).await;

        let err = provider(&base).fetch_weather().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather weather JSON"));
    }

    #[tokio::test]
    async fn connection_failure_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}")).fetch_weather().await.unwrap_err();
        assert!(err.to_string().contains("Failed to send request to OpenWeather"));
    }
}
