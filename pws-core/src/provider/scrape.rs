use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use scraper::Html;
use std::time::Duration;

use crate::{
    config::StationConfig,
    enrich::enrich_observation,
    error::FetchError,
    model::{NormalizedObservation, RawObservation, UnitReading},
};

use super::ObservationProvider;

/// Public dashboard page, one per station.
pub const DASHBOARD_URL: &str = "https://www.wunderground.com/dashboard/pws";

// The dashboard serves a stripped page to non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Scraping fetch strategy for stations without API access: fetch the
/// public dashboard page and run a prioritized list of extraction
/// attempts over it. The page structure is not a contract; everything
/// here is best-effort and partial results are acceptable.
#[derive(Debug, Clone)]
pub struct ScrapeProvider {
    config: StationConfig,
    http: Client,
}

impl ScrapeProvider {
    pub fn new(config: StationConfig) -> Self {
        Self { config, http: Client::new() }
    }

    fn page_url(&self) -> String {
        format!("{}/{}", DASHBOARD_URL, self.config.station_id)
    }
}

#[async_trait]
impl ObservationProvider for ScrapeProvider {
    async fn refresh(&self) -> Result<NormalizedObservation, FetchError> {
        let url = self.page_url();
        log::debug!("scraping dashboard page {url}");

        let res = self
            .http
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamHttp(status));
        }

        let body = res.text().await.map_err(FetchError::from_transport)?;
        let mut obs = extract_observation(&body)?;

        if obs.station_id.is_none() {
            obs.station_id = Some(self.config.station_id.clone());
        }
        if obs.location_name.is_none() {
            obs.location_name = Some(self.config.station_id.clone());
        }

        Ok(obs)
    }
}

/// Run the extraction strategies in priority order and return the first
/// one that yields at least one reading. A document where no strategy
/// finds anything is an extraction failure, not an empty success.
pub(crate) fn extract_observation(html: &str) -> Result<NormalizedObservation, FetchError> {
    let strategies: [fn(&str) -> Option<NormalizedObservation>; 2] =
        [extract_embedded_json, extract_labeled_text];

    for strategy in strategies {
        if let Some(obs) = strategy(html) {
            if obs.has_any_reading() {
                return Ok(obs);
            }
        }
    }

    Err(FetchError::Extraction)
}

/// Strategy 1: the dashboard embeds its bootstrap state as JSON, with the
/// same `observations` array the API serves. Locate the array, parse its
/// first element, and reuse the regular enrichment path (metric sub-fields
/// preferred, imperial converted otherwise).
fn extract_embedded_json(html: &str) -> Option<NormalizedObservation> {
    let array = embedded_array(html, "\"observations\"")?;
    let parsed: Vec<RawObservation> = serde_json::from_str(array).ok()?;
    parsed.first().map(enrich_observation)
}

/// Find the JSON array value following `key`, tolerating arbitrary
/// surrounding markup. Bracket matching is string-aware so quoted `]`
/// characters inside the array do not terminate the scan.
fn embedded_array<'a>(html: &'a str, key: &str) -> Option<&'a str> {
    let bytes = html.as_bytes();
    let mut from = 0;

    while let Some(rel) = html[from..].find(key) {
        let mut i = from + rel + key.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b':' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'[' {
                if let Some(end) = matching_bracket(bytes, i) {
                    return Some(&html[i..=end]);
                }
            }
        }
        from += rel + key.len();
    }

    None
}

fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && b == b']' {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Clone, Copy)]
enum Slot {
    Temp,
    Dewpt,
    Humidity,
    WindSpeed,
    WindGust,
    Pressure,
    PrecipRate,
    PrecipTotal,
    Uv,
    Solar,
    Elev,
}

fn label_value_re(label: &str) -> Regex {
    // label, optionally a colon, then up to 40 non-numeric chars before
    // the first numeric token
    Regex::new(&format!(r"(?i){label}\s*:?[^0-9+\-]{{0,40}}(-?[0-9]+(?:\.[0-9]+)?)"))
        .expect("label regex")
}

static LABELS: Lazy<Vec<(Regex, Slot)>> = Lazy::new(|| {
    vec![
        (label_value_re("Temperature"), Slot::Temp),
        (label_value_re("Dew ?Point"), Slot::Dewpt),
        (label_value_re("Humidity"), Slot::Humidity),
        (label_value_re("Wind ?Speed"), Slot::WindSpeed),
        (label_value_re("Wind ?Gust"), Slot::WindGust),
        (label_value_re("Pressure"), Slot::Pressure),
        (label_value_re("Precip\\.? ?Rate"), Slot::PrecipRate),
        (label_value_re("Precip\\.? ?(?:Accum|Total)"), Slot::PrecipTotal),
        (label_value_re("UV(?: ?Index)?"), Slot::Uv),
        (label_value_re("Solar ?Radiation"), Slot::Solar),
        (label_value_re("Elev(?:ation)?"), Slot::Elev),
    ]
});

/// Strategy 2: flatten the document text and pick the first numeric token
/// adjacent to each known label. The public dashboard displays imperial
/// units, so the values feed the same converting enricher as the API path.
fn extract_labeled_text(html: &str) -> Option<NormalizedObservation> {
    let doc = Html::parse_document(html);
    let text = doc.root_element().text().collect::<Vec<_>>().join(" ");

    let mut raw = RawObservation::default();
    let mut imperial = UnitReading::default();
    let mut found = 0usize;

    for (re, slot) in LABELS.iter() {
        let Some(value) = re
            .captures(&text)
            .and_then(|c| c[1].parse::<f64>().ok())
            .filter(|v| v.is_finite())
        else {
            continue;
        };
        found += 1;
        match slot {
            Slot::Temp => imperial.temp = Some(value),
            Slot::Dewpt => imperial.dewpt = Some(value),
            Slot::Humidity => raw.humidity = Some(value),
            Slot::WindSpeed => imperial.wind_speed = Some(value),
            Slot::WindGust => imperial.wind_gust = Some(value),
            Slot::Pressure => imperial.pressure = Some(value),
            Slot::PrecipRate => imperial.precip_rate = Some(value),
            Slot::PrecipTotal => imperial.precip_total = Some(value),
            Slot::Uv => raw.uv = Some(value),
            Slot::Solar => raw.solar_radiation = Some(value),
            Slot::Elev => imperial.elev = Some(value),
        }
    }

    if found == 0 {
        return None;
    }

    raw.imperial = Some(imperial);
    Some(enrich_observation(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBEDDED_PAGE: &str = r#"<html><head>
        <script>window.__STATE__ = {"api":{"observations":[{
            "stationID":"IKAPOS27","neighborhood":"Kaposvár [s]",
            "humidity":60,"winddir":90,"uv":2,"solarRadiation":120.5,
            "imperial":{"temp":68,"dewpt":50,"windSpeed":5,"pressure":29.92}
        }]}};</script>
        </head><body>Loading...</body></html>"#;

    const LABELED_PAGE: &str = r#"<html><body>
        <div class="conditions">
          <span>Temperature</span><b>68.4 &deg;F</b>
          <span>Dew Point</span><b>50.0 &deg;F</b>
          <span>Humidity</span><b>60 %</b>
          <span>Wind Speed</span><b>5.0 mph</b>
          <span>Pressure</span><b>29.92 in</b>
          <span>UV Index</span><b>2</b>
        </div>
      </body></html>"#;

    #[test]
    fn embedded_json_strategy_extracts_and_converts() {
        let obs = extract_observation(EMBEDDED_PAGE).unwrap();
        assert_eq!(obs.station_id.as_deref(), Some("IKAPOS27"));
        assert_eq!(obs.temperature, Some(20.0));
        assert_eq!(obs.dew_point, Some(10.0));
        assert_eq!(obs.wind_speed, Some(8.0));
        assert_eq!(obs.pressure, Some(1013.21));
        assert_eq!(obs.wind_compass, Some("E"));
        assert_eq!(obs.humidity, Some(60.0));
    }

    #[test]
    fn embedded_json_prefers_metric_subfields() {
        let page = r#"<script>{"observations":[{"imperial":{"temp":32},
            "metric":{"temp":19.8}}]}</script>"#;
        let obs = extract_observation(page).unwrap();
        assert_eq!(obs.temperature, Some(19.8));
    }

    #[test]
    fn labeled_text_fallback_reads_imperial_values() {
        let obs = extract_observation(LABELED_PAGE).unwrap();
        assert_eq!(obs.temperature, Some(20.2));
        assert_eq!(obs.dew_point, Some(10.0));
        assert_eq!(obs.humidity, Some(60.0));
        assert_eq!(obs.wind_speed, Some(8.0));
        assert_eq!(obs.pressure, Some(1013.21));
        assert_eq!(obs.uv_index, Some(2.0));
        // derived values come along for free
        assert_eq!(obs.cloud_base, Some(1244.4));
    }

    #[test]
    fn embedded_json_wins_over_labels() {
        let page = r#"<script>{"observations":[{"imperial":{"temp":41}}]}</script>
               <span>Temperature</span> 68 F"#;
        let obs = extract_observation(page).unwrap();
        assert_eq!(obs.temperature, Some(5.0));
    }

    #[test]
    fn quoted_brackets_do_not_end_the_array_scan() {
        let page = r#"{"observations": [{"neighborhood": "roof ]{[ garden",
            "imperial": {"temp": 68}}]}"#;
        let obs = extract_observation(page).unwrap();
        assert_eq!(obs.temperature, Some(20.0));
        assert_eq!(obs.location_name.as_deref(), Some("roof ]{[ garden"));
    }

    #[test]
    fn empty_document_is_an_extraction_failure() {
        let err = extract_observation("<html><body>tumbleweed</body></html>").unwrap_err();
        assert!(matches!(err, FetchError::Extraction));

        // an observations array with no usable reading is a miss too
        let err = extract_observation(r#"{"observations": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::Extraction));
    }

    #[test]
    fn partial_extraction_is_a_success() {
        let obs = extract_observation("<p>Humidity: 55%</p>").unwrap();
        assert_eq!(obs.humidity, Some(55.0));
        assert!(obs.temperature.is_none());
    }
}
