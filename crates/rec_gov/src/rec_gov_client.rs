use std::collections::HashMap;
use std::time::Duration;

use campground_scan::{FetchError, MonthFetcher, SiteAvailabilityRecord};
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

/// Default base URL of the recreation.gov internal API
pub const DEFAULT_BASE_URL: &str = "https://www.recreation.gov/api";

/// Configuration for the recreation.gov client
#[derive(Debug, Clone)]
pub struct RecGovConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,

    /// HTTP timeout for a single request (default: 30 seconds)
    pub timeout: Duration,

    /// User agent sent with every request; the API rejects unknown clients
    pub user_agent: String,
}

impl Default for RecGovConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        }
    }
}

/// Client for the recreation.gov month availability endpoint
pub struct RecGovClient {
    client: Client,
    base_url: String,
}

/// Response structure from the recreation.gov month availability API
#[derive(Debug, Deserialize)]
pub struct MonthAvailabilityResponse {
    /// Site id to availability; absent when the facility has no sites that month
    #[serde(default)]
    pub campsites: HashMap<String, CampsiteAvailabilityData>,
}

/// Campsite availability data for one month
#[derive(Debug, Deserialize)]
pub struct CampsiteAvailabilityData {
    /// Date string (`2025-06-01T00:00:00Z`) to status
    #[serde(default)]
    pub availabilities: HashMap<String, String>,

    /// Reservation service, `fcfs` for first-come-first-served sites
    #[serde(rename = "reservationService", default)]
    pub reservation_service: Option<String>,
}

impl RecGovClient {
    /// Create a new recreation.gov API client
    pub fn new(config: Option<RecGovConfig>) -> Result<Self, FetchError> {
        let config = config.unwrap_or_default();

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the month availability document for a facility
    pub fn month_url(&self, facility_id: &str, month: NaiveDate) -> String {
        let start_date = format!("{}T00:00:00.000Z", month.format("%Y-%m-01"));
        format!(
            "{}/camps/availability/campground/{}/month?start_date={}",
            self.base_url,
            urlencoding::encode(facility_id),
            urlencoding::encode(&start_date)
        )
    }

    /// Fetch the site records of one facility for the month starting at `month`
    pub async fn get_month_availability(
        &self,
        facility_id: &str,
        month: NaiveDate,
    ) -> Result<Vec<SiteAvailabilityRecord>, FetchError> {
        let url = self.month_url(facility_id, month);
        debug!("Making request to: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Failed to fetch data for facility {}: {}",
                facility_id, status
            );
            return Err(match status.as_u16() {
                429 => FetchError::RateLimited,
                404 => FetchError::NotFound,
                code => FetchError::HttpStatus(code),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response: {}", e)))?;

        parse_month_payload(&body)
    }
}

#[async_trait::async_trait]
impl MonthFetcher for RecGovClient {
    async fn fetch_month(
        &self,
        facility_id: &str,
        month: NaiveDate,
    ) -> Result<Vec<SiteAvailabilityRecord>, FetchError> {
        self.get_month_availability(facility_id, month).await
    }
}

/// Parse a month availability document into site records
pub fn parse_month_payload(body: &str) -> Result<Vec<SiteAvailabilityRecord>, FetchError> {
    let response: MonthAvailabilityResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedPayload(format!("Failed to parse response: {}", e)))?;

    Ok(response
        .campsites
        .into_iter()
        .map(|(site_id, data)| SiteAvailabilityRecord {
            site_id,
            reservation_service: data.reservation_service,
            availabilities: data.availabilities,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campground_scan::ReservationType;

    use actix_web::{App, HttpResponse, HttpServer, web};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const JUNE_PAYLOAD: &str = r#"{
        "campsites": {
            "001": {
                "campsite_id": "001",
                "loop": "Upper Pines",
                "availabilities": {
                    "2025-06-01T00:00:00Z": "Available",
                    "2025-06-02T00:00:00Z": "Reserved"
                }
            },
            "002": {
                "reservationService": "fcfs",
                "availabilities": {}
            }
        }
    }"#;

    #[test]
    fn test_month_url_encodes_start_date() {
        let client = RecGovClient::new(None).unwrap();
        assert_eq!(
            client.month_url("232447", date("2025-06-01")),
            "https://www.recreation.gov/api/camps/availability/campground/232447/month?start_date=2025-06-01T00%3A00%3A00.000Z"
        );
    }

    #[test]
    fn test_month_url_uses_first_of_month_and_trims_base() {
        let client = RecGovClient::new(Some(RecGovConfig {
            base_url: "http://localhost:9000/api/".to_string(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(
            client.month_url("232447", date("2025-06-17")),
            "http://localhost:9000/api/camps/availability/campground/232447/month?start_date=2025-06-01T00%3A00%3A00.000Z"
        );
    }

    #[test]
    fn test_parse_month_payload() {
        let mut records = parse_month_payload(JUNE_PAYLOAD).unwrap();
        records.sort_by(|a, b| a.site_id.cmp(&b.site_id));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].site_id, "001");
        assert_eq!(records[0].reservation_type(), ReservationType::Online);
        assert_eq!(
            records[0].availabilities.get("2025-06-01T00:00:00Z").map(String::as_str),
            Some("Available")
        );
        assert_eq!(records[1].reservation_type(), ReservationType::Fcfs);
    }

    #[test]
    fn test_parse_missing_campsites_is_empty() {
        assert!(parse_month_payload("{}").unwrap().is_empty());
        assert!(parse_month_payload(r#"{"count": 0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_payload() {
        assert!(matches!(
            parse_month_payload("<html>blocked</html>"),
            Err(FetchError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_month_payload(r#"{"campsites": []}"#),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    async fn month_handler(path: web::Path<String>) -> HttpResponse {
        match path.as_str() {
            "232447" => HttpResponse::Ok()
                .content_type("application/json")
                .body(JUNE_PAYLOAD),
            "429" => HttpResponse::TooManyRequests().finish(),
            "500" => HttpResponse::InternalServerError().finish(),
            _ => HttpResponse::NotFound().finish(),
        }
    }

    #[actix_web::test]
    async fn test_fetch_month_against_local_server() {
        let server = HttpServer::new(|| {
            App::new().route(
                "/api/camps/availability/campground/{id}/month",
                web::get().to(month_handler),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let client = RecGovClient::new(Some(RecGovConfig {
            base_url: format!("http://{}/api", addr),
            ..Default::default()
        }))
        .unwrap();
        let month = date("2025-06-01");

        let records = client.fetch_month("232447", month).await.unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(
            client.fetch_month("429", month).await.unwrap_err(),
            FetchError::RateLimited
        );
        assert_eq!(
            client.fetch_month("500", month).await.unwrap_err(),
            FetchError::HttpStatus(500)
        );
        assert_eq!(
            client.fetch_month("999", month).await.unwrap_err(),
            FetchError::NotFound
        );

        handle.stop(true).await;
    }
}
