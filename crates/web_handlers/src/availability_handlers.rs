use actix_web::{HttpResponse, Result, http::Method, web};
use campground_scan::AvailabilityAggregator;

use crate::availability_types::*;
use crate::cors::preflight;

/// Checks availability of the requested campgrounds over the requested dates.
/// Per-campground failures are reported inline; only invalid input fails the request.
pub async fn check_availability(
    aggregator: web::Data<AvailabilityAggregator>,
    request: web::Json<CheckAvailabilityRequest>,
) -> Result<HttpResponse, ApiError> {
    let query = request.into_inner().into_query()?;

    log::info!(
        "🏕️ Checking {} campground(s) for {}",
        query.campgrounds.len(),
        query.range
    );

    let aggregate = aggregator
        .check_many(&query.campgrounds, &query.range)
        .await;

    Ok(HttpResponse::Ok().json(CheckAvailabilityResponse::from_aggregate(
        aggregate,
        query.group_by,
    )))
}

/// Validates a date selection without checking availability
pub async fn update_dates(
    request: web::Json<UpdateDatesRequest>,
) -> Result<HttpResponse, ApiError> {
    let range = request.into_inner().into_range()?;
    log::debug!("Dates accepted: {}", range);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Dates updated successfully"
    })))
}

/// Lists the campgrounds of the configured directory
pub async fn list_campgrounds(aggregator: web::Data<AvailabilityAggregator>) -> HttpResponse {
    let campgrounds: Vec<serde_json::Value> = aggregator
        .directory()
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "count": campgrounds.len(),
        "campgrounds": campgrounds
    }))
}

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// JSON extractor settings turning unreadable bodies into [`ApiError::MalformedBody`]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::MalformedBody(err.to_string()).into())
}

/// Registers the availability routes, both at the root and under `/api`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/check_availability", web::post().to(check_availability))
        .route("/check_availability", web::method(Method::OPTIONS).to(preflight))
        .route("/update_dates", web::post().to(update_dates))
        .route("/update_dates", web::method(Method::OPTIONS).to(preflight))
        .service(
            web::scope("/api")
                .route("/check_availability", web::post().to(check_availability))
                .route("/check_availability", web::method(Method::OPTIONS).to(preflight))
                .route("/update_dates", web::post().to(update_dates))
                .route("/update_dates", web::method(Method::OPTIONS).to(preflight))
                .route("/campgrounds", web::get().to(list_campgrounds)),
        );
}
