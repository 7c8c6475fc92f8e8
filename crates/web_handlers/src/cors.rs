use actix_web::{HttpResponse, middleware::DefaultHeaders};

/// Headers allowing browsers on any origin to call the API
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Answers CORS preflight requests; the allow headers come from [`cors_headers`]
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Max-Age", "86400"))
        .finish()
}
