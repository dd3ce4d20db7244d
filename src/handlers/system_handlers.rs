//! Health, cookie demo, and fallback handlers.

use actix_web::{cookie::Cookie, get, web, HttpRequest, HttpResponse};
use serde_json::json;

const DEMO_COOKIE: &str = "demo";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(set_cookie).service(read_cookie);
}

#[get("/")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Server is running",
    }))
}

#[get("/set-cookie")]
async fn set_cookie() -> HttpResponse {
    let cookie = Cookie::build(DEMO_COOKIE, "hello").path("/").finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "status": "cookie set" }))
}

#[get("/read-cookie")]
async fn read_cookie(req: HttpRequest) -> HttpResponse {
    let value = req.cookie(DEMO_COOKIE).map(|c| c.value().to_string());

    HttpResponse::Ok().json(json!({ "demo": value }))
}

/// Fallback for any unmatched route.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Not Found" }))
}
