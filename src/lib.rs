//! CRUD HTTP API over a Postgres `products` table.
//!
//! List/filter/sort/paginate, fetch-by-id, create, partial update, and
//! delete, plus health and cookie demo endpoints. Untrusted query parameters
//! are validated into typed values before any SQL is assembled; sortable
//! columns come from a fixed whitelist and every user value is bound
//! positionally.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod validation;

use actix_web::web;

use errors::{ApiError, ValidationErrors};
use handlers::{product_handlers, system_handlers};
use repository::ProductRepository;

/// Wires routes, JSON handling, and the 404 fallback onto an `App`.
/// Shared between the server binary and the integration tests.
pub fn configure_app(
    repo: web::Data<ProductRepository>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(repo)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                // Malformed body is client data, same taxonomy as any other
                // validation failure.
                ApiError::Validation(ValidationErrors::single("body", err.to_string())).into()
            }))
            .configure(system_handlers::configure)
            .configure(product_handlers::configure)
            .default_service(web::route().to(system_handlers::not_found));
    }
}
