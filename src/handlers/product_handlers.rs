//! Product resource handlers.

use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::errors::{ApiError, ApiResult};
use crate::models::{ListParams, PageMeta, PagedResponse, ProductBody};
use crate::repository::ProductRepository;
use crate::validation::{parse_id, validate_create, validate_patch, ListQuery};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(list_products)
            .service(get_product)
            .service(create_product)
            .service(update_product)
            .service(delete_product),
    );
}

#[get("")]
async fn list_products(
    repo: web::Data<ProductRepository>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let query = ListQuery::from_params(&params)?;
    let (products, total) = repo.list(&query).await?;

    Ok(HttpResponse::Ok().json(PagedResponse {
        data: products,
        meta: PageMeta::new(&query, total),
    }))
}

#[get("/{id}")]
async fn get_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let product = repo.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(product))
}

#[post("")]
async fn create_product(
    repo: web::Data<ProductRepository>,
    body: web::Json<ProductBody>,
) -> ApiResult<HttpResponse> {
    let new_product = validate_create(&body)?;
    let product = repo.insert(&new_product).await?;

    Ok(HttpResponse::Created().json(product))
}

#[patch("/{id}")]
async fn update_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
    body: web::Json<ProductBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let product_patch = validate_patch(&body)?;
    let product = repo
        .update(id, &product_patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(product))
}

#[delete("/{id}")]
async fn delete_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    if !repo.delete(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}
