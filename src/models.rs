//! Wire-level and persisted types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{ListQuery, SortColumn, SortDir};

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

/// Raw list-endpoint query parameters, exactly as received.
///
/// Everything is an optional string so that extraction never fails; all
/// parsing and range checking happens in [`ListQuery::from_params`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Request body for create and partial update.
///
/// Both fields are optional at the deserialization layer; the create and
/// patch validators enforce which are required. JSON `null` is treated the
/// same as an absent field, so a column can never be explicitly nulled.
#[derive(Debug, Default, Deserialize)]
pub struct ProductBody {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// A validated create payload. Both fields present and in range.
#[derive(Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

/// A validated partial update. At least one field is `Some`; only `Some`
/// fields are applied, the rest of the row is left untouched.
#[derive(Debug, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Pagination and sort metadata for a list response.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub sort_by: SortColumn,
    pub sort_dir: SortDir,
}

impl PageMeta {
    pub fn new(query: &ListQuery, total: i64) -> Self {
        Self {
            page: query.page,
            per_page: query.per_page,
            total,
            total_pages: total_pages(total, query.per_page),
            sort_by: query.sort_by,
            sort_dir: query.sort_dir,
        }
    }
}

/// An empty result set still reports one page.
fn total_pages(total: i64, per_page: i64) -> i64 {
    ((total + per_page - 1) / per_page).max(1)
}

/// A page of entities plus metadata.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
