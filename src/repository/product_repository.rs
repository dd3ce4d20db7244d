//! Product data access over a shared Postgres pool.
//!
//! All statements use positional `$n` placeholders; user-supplied values are
//! only ever bound, never spliced into the statement text. The one piece of
//! dynamic SQL — the list filter — is assembled from fixed clause fragments,
//! and the ORDER BY column comes from the [`SortColumn`] whitelist.

use sqlx::PgPool;

use crate::models::{NewProduct, Product, ProductPatch};
use crate::validation::ListQuery;

const SELECT_COLUMNS: &str = "id, name, price::FLOAT8 AS price";

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the count + data query pair for a validated list request.
    ///
    /// The two statements share the filter clause but run outside a
    /// transaction; under concurrent writes the total may be stale relative
    /// to the returned page.
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<Product>, i64), sqlx::Error> {
        let (where_sql, bind_count) = filter_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM products{where_sql}");
        let data_sql = format!(
            "SELECT {SELECT_COLUMNS} FROM products{where_sql} \
             ORDER BY {} {} LIMIT ${} OFFSET ${}",
            query.sort_by.as_sql(),
            query.sort_dir.as_sql(),
            bind_count + 1,
            bind_count + 2,
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut data_query = sqlx::query_as::<_, Product>(&data_sql);

        // Binds must follow the placeholder numbering in filter_clause.
        if let Some(name) = &query.name {
            let pattern = format!("%{name}%");
            count_query = count_query.bind(pattern.clone());
            data_query = data_query.bind(pattern);
        }
        if let Some(min) = query.min_price {
            count_query = count_query.bind(min);
            data_query = data_query.bind(min);
        }
        if let Some(max) = query.max_price {
            count_query = count_query.bind(max);
            data_query = data_query.bind(max);
        }

        let total = count_query.fetch_one(&self.pool).await?;
        let products = data_query
            .bind(query.per_page)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((products, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, product: &NewProduct) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await
    }

    /// Applies only the supplied fields; returns `None` when no row matched.
    pub async fn update(
        &self,
        id: i32,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, sqlx::Error> {
        // The patch validator guarantees at least one field is set.
        let (set_sql, bind_count) = patch_clause(patch);
        let sql = format!(
            "UPDATE products SET {set_sql} WHERE id = ${} RETURNING {SELECT_COLUMNS}",
            bind_count + 1
        );

        let mut update_query = sqlx::query_as::<_, Product>(&sql);
        if let Some(name) = &patch.name {
            update_query = update_query.bind(name);
        }
        if let Some(price) = patch.price {
            update_query = update_query.bind(price);
        }

        update_query.bind(id).fetch_optional(&self.pool).await
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Builds the WHERE clause for the filters actually supplied, returning the
/// clause text (leading " WHERE ..." or empty) and the number of placeholders
/// it consumed. Clause order must match the bind order in `list`.
fn filter_clause(query: &ListQuery) -> (String, usize) {
    let mut clauses = Vec::new();
    let mut n = 0;

    if query.name.is_some() {
        n += 1;
        clauses.push(format!("name ILIKE ${n}"));
    }
    if query.min_price.is_some() {
        n += 1;
        clauses.push(format!("price >= ${n}"));
    }
    if query.max_price.is_some() {
        n += 1;
        clauses.push(format!("price <= ${n}"));
    }

    if clauses.is_empty() {
        (String::new(), 0)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), n)
    }
}

/// Builds the SET clause for the fields present in the patch.
fn patch_clause(patch: &ProductPatch) -> (String, usize) {
    let mut sets = Vec::new();
    let mut n = 0;

    if patch.name.is_some() {
        n += 1;
        sets.push(format!("name = ${n}"));
    }
    if patch.price.is_some() {
        n += 1;
        sets.push(format!("price = ${n}"));
    }

    (sets.join(", "), n)
}
