//! Request validation: raw parameters in, typed values or a field-error map out.
//!
//! Malformed input is data, not a fault: every function here returns a
//! `Result` whose error side is the accumulated [`ValidationErrors`] for the
//! whole request. A request either validates wholesale or is rejected
//! wholesale.

use serde::Serialize;

use crate::errors::ValidationErrors;
use crate::models::{ListParams, NewProduct, ProductBody, ProductPatch};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;
pub const MAX_NAME_LEN: usize = 255;

/// Columns permitted in a dynamically built ORDER BY clause.
///
/// This whitelist is the sole defense against caller-controlled statement
/// text: a raw `sort_by` string is resolved to a variant here or the request
/// is rejected, and only [`SortColumn::as_sql`] ever reaches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Name,
    Price,
}

impl SortColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Price => "price",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(SortColumn::Id),
            "name" => Some(SortColumn::Name),
            "price" => Some(SortColumn::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Fully validated list-endpoint parameters.
#[derive(Debug, PartialEq)]
pub struct ListQuery {
    pub page: i64,
    pub per_page: i64,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SortColumn,
    pub sort_dir: SortDir,
}

impl ListQuery {
    /// Saturates rather than overflows: `page` is unbounded above, so a huge
    /// page times `per_page` clamps to `i64::MAX`, which Postgres accepts as
    /// an OFFSET past the end of any result set.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Validates raw query parameters, accumulating every field failure.
    pub fn from_params(params: &ListParams) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        // Absent or unparseable falls back to the default; only a parsed
        // out-of-range value is an error.
        let page = match parse_int(params.page.as_deref()) {
            Some(p) if p < 1 => {
                errors.add("page", "must be an integer of at least 1");
                DEFAULT_PAGE
            }
            Some(p) => p,
            None => DEFAULT_PAGE,
        };

        let per_page = match parse_int(params.per_page.as_deref()) {
            Some(p) if !(1..=MAX_PER_PAGE).contains(&p) => {
                errors.add(
                    "per_page",
                    format!("must be an integer between 1 and {MAX_PER_PAGE}"),
                );
                DEFAULT_PER_PAGE
            }
            Some(p) => p,
            None => DEFAULT_PER_PAGE,
        };

        // Blank filter means no filter.
        let name = params
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let min_price = parse_price_bound(params.min_price.as_deref(), "min_price", &mut errors);
        let max_price = parse_price_bound(params.max_price.as_deref(), "max_price", &mut errors);

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                errors.add("price", "min_price must not exceed max_price");
            }
        }

        let sort_by = match params.sort_by.as_deref().map(str::trim) {
            None | Some("") => SortColumn::Id,
            Some(raw) => SortColumn::parse(raw).unwrap_or_else(|| {
                errors.add("sort_by", "must be one of: id, name, price");
                SortColumn::Id
            }),
        };

        // Permissive by contract: anything that is not "desc" sorts ascending.
        let sort_dir = match params.sort_dir.as_deref().map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        };

        errors.into_result(ListQuery {
            page,
            per_page,
            name,
            min_price,
            max_price,
            sort_by,
            sort_dir,
        })
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).filter(|s| !s.is_empty())?.parse().ok()
}

fn parse_price_bound(
    raw: Option<&str>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        Ok(_) => {
            errors.add(field, "must be a non-negative number");
            None
        }
        Err(_) => {
            errors.add(field, "must be a non-negative number");
            None
        }
    }
}

/// Path id: a positive integer, anything else is a validation failure.
/// A well-formed id that matches no row is a 404; these are never conflated.
pub fn parse_id(raw: &str) -> Result<i32, ValidationErrors> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationErrors::single("id", "must be a positive integer")),
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.add("name", "must not be empty");
        return None;
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        errors.add("name", format!("must be at most {MAX_NAME_LEN} characters"));
        return None;
    }
    Some(trimmed.to_string())
}

fn check_price(price: f64, errors: &mut ValidationErrors) -> Option<f64> {
    if price.is_finite() && price >= 0.0 {
        Some(price)
    } else {
        errors.add("price", "must be a non-negative number");
        None
    }
}

/// Create requires both fields.
pub fn validate_create(body: &ProductBody) -> Result<NewProduct, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match &body.name {
        Some(name) => check_name(name, &mut errors),
        None => {
            errors.add("name", "is required");
            None
        }
    };
    let price = match body.price {
        Some(price) => check_price(price, &mut errors),
        None => {
            errors.add("price", "is required");
            None
        }
    };

    match (name, price) {
        (Some(name), Some(price)) if errors.is_empty() => Ok(NewProduct { name, price }),
        _ => Err(errors),
    }
}

/// Partial update: each supplied field is validated, and at least one of
/// name/price must be supplied.
pub fn validate_patch(body: &ProductBody) -> Result<ProductPatch, ValidationErrors> {
    if body.name.is_none() && body.price.is_none() {
        return Err(ValidationErrors::single(
            "body",
            "at least one of name or price must be provided",
        ));
    }

    let mut errors = ValidationErrors::default();
    let name = body.name.as_deref().and_then(|n| check_name(n, &mut errors));
    let price = body.price.and_then(|p| check_price(p, &mut errors));

    errors.into_result(ProductPatch { name, price })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams::default()
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let query = ListQuery::from_params(&params()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.name, None);
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, None);
        assert_eq!(query.sort_by, SortColumn::Id);
        assert_eq!(query.sort_dir, SortDir::Asc);
    }

    #[test]
    fn test_unparseable_page_falls_back_to_default() {
        let query = ListQuery::from_params(&ListParams {
            page: Some("abc".into()),
            per_page: Some("banana".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
    }

    #[test]
    fn test_page_below_one_is_rejected() {
        let errors = ListQuery::from_params(&ListParams {
            page: Some("0".into()),
            ..params()
        })
        .unwrap_err();
        assert!(errors.get("page").is_some());
    }

    #[test]
    fn test_per_page_bounds() {
        let query = ListQuery::from_params(&ListParams {
            per_page: Some("100".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.per_page, 100);

        for bad in ["0", "101", "-3"] {
            let errors = ListQuery::from_params(&ListParams {
                per_page: Some(bad.into()),
                ..params()
            })
            .unwrap_err();
            assert!(errors.get("per_page").is_some(), "expected error for {bad}");
        }
    }

    #[test]
    fn test_name_filter_is_trimmed_and_blank_means_absent() {
        let query = ListQuery::from_params(&ListParams {
            name: Some("  widget  ".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.name.as_deref(), Some("widget"));

        let query = ListQuery::from_params(&ListParams {
            name: Some("   ".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.name, None);
    }

    #[test]
    fn test_price_bounds_must_be_non_negative_numbers() {
        let errors = ListQuery::from_params(&ListParams {
            min_price: Some("-1".into()),
            max_price: Some("cheap".into()),
            ..params()
        })
        .unwrap_err();
        assert!(errors.get("min_price").is_some());
        assert!(errors.get("max_price").is_some());
    }

    #[test]
    fn test_inverted_price_range_reports_under_price() {
        let errors = ListQuery::from_params(&ListParams {
            min_price: Some("10".into()),
            max_price: Some("5".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(errors.get("price"), Some("min_price must not exceed max_price"));
    }

    #[test]
    fn test_sort_by_outside_whitelist_is_rejected() {
        let errors = ListQuery::from_params(&ListParams {
            sort_by: Some("created_at; DROP TABLE products".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(errors.get("sort_by"), Some("must be one of: id, name, price"));
    }

    #[test]
    fn test_sort_dir_is_permissive() {
        for (raw, expected) in [
            ("desc", SortDir::Desc),
            ("DESC", SortDir::Desc),
            ("asc", SortDir::Asc),
            ("banana", SortDir::Asc),
            ("", SortDir::Asc),
        ] {
            let query = ListQuery::from_params(&ListParams {
                sort_dir: Some(raw.into()),
                ..params()
            })
            .unwrap();
            assert_eq!(query.sort_dir, expected, "sort_dir={raw}");
        }
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let errors = ListQuery::from_params(&ListParams {
            page: Some("-1".into()),
            per_page: Some("500".into()),
            min_price: Some("oops".into()),
            sort_by: Some("color".into()),
            ..params()
        })
        .unwrap_err();
        assert!(errors.get("page").is_some());
        assert!(errors.get("per_page").is_some());
        assert!(errors.get("min_price").is_some());
        assert!(errors.get("sort_by").is_some());
    }

    #[test]
    fn test_offset() {
        let query = ListQuery::from_params(&ListParams {
            page: Some("3".into()),
            per_page: Some("25".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        let query = ListQuery::from_params(&ListParams {
            page: Some(i64::MAX.to_string()),
            per_page: Some("100".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.offset(), i64::MAX);

        // Largest page that still multiplies exactly.
        let query = ListQuery::from_params(&ListParams {
            page: Some((i64::MAX / 100).to_string()),
            per_page: Some("100".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.offset(), (i64::MAX / 100 - 1) * 100);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id(" 7 "), Ok(7));
        for bad in ["abc", "0", "-5", "1.5", ""] {
            assert!(parse_id(bad).is_err(), "expected rejection of {bad:?}");
        }
    }

    #[test]
    fn test_create_requires_both_fields() {
        let errors = validate_create(&ProductBody::default()).unwrap_err();
        assert_eq!(errors.get("name"), Some("is required"));
        assert_eq!(errors.get("price"), Some("is required"));
    }

    #[test]
    fn test_create_valid_body_is_trimmed() {
        let product = validate_create(&ProductBody {
            name: Some("  Widget ".into()),
            price: Some(9.99),
        })
        .unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
    }

    #[test]
    fn test_create_rejects_blank_long_name_and_negative_price() {
        let errors = validate_create(&ProductBody {
            name: Some("   ".into()),
            price: Some(-1.0),
        })
        .unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("price").is_some());

        let long = "x".repeat(MAX_NAME_LEN + 1);
        let errors = validate_create(&ProductBody {
            name: Some(long),
            price: Some(1.0),
        })
        .unwrap_err();
        assert!(errors.get("name").is_some());

        // Exactly at the limit is fine.
        let at_limit = "x".repeat(MAX_NAME_LEN);
        assert!(validate_create(&ProductBody {
            name: Some(at_limit),
            price: Some(1.0),
        })
        .is_ok());
    }

    #[test]
    fn test_patch_requires_at_least_one_field() {
        let errors = validate_patch(&ProductBody::default()).unwrap_err();
        assert!(errors.get("body").is_some());
    }

    #[test]
    fn test_patch_with_single_field() {
        let patch = validate_patch(&ProductBody {
            name: None,
            price: Some(5.0),
        })
        .unwrap();
        assert_eq!(patch, ProductPatch { name: None, price: Some(5.0) });
    }

    #[test]
    fn test_patch_validates_supplied_fields() {
        let errors = validate_patch(&ProductBody {
            name: Some("".into()),
            price: Some(f64::NAN),
        })
        .unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("price").is_some());
    }
}
