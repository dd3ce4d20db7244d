//! Data access layer.

mod product_repository;

pub use product_repository::ProductRepository;
