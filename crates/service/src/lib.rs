//! Service layer providing the product catalog's business operations on top of models.
//! - Separates business logic from data access through [`product::repository::ProductRepository`].
//! - Reuses validation and entity definitions in `models` crate.
//! - Enforces the unique `(name, description)` rule before touching storage.

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test_support;
