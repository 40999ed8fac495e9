//! Persistence model for the product catalog: the SeaORM `product` entity,
//! field rules shared by every layer, and connection helpers.

pub mod errors;
pub mod db;
pub mod product;

#[cfg(test)]
mod tests;
