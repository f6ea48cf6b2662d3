//! Persistence layer.
//!
//! `store` defines the `RecordStore` contract every component depends on, `record` is its
//! SeaORM implementation over the `record` table, and `resource` layers typed access to
//! `Resource` entities on top of any store.

pub mod record;
pub mod resource;
pub mod store;

#[cfg(test)]
pub(crate) mod test;
