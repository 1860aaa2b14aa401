//! Order persistence boundary.
//!
//! This module defines the storage-facing abstraction the intake pipeline talks
//! to, without making any storage assumptions. Two implementations ship with the
//! workspace: an in-memory one (dev/tests, the default) and a Postgres one behind
//! the `postgres` feature.
//!
//! ## Uniqueness
//!
//! Control numbers must be unique across stored orders. The pipeline checks this
//! before saving, but that check races with concurrent submissions, so every
//! implementation must also enforce it atomically inside `save_all` and report a
//! violation as [`RepositoryError::DuplicateControlNumber`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use pedidos_core::DomainError;
use pedidos_orders::{NewOrder, Order};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryOrderRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderRepository;

/// Repository operation error.
///
/// These are **infrastructure errors** as opposed to order rule violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A control number in the batch is already stored (or repeated in the batch).
    #[error("control number already stored: {0}")]
    DuplicateControlNumber(String),

    /// A stored row could not be turned back into an order.
    #[error("stored order is invalid: {0}")]
    Corrupted(#[from] DomainError),

    /// The storage backend failed (connection, query, lock poisoning, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Order storage.
///
/// `save_all` is all-or-nothing: either every order in the batch is stored and
/// returned with its assigned identifier, or nothing is stored.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_control_number(
        &self,
        control_number: &str,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Orders with `start <= registered_at <= end`.
    async fn find_registered_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// Every stored order, by ascending identifier.
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn save_all(&self, orders: Vec<NewOrder>) -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
impl<S> OrderRepository for Arc<S>
where
    S: OrderRepository + ?Sized,
{
    async fn find_by_control_number(
        &self,
        control_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        (**self).find_by_control_number(control_number).await
    }

    async fn find_registered_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Order>, RepositoryError> {
        (**self).find_registered_between(start, end).await
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).find_all().await
    }

    async fn save_all(&self, orders: Vec<NewOrder>) -> Result<Vec<Order>, RepositoryError> {
        (**self).save_all(orders).await
    }
}
