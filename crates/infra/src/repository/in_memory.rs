use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use pedidos_core::OrderId;
use pedidos_orders::{NewOrder, Order};

use super::{OrderRepository, RepositoryError};

#[derive(Debug, Default)]
struct State {
    /// Insertion order == ascending id.
    rows: Vec<Order>,
    last_id: i64,
}

/// In-memory order store.
///
/// Intended for tests/dev. Lookups are linear scans.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    state: RwLock<State>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Backend("lock poisoned".to_string())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_control_number(
        &self,
        control_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .rows
            .iter()
            .find(|o| o.control_number().as_str() == control_number)
            .cloned())
    }

    async fn find_registered_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .rows
            .iter()
            .filter(|o| (start..=end).contains(&o.registered_at()))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.rows.clone())
    }

    async fn save_all(&self, orders: Vec<NewOrder>) -> Result<Vec<Order>, RepositoryError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        // Check the whole batch before touching anything.
        let mut seen: HashSet<&str> = state
            .rows
            .iter()
            .map(|o| o.control_number().as_str())
            .collect();
        for order in &orders {
            if !seen.insert(order.control_number.as_str()) {
                return Err(RepositoryError::DuplicateControlNumber(
                    order.control_number.to_string(),
                ));
            }
        }

        let mut next = state.last_id + 1;
        let mut saved = Vec::with_capacity(orders.len());
        for order in orders {
            saved.push(order.into_order(OrderId::from_i64(next)));
            next += 1;
        }

        state.last_id = next - 1;
        state.rows.extend(saved.iter().cloned());
        Ok(saved)
    }
}
