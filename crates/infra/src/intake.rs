//! Order intake pipeline (application-level orchestration).
//!
//! ```text
//! Submit(drafts)
//!   ↓  for each draft, in input order, fail fast:
//! 1. Customer code in [1, 10]
//!   ↓
//! 2. Control number not already stored (repository lookup)
//!   ↓
//! 3. Default registration time / quantity, price the line (pure domain)
//!   ↓
//! 4. save_all(batch): atomic, re-checks uniqueness
//! ```
//!
//! Nothing is written unless every draft passed; the repository makes the final
//! write all-or-nothing. The pipeline holds no state of its own besides the
//! repository and a clock.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::{info, warn};

use pedidos_orders::{NewOrder, Order, OrderDraft, OrderError, OrderQuery, day_bounds};

use crate::repository::{OrderRepository, RepositoryError};

/// Source of the registration timestamp used for drafts that carry none.
pub type Clock = fn() -> NaiveDateTime;

/// Wall clock, UTC, without zone, truncated to the microseconds a `TIMESTAMP` column keeps.
pub fn system_clock() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

#[derive(Debug, Error)]
pub enum IntakeError {
    /// An order broke a business rule.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The control number is already stored (or repeated within the batch).
    #[error("Número de controle já cadastrado.")]
    DuplicateControlNumber(String),

    /// Storage failed.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for IntakeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateControlNumber(control_number) => {
                IntakeError::DuplicateControlNumber(control_number)
            }
            other => IntakeError::Repository(other),
        }
    }
}

pub struct OrderIntake<R> {
    repository: R,
    clock: Clock,
}

impl<R> OrderIntake<R>
where
    R: OrderRepository,
{
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, system_clock)
    }

    pub fn with_clock(repository: R, clock: Clock) -> Self {
        Self { repository, clock }
    }

    /// Validate, normalize and price `drafts`, then store them as one batch.
    ///
    /// Returns the stored orders, with identifiers, in input order.
    pub async fn submit(&self, drafts: Vec<OrderDraft>) -> Result<Vec<Order>, IntakeError> {
        let batch_size = drafts.len();
        let mut prepared: Vec<NewOrder> = Vec::with_capacity(batch_size);

        for (index, draft) in drafts.into_iter().enumerate() {
            let new_order = self.prepare(draft).await.inspect_err(|err| {
                warn!(index, batch_size, error = %err, "order batch rejected");
            })?;
            prepared.push(new_order);
        }

        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let saved = self.repository.save_all(prepared).await.map_err(|err| {
            warn!(batch_size, error = %err, "order batch not saved");
            IntakeError::from(err)
        })?;

        info!(batch_size, "order batch saved");
        Ok(saved)
    }

    async fn prepare(&self, draft: OrderDraft) -> Result<NewOrder, IntakeError> {
        draft.customer_code()?;
        let control_number = draft.control_number()?;

        if self
            .repository
            .find_by_control_number(control_number.as_str())
            .await?
            .is_some()
        {
            return Err(IntakeError::DuplicateControlNumber(control_number.into()));
        }

        Ok(draft.into_new_order((self.clock)())?)
    }

    /// Run a query built from optional filters (see [`OrderQuery::from_filters`]).
    pub async fn search(
        &self,
        control_number: Option<String>,
        date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Order>, IntakeError> {
        self.query(OrderQuery::from_filters(control_number, date)).await
    }

    pub async fn query(&self, query: OrderQuery) -> Result<Vec<Order>, IntakeError> {
        let orders = match query {
            OrderQuery::ByControlNumber(control_number) => self
                .repository
                .find_by_control_number(&control_number)
                .await?
                .into_iter()
                .collect(),
            OrderQuery::RegisteredOn(date) => {
                let (start, end) = day_bounds(date);
                self.repository.find_registered_between(start, end).await?
            }
            OrderQuery::All => self.repository.find_all().await?,
        };
        Ok(orders)
    }
}
