use std::sync::Arc;

use chrono::NaiveDate;

use pedidos_infra::{InMemoryOrderRepository, IntakeError, OrderIntake, StorageConfig};
#[cfg(feature = "postgres")]
use pedidos_infra::PostgresOrderRepository;
use pedidos_orders::{Order, OrderDraft};

type InMemoryIntake = OrderIntake<Arc<InMemoryOrderRepository>>;

#[cfg(feature = "postgres")]
type PersistentIntake = OrderIntake<Arc<PostgresOrderRepository>>;

/// The intake pipeline, over whichever storage the configuration selected.
#[derive(Clone)]
pub enum AppServices {
    InMemory { intake: Arc<InMemoryIntake> },
    #[cfg(feature = "postgres")]
    Persistent { intake: Arc<PersistentIntake> },
}

pub async fn build_services(storage: &StorageConfig) -> anyhow::Result<AppServices> {
    match storage {
        StorageConfig::InMemory => Ok(build_in_memory_services()),
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => build_persistent_services(database_url, *max_connections).await,
    }
}

pub fn build_in_memory_services() -> AppServices {
    tracing::info!("using in-memory order storage");
    let repository = Arc::new(InMemoryOrderRepository::new());
    AppServices::InMemory {
        intake: Arc::new(OrderIntake::new(repository)),
    }
}

#[cfg(feature = "postgres")]
async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<AppServices> {
    tracing::info!(max_connections, "using postgres order storage");
    let repository = PostgresOrderRepository::connect(database_url, max_connections).await?;
    repository.ensure_schema().await?;
    Ok(AppServices::Persistent {
        intake: Arc::new(OrderIntake::new(Arc::new(repository))),
    })
}

#[cfg(not(feature = "postgres"))]
async fn build_persistent_services(
    _database_url: &str,
    _max_connections: u32,
) -> anyhow::Result<AppServices> {
    anyhow::bail!("USE_PERSISTENT_STORES=true but this build has no `postgres` feature")
}

impl AppServices {
    pub async fn submit(&self, drafts: Vec<OrderDraft>) -> Result<Vec<Order>, IntakeError> {
        match self {
            AppServices::InMemory { intake } => intake.submit(drafts).await,
            #[cfg(feature = "postgres")]
            AppServices::Persistent { intake } => intake.submit(drafts).await,
        }
    }

    pub async fn search(
        &self,
        control_number: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Order>, IntakeError> {
        match self {
            AppServices::InMemory { intake } => intake.search(control_number, date).await,
            #[cfg(feature = "postgres")]
            AppServices::Persistent { intake } => intake.search(control_number, date).await,
        }
    }
}
