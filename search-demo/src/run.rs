//! The demo flow.
//!
//! `run_demo` performs the steps against any [`SearchConnector`];
//! `run_and_close` adds cancellation and guarantees the connector is closed.

use std::future::Future;

use search_demo_repository::{ScrollOutcome, SearchConnector};
use tracing::{info, instrument, warn};

use crate::config::DemoSettings;
use crate::DemoError;

/// What a completed run observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Whether the cluster reported green within the health timeout.
    pub healthy: bool,
    /// `None` when the index already existed, otherwise whether the
    /// creation was acknowledged.
    pub index_created: Option<bool>,
    /// `None` when the index already existed, otherwise whether every
    /// seeded document was indexed.
    pub seeded: Option<bool>,
    pub before: ScrollOutcome,
    pub deleted: u64,
    pub after: ScrollOutcome,
}

impl RunReport {
    pub fn log_summary(&self) {
        info!(
            healthy = self.healthy,
            index_created = ?self.index_created,
            seeded = ?self.seeded,
            hits_before = self.before.hits.len(),
            deleted = self.deleted,
            hits_after = self.after.hits.len(),
            "Run complete"
        );
    }
}

/// Run the demo against `connector`.
///
/// The index is only created and seeded when it does not exist yet. An
/// unhealthy cluster, an unacknowledged creation and a partially failed
/// bulk insert are logged and recorded in the report; the remaining steps
/// still run. Transport and query errors abort the run.
#[instrument(skip_all, fields(index = %settings.index_name, address = %settings.address))]
pub async fn run_demo<C: SearchConnector>(
    connector: &C,
    settings: &DemoSettings,
) -> Result<RunReport, DemoError> {
    let index = settings.index_name.as_str();

    let healthy = connector.health_check().await?;
    if !healthy {
        warn!("Cluster did not report green, continuing anyway");
    }

    let (index_created, seeded) = if connector.index_exists(index).await? {
        (None, None)
    } else {
        let created = connector
            .create_index(
                index,
                settings.number_of_shards,
                settings.number_of_replicas,
            )
            .await?;
        if !created {
            warn!("Index creation was not acknowledged, continuing anyway");
        }

        let seeded = match &settings.data_file {
            Some(path) => {
                info!(path = %path.display(), "Seeding index from file");
                connector
                    .bulk_insert_from_file(index, &settings.index_type, path)
                    .await?
            }
            None => {
                connector
                    .bulk_insert(index, &settings.index_type)
                    .await?
            }
        };
        if !seeded {
            warn!("Bulk insert reported failures, continuing anyway");
        }

        (Some(created), Some(seeded))
    };

    info!(range = %settings.query_range, "Querying before delete");
    let before = connector
        .query_age_range(index, settings.query_range, &settings.scroll)
        .await?;

    let deleted = connector
        .delete_by_field(index, &settings.delete_field, &settings.delete_value)
        .await?;

    info!(range = %settings.query_range, "Querying after delete");
    let after = connector
        .query_age_range(index, settings.query_range, &settings.scroll)
        .await?;

    Ok(RunReport {
        healthy,
        index_created,
        seeded,
        before,
        deleted,
        after,
    })
}

/// Run the demo until it finishes or `shutdown` resolves, then close the
/// connector.
///
/// The connector is closed on every path: success, error and interruption.
pub async fn run_and_close<C, S>(
    connector: C,
    settings: &DemoSettings,
    shutdown: S,
) -> Result<RunReport, DemoError>
where
    C: SearchConnector,
    S: Future<Output = ()>,
{
    let result = tokio::select! {
        result = run_demo(&connector, settings) => result,
        _ = shutdown => {
            warn!("Received shutdown signal, cancelling run");
            Err(DemoError::Interrupted)
        }
    };

    connector.close().await;
    result
}
