//! Seed and cleanup helpers for capture tests

use anyhow::Result;
use db2_cdc_harness_capture::{ControlChannel, TableRegistry};
use tracing::{info, warn};

/// Create a small orders table to register for capture.
pub async fn create_orders_table(channel: &impl ControlChannel, schema: &str) -> Result<()> {
    channel
        .execute(&format!(
            "CREATE TABLE {schema}.ORDERS \
             (ID INT NOT NULL PRIMARY KEY, NAME VARCHAR(255), QUANTITY INT)"
        ))
        .await?;
    Ok(())
}

pub async fn insert_order(
    channel: &impl ControlChannel,
    schema: &str,
    id: i32,
    name: &str,
    quantity: i32,
) -> Result<()> {
    channel
        .execute(&format!(
            "INSERT INTO {schema}.ORDERS (ID, NAME, QUANTITY) VALUES ({id}, '{name}', {quantity})"
        ))
        .await?;
    Ok(())
}

/// Disable capture for and drop every user table in `schema`.
///
/// More aggressive than per-test cleanup to handle contamination from
/// earlier aborted runs: a failed disable is logged and the drop still
/// happens.
pub async fn cleanup_capture_tables<C: ControlChannel>(
    channel: &C,
    registry: &TableRegistry<C>,
    schema: &str,
) -> Result<()> {
    info!("Attempting to drop all tables (if exists)");
    let tables = channel
        .query(&format!(
            "SELECT TABNAME FROM SYSCAT.TABLES WHERE TABSCHEMA = '{schema}'"
        ))
        .await?;

    for table in tables {
        info!("Disabling capture for table {table}");
        if let Err(e) = registry.disable_table(schema, &table).await {
            warn!("Failed to disable capture for {table}: {e}");
        }
        warn!("Dropping table {table}");
        channel
            .execute(&format!("DROP TABLE {schema}.{table}"))
            .await?;
    }

    Ok(())
}
