//! Db2 capture lifecycle E2E test
//!
//! Runs the whole lifecycle against a real Db2 container with the ASN
//! capture scripts installed: bring the capture service up, register a
//! table, wait out propagation, verify the registration, flip it off and
//! on, and tear everything down.
//!
//! Ignored by default because it needs docker and a Db2 image; point
//! `DB2_CDC_CONTAINER` at a running container and run with
//! `cargo test -- --ignored`.

use std::sync::Arc;

use db2_cdc_harness::capture::{
    CaptureService, CaptureServiceState, CaptureTimings, RegistrationState, TableRegistry,
};
use db2_cdc_harness::convergence::{Outcome, Pause, TokioSleeper};
use db2_cdc_harness::testing::{tables, Db2Container};

const SCHEMA: &str = "DB2INST1";

#[tokio::test]
#[ignore = "requires docker and a Db2 container with the ASN capture scripts"]
async fn test_db2_capture_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("db2_cdc_harness=debug")
        .try_init()
        .ok();

    let container = match std::env::var("DB2_CDC_CONTAINER") {
        Ok(name) => Db2Container::attach(&name),
        Err(_) => {
            let container = Db2Container::new("db2-cdc-harness-e2e", 50000);
            container.start()?;
            container
        }
    };
    // Db2 instance creation is slow on a cold image.
    container.wait_until_ready(600).await?;

    let channel = Arc::new(container.channel());
    let service = CaptureService::new(
        channel.clone(),
        CaptureTimings::default(),
        Arc::new(TokioSleeper),
    );
    let registry = TableRegistry::new(service.clone());

    // Clean out anything a previous aborted run left behind.
    tables::cleanup_capture_tables(channel.as_ref(), &registry, SCHEMA).await?;
    tables::create_orders_table(channel.as_ref(), SCHEMA).await?;

    // Bring the capture service up and confirm it is observable as running.
    assert!(matches!(
        service.start().await?,
        Outcome::Converged { .. }
    ));
    assert_eq!(service.status().await?, CaptureServiceState::Running);

    // Register the table, wait out propagation, then trust the read-back.
    registry.enable_table(SCHEMA, "ORDERS").await?;
    assert_eq!(service.refresh_and_wait().await?, Pause::Elapsed);

    let registration = registry
        .registration(SCHEMA, "ORDERS")
        .await?
        .expect("ORDERS should be registered");
    assert_eq!(registration.state, RegistrationState::Active);
    assert!(registry.change_table(SCHEMA, "ORDERS").await?.is_some());

    // Captured changes flow into the change table while active.
    tables::insert_order(channel.as_ref(), SCHEMA, 1, "widget", 3).await?;

    // Flip the registration off and back on.
    assert_eq!(
        registry.set_table_active(SCHEMA, "ORDERS", false).await?,
        Pause::Elapsed
    );
    assert_eq!(
        registry
            .registration(SCHEMA, "ORDERS")
            .await?
            .expect("ORDERS should still be registered")
            .state,
        RegistrationState::Inactive
    );
    assert_eq!(
        registry.set_table_active(SCHEMA, "ORDERS", true).await?,
        Pause::Elapsed
    );

    // Tear down: deregister, drop, stop the service.
    registry.disable_table(SCHEMA, "ORDERS").await?;
    tables::cleanup_capture_tables(channel.as_ref(), &registry, SCHEMA).await?;
    service.stop().await?;

    Ok(())
}
