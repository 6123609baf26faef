//! Scripted end-to-end capture scenarios
//!
//! These replay the full sequence a test suite runs against the capture
//! subsystem - service start, table registration, propagation, read-back -
//! against scripted doubles, so the ordering contract holds without a
//! database.

use std::sync::Arc;
use std::time::Duration;

use db2_cdc_harness::capture::testing::ScriptedChannel;
use db2_cdc_harness::capture::{
    statements, CaptureService, CaptureTimings, RegistrationState, TableRegistry,
};
use db2_cdc_harness::convergence::testing::ManualSleeper;
use db2_cdc_harness::convergence::{Outcome, Pause, PropagationDelay};

const SCHEMA: &str = "DB2INST1";
const TABLE: &str = "ORDERS";

fn timings() -> CaptureTimings {
    CaptureTimings {
        poll_interval: Duration::from_secs(1),
        start_attempts: 30,
        snapshot_attempts: 60,
        propagation_delay: Duration::from_secs(15),
    }
}

#[tokio::test]
async fn test_start_then_enable_then_verify_active() {
    tracing_subscriber::fmt()
        .with_env_filter("db2_cdc_harness=debug")
        .try_init()
        .ok();

    let channel = Arc::new(ScriptedChannel::new());
    let sleeper = Arc::new(ManualSleeper::new());

    // Service comes up on the third status poll.
    channel.enqueue_rows(statements::CAPTURE_STATUS, &[]);
    channel.enqueue_rows(statements::CAPTURE_STATUS, &[]);
    channel.enqueue_rows(statements::CAPTURE_STATUS, &["asncap is doing work"]);
    // After enable + propagation, the registration reads active.
    channel.enqueue_rows(&statements::registration_state(SCHEMA, TABLE), &["A"]);

    let service = CaptureService::new(channel.clone(), timings(), sleeper.clone());
    let registry = TableRegistry::new(service.clone());

    // Bring the capture service up.
    assert_eq!(
        service.start().await.unwrap(),
        Outcome::Converged { attempts: 3 }
    );

    // Register the table; the command sequence alone does not make the
    // change observable, so the scenario waits for propagation before
    // trusting any read-back.
    registry.enable_table(SCHEMA, TABLE).await.unwrap();
    assert_eq!(
        PropagationDelay::new(timings().propagation_delay)
            .wait(sleeper.as_ref())
            .await,
        Pause::Elapsed
    );

    let registration = registry.registration(SCHEMA, TABLE).await.unwrap().unwrap();
    assert_eq!(registration.state, RegistrationState::Active);

    // The channel saw: start, add, activate, reinit - in that order.
    assert_eq!(
        channel.executed(),
        vec![
            statements::START_CAPTURE.to_string(),
            statements::add_table(SCHEMA, TABLE),
            statements::set_registration_state(SCHEMA, TABLE, 'A'),
            statements::REINIT_CAPTURE.to_string(),
        ]
    );
    // Two status-poll sleeps plus the propagation delay.
    assert_eq!(
        sleeper.recorded(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_secs(15),
        ]
    );
}

#[tokio::test]
async fn test_activate_round_trip_restores_the_flag() {
    let channel = Arc::new(ScriptedChannel::new());
    let sleeper = Arc::new(ManualSleeper::new());

    // The flag reads inactive before, and inactive again after the
    // round trip.
    channel.enqueue_rows(&statements::registration_state(SCHEMA, TABLE), &["I"]);
    channel.enqueue_rows(&statements::registration_state(SCHEMA, TABLE), &["I"]);

    let registry = TableRegistry::new(CaptureService::new(
        channel.clone(),
        timings(),
        sleeper.clone(),
    ));

    let before = registry.registration(SCHEMA, TABLE).await.unwrap().unwrap();

    registry
        .set_table_active(SCHEMA, TABLE, true)
        .await
        .unwrap();
    registry
        .set_table_active(SCHEMA, TABLE, false)
        .await
        .unwrap();

    let after = registry.registration(SCHEMA, TABLE).await.unwrap().unwrap();
    assert_eq!(before.state, after.state);

    // Each flip paid the full propagation delay.
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_secs(15), Duration::from_secs(15)]
    );
}
