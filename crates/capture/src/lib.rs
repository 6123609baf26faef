//! Db2 ASN capture service control for db2-cdc-harness
//!
//! The ASN capture service runs out of process: enabling or disabling
//! capture, registering tables, and propagating captured changes all happen
//! on their own timelines. Every control operation in this crate therefore
//! returns before the external state has caught up, and pairs with a wait
//! from the `convergence` crate before a caller may treat it as complete.
//!
//! The crate is split along the external system's own seams:
//!
//! - [`ControlChannel`] - the consumed statement-execution interface, with
//!   a [`DockerChannel`] implementation that drives the db2 CLI inside a
//!   container and a scripted double in [`testing`]
//! - [`CaptureService`] - start/stop/status/refresh of the whole-database
//!   capture service
//! - [`TableRegistry`] - per-table registration and activation, kept as
//!   separate primitives because the external system treats "known to
//!   capture" and "currently capturing" as independent states
//! - [`wait_for_snapshot_completed`] - the initial-snapshot wait, observed
//!   through an external metrics endpoint

mod channel;
mod config;
mod docker;
mod error;
mod registration;
mod service;
mod snapshot;
pub mod statements;
pub mod testing;

pub use channel::{CommandError, ControlChannel};
pub use config::CaptureTimings;
pub use docker::DockerChannel;
pub use error::CaptureError;
pub use registration::{RegistrationState, TableRegistration, TableRegistry};
pub use service::{CaptureService, CaptureServiceState};
pub use snapshot::{
    snapshot_endpoint, wait_for_snapshot_completed, MetricsEndpoint, MetricsError,
    SNAPSHOT_COMPLETED_ATTRIBUTE,
};
pub use statements::validate_identifier;
