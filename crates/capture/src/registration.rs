//! Table registration management.
//!
//! "Known to capture" (ADDTABLE/REMOVETABLE) and "currently capturing"
//! (the STATE flag in IBMSNAP_REGISTER) are independent states in the
//! external system. This module keeps them as separate primitives so a
//! registered-but-inactive table stays observable instead of being hidden
//! behind a combined operation.

use convergence::{Pause, PropagationDelay};
use tracing::info;

use crate::{statements, CaptureError, CaptureService, ControlChannel};

/// Activation flag mirrored from `IBMSNAP_REGISTER.STATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Active,
    Inactive,
}

impl RegistrationState {
    fn flag(self) -> char {
        match self {
            RegistrationState::Active => 'A',
            RegistrationState::Inactive => 'I',
        }
    }

    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "A" => Some(RegistrationState::Active),
            "I" => Some(RegistrationState::Inactive),
            _ => None,
        }
    }
}

/// A registration row read back from the external registration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegistration {
    pub schema: String,
    pub table: String,
    pub state: RegistrationState,
}

/// Enables and disables capture for individual (schema, table) pairs.
///
/// Every operation requests a transition and triggers a service refresh.
/// Except for [`TableRegistry::set_table_active`], waiting for the change
/// to propagate is the caller's responsibility.
pub struct TableRegistry<C> {
    service: CaptureService<C>,
}

impl<C: ControlChannel> TableRegistry<C> {
    pub fn new(service: CaptureService<C>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CaptureService<C> {
        &self.service
    }

    /// Register a table for capture and mark it active.
    pub async fn enable_table(&self, schema: &str, table: &str) -> Result<(), CaptureError> {
        statements::validate_identifier(schema)?;
        statements::validate_identifier(table)?;

        let channel = self.service.channel();
        channel
            .execute(&statements::add_table(schema, table))
            .await?;
        // Idempotent: a second enable is a no-op on the flag.
        channel
            .execute(&statements::set_registration_state(
                schema,
                table,
                RegistrationState::Active.flag(),
            ))
            .await?;
        self.service.refresh().await?;
        info!("capture enabled for {schema}.{table}");
        Ok(())
    }

    /// Remove a table from capture.
    pub async fn disable_table(&self, schema: &str, table: &str) -> Result<(), CaptureError> {
        statements::validate_identifier(schema)?;
        statements::validate_identifier(table)?;

        self.service
            .channel()
            .execute(&statements::remove_table(schema, table))
            .await?;
        self.service.refresh().await?;
        info!("capture disabled for {schema}.{table}");
        Ok(())
    }

    /// Flip only the activation flag of an already-registered table,
    /// refresh, and sit out the propagation delay.
    ///
    /// Returns the [`Pause`] so an interrupted wait stays visible: after
    /// `Pause::Interrupted` the external state is indeterminate.
    pub async fn set_table_active(
        &self,
        schema: &str,
        table: &str,
        active: bool,
    ) -> Result<Pause, CaptureError> {
        statements::validate_identifier(schema)?;
        statements::validate_identifier(table)?;

        let state = if active {
            RegistrationState::Active
        } else {
            RegistrationState::Inactive
        };
        self.service
            .channel()
            .execute(&statements::set_registration_state(
                schema,
                table,
                state.flag(),
            ))
            .await?;
        self.service.refresh().await?;
        info!("{schema}.{table} registration set {state:?}");

        Ok(
            PropagationDelay::new(self.service.timings().propagation_delay)
                .wait(self.service.sleeper())
                .await,
        )
    }

    /// Read back the registration row, if the table is known to capture.
    pub async fn registration(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Option<TableRegistration>, CaptureError> {
        statements::validate_identifier(schema)?;
        statements::validate_identifier(table)?;

        let rows = self
            .service
            .channel()
            .query(&statements::registration_state(schema, table))
            .await?;
        Ok(rows
            .first()
            .and_then(|flag| RegistrationState::from_flag(flag))
            .map(|state| TableRegistration {
                schema: schema.to_string(),
                table: table.to_string(),
                state,
            }))
    }

    /// The change-data table backing a registered source table, as
    /// `CD_OWNER.CD_TABLE`.
    pub async fn change_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Option<String>, CaptureError> {
        statements::validate_identifier(schema)?;
        statements::validate_identifier(table)?;

        let rows = self
            .service
            .channel()
            .query(&statements::change_table_name(schema, table))
            .await?;
        Ok(rows.into_iter().next())
    }
}
