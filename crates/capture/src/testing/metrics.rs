//! Scripted metrics endpoint.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{MetricsEndpoint, MetricsError};

enum Reading {
    NotFound,
    Value(bool),
    Error(String),
}

/// Metrics endpoint replaying a fixed sequence of readings for whatever
/// attribute is asked of it. Once the script runs dry it keeps reporting
/// false.
#[derive(Default)]
pub struct ScriptedMetrics {
    readings: Mutex<VecDeque<Reading>>,
}

impl ScriptedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// The endpoint does not exist yet on this reading.
    pub fn push_not_found(&self) {
        self.readings.lock().unwrap().push_back(Reading::NotFound);
    }

    pub fn push_reading(&self, value: bool) {
        self.readings
            .lock()
            .unwrap()
            .push_back(Reading::Value(value));
    }

    /// A non-transient failure on this reading.
    pub fn push_error(&self, message: &str) {
        self.readings
            .lock()
            .unwrap()
            .push_back(Reading::Error(message.to_string()));
    }
}

#[async_trait]
impl MetricsEndpoint for ScriptedMetrics {
    async fn boolean_attribute(
        &self,
        endpoint: &str,
        attribute: &str,
    ) -> Result<bool, MetricsError> {
        match self.readings.lock().unwrap().pop_front() {
            Some(Reading::NotFound) => Err(MetricsError::EndpointNotFound(endpoint.to_string())),
            Some(Reading::Value(value)) => Ok(value),
            Some(Reading::Error(message)) => Err(MetricsError::Attribute {
                endpoint: endpoint.to_string(),
                attribute: attribute.to_string(),
                message,
            }),
            None => Ok(false),
        }
    }
}
