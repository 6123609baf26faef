//! Scripted control channel.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{CommandError, ControlChannel};

/// Control channel that records executed statements and replays queued
/// query responses, FIFO per statement text.
///
/// A query with no queued response returns no rows, which the status
/// mapping reads as "starting" - convenient for scripts that only care
/// about the tail of a poll sequence. Statements queued with
/// `enqueue_execute_error` fail by substring match against the next
/// matching `execute` call.
#[derive(Default)]
pub struct ScriptedChannel {
    executed: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<(String, Result<Vec<String>, CommandError>)>>,
    execute_errors: Mutex<VecDeque<(String, String)>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next query matching `statement` exactly.
    pub fn enqueue_rows(&self, statement: &str, rows: &[&str]) {
        self.responses.lock().unwrap().push_back((
            statement.to_string(),
            Ok(rows.iter().map(|r| r.to_string()).collect()),
        ));
    }

    /// Queue a failure for the next query matching `statement` exactly.
    pub fn enqueue_query_error(&self, statement: &str, message: &str) {
        self.responses.lock().unwrap().push_back((
            statement.to_string(),
            Err(CommandError::new(statement, message)),
        ));
    }

    /// Fail the next `execute` whose statement contains `fragment`.
    pub fn enqueue_execute_error(&self, fragment: &str, message: &str) {
        self.execute_errors
            .lock()
            .unwrap()
            .push_back((fragment.to_string(), message.to_string()));
    }

    /// Every statement passed to `execute`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlChannel for ScriptedChannel {
    async fn execute(&self, statement: &str) -> Result<(), CommandError> {
        let failure = {
            let mut errors = self.execute_errors.lock().unwrap();
            match errors.front() {
                Some((fragment, _)) if statement.contains(fragment.as_str()) => {
                    errors.pop_front().map(|(_, message)| message)
                }
                _ => None,
            }
        };
        if let Some(message) = failure {
            return Err(CommandError::new(statement, message));
        }

        self.executed.lock().unwrap().push(statement.to_string());
        Ok(())
    }

    async fn query(&self, statement: &str) -> Result<Vec<String>, CommandError> {
        let mut responses = self.responses.lock().unwrap();
        if let Some(pos) = responses.iter().position(|(s, _)| s == statement) {
            let (_, result) = responses.remove(pos).unwrap();
            return result;
        }
        Ok(Vec::new())
    }
}
