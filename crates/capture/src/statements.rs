//! ASN control statements.
//!
//! The statement text follows the asncdc support scripts shipped in the
//! Db2 CDC container images. Builders take identifiers that have already
//! passed [`validate_identifier`].

use crate::CaptureError;

/// Starts the capture service.
pub const START_CAPTURE: &str = "VALUES ASNCDC.ASNCDCSERVICES('start','asncdc')";
/// Stops the capture service.
pub const STOP_CAPTURE: &str = "VALUES ASNCDC.ASNCDCSERVICES('stop','asncdc')";
/// Reports the capture service status as a single text row.
pub const CAPTURE_STATUS: &str = "VALUES ASNCDC.ASNCDCSERVICES('status','asncdc')";
/// Re-initializes the capture service after registration changes.
pub const REINIT_CAPTURE: &str = "VALUES ASNCDC.ASNCDCSERVICES('reinit','asncdc')";

/// Substring of the status text while the capture program is up.
pub const RUNNING_MARKER: &str = "is doing work";
/// Substring of the status text while the capture program is down.
pub const STOPPED_MARKER: &str = "is not running";

pub fn add_table(schema: &str, table: &str) -> String {
    format!("CALL ASNCDC.ADDTABLE('{schema}', '{table}')")
}

pub fn remove_table(schema: &str, table: &str) -> String {
    format!("CALL ASNCDC.REMOVETABLE('{schema}', '{table}')")
}

pub fn set_registration_state(schema: &str, table: &str, flag: char) -> String {
    format!(
        "UPDATE ASNCDC.IBMSNAP_REGISTER SET STATE = '{flag}' \
         WHERE SOURCE_OWNER = '{schema}' AND SOURCE_TABLE = '{table}'"
    )
}

pub fn registration_state(schema: &str, table: &str) -> String {
    format!(
        "SELECT STATE FROM ASNCDC.IBMSNAP_REGISTER \
         WHERE SOURCE_OWNER = '{schema}' AND SOURCE_TABLE = '{table}'"
    )
}

pub fn change_table_name(schema: &str, table: &str) -> String {
    format!(
        "SELECT CD_OWNER || '.' || CD_TABLE FROM ASNCDC.IBMSNAP_REGISTER \
         WHERE SOURCE_OWNER = '{schema}' AND SOURCE_TABLE = '{table}'"
    )
}

/// Rejects anything that is not a plain Db2 identifier before it gets
/// anywhere near a statement.
pub fn validate_identifier(name: &str) -> Result<(), CaptureError> {
    let valid =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CaptureError::InvalidIdentifier(name.to_string()))
    }
}
