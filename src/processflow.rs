//! Helpers shared by orchestration task implementations to record an
//! operation's outcome in the engine-owned per-process-instance variable
//! store.

use std::collections::HashMap;

use crate::error::{Error, Result};

pub const RESPONSE: &str = "Response";
pub const RESPONSE_CODE: &str = "ResponseCode";
pub const ERROR_RESPONSE: &str = "ErrResponse";
pub const FLOW_EXCEPTION: &str = "ProcessflowException";

/// Key/value surface of the variable store. The orchestration engine owns the
/// store and its synchronization; callers pass it in per invocation.
pub trait ExecutionContext {
    fn set_variable(&mut self, key: &str, value: &str);
}

impl ExecutionContext for HashMap<String, String> {
    fn set_variable(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/// Records a successful outcome under `Response` / `ResponseCode`.
pub fn set_response_attributes(
    execution: &mut dyn ExecutionContext,
    response: &str,
    response_code: Option<&str>,
) -> Result<()> {
    let code = require_code(response_code)?;
    execution.set_variable(RESPONSE, response);
    execution.set_variable(RESPONSE_CODE, code);
    Ok(())
}

/// Records a failed outcome under `ErrResponse` / `ResponseCode`.
pub fn set_error_response_attributes(
    execution: &mut dyn ExecutionContext,
    response: &str,
    response_code: Option<&str>,
) -> Result<()> {
    let code = require_code(response_code)?;
    execution.set_variable(ERROR_RESPONSE, response);
    execution.set_variable(RESPONSE_CODE, code);
    Ok(())
}

/// Records an exception outcome under `ResponseCode` / `ProcessflowException`.
pub fn set_exception_response_attributes(
    execution: &mut dyn ExecutionContext,
    response: &str,
    response_code: Option<&str>,
) -> Result<()> {
    let code = require_code(response_code)?;
    execution.set_variable(RESPONSE_CODE, code);
    execution.set_variable(FLOW_EXCEPTION, response);
    Ok(())
}

/// Returns the scheme prefix for outbound collaborator URLs.
///
/// Only the exact literal `"true"` selects the secure scheme; every other
/// value (including `"True"` or `"1"`) yields `http://`. Callers depend on
/// this exact string contract.
pub fn protocol(is_ssl_enabled: &str) -> &'static str {
    if is_ssl_enabled == "true" {
        "https://"
    } else {
        "http://"
    }
}

// The writes are all-or-nothing: the code is checked before any variable is
// touched.
fn require_code(response_code: Option<&str>) -> Result<&str> {
    response_code
        .ok_or_else(|| Error::InvalidArgument("response code must be provided".into()))
}
