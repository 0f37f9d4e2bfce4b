//! Invocation requests and results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Failure;

/// Params passed verbatim to a downstream method
pub type Params = Map<String, Value>;

/// One inbound call, consumed exactly once by the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Target server name
    pub server: String,
    /// Method name on the target server
    pub method: String,
    /// Method params
    #[serde(default)]
    pub params: Params,
}

impl InvocationRequest {
    pub fn new(server: impl Into<String>, method: impl Into<String>, params: Params) -> Self {
        Self {
            server: server.into(),
            method: method.into(),
            params,
        }
    }
}

/// Outcome of a routed call: exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    /// The downstream returned a result payload
    Success { result: Value },
    /// The call failed somewhere between gateway and downstream
    Failure { error: Failure },
}

impl InvocationResult {
    pub fn success(result: Value) -> Self {
        InvocationResult::Success { result }
    }

    pub fn failure(error: Failure) -> Self {
        InvocationResult::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Failure> {
        match self {
            InvocationResult::Success { .. } => None,
            InvocationResult::Failure { error } => Some(error),
        }
    }

    /// HTTP status the Gateway Front answers with
    pub fn status_code(&self) -> u16 {
        match self {
            InvocationResult::Success { .. } => 200,
            InvocationResult::Failure { error } => error.status_code(),
        }
    }

    pub fn into_result(self) -> Result<Value, Failure> {
        match self {
            InvocationResult::Success { result } => Ok(result),
            InvocationResult::Failure { error } => Err(error),
        }
    }
}

impl From<Result<Value, Failure>> for InvocationResult {
    fn from(result: Result<Value, Failure>) -> Self {
        match result {
            Ok(value) => InvocationResult::success(value),
            Err(error) => InvocationResult::failure(error),
        }
    }
}
