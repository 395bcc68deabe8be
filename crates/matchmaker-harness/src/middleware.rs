//! Call adaptation layer.
//!
//! Every call runs through one [`Middleware`], which may rewrite the
//! request arguments and the response. The default is a pass-through; the
//! [`LegacyResultAdapter`] bridges the older conductor wire format that
//! wrapped application results in an extra `Ok` envelope.

use serde_json::Value;

use crate::error::HarnessResult;
use crate::types::CallResult;

/// Request/response adaptation applied around every dispatched call
pub trait Middleware: Send + Sync {
    /// Rewrite call arguments before dispatch
    fn adapt_request(&self, _zome: &str, _func: &str, args: Value) -> HarnessResult<Value> {
        Ok(args)
    }

    /// Rewrite the result after dispatch
    fn adapt_response(&self, result: CallResult) -> CallResult {
        result
    }
}

/// No-op adaptation
pub struct Passthrough;

impl Middleware for Passthrough {}

/// Compatibility adapter for the legacy result envelope.
///
/// Older runtimes returned `{"Ok": {"Ok": payload}}` or
/// `{"Ok": {"Err": reason}}`: an outer transport envelope around the
/// application's own tagged result. This adapter flattens that shape to a
/// single [`CallResult`] and leaves modern single-envelope results
/// untouched, so it is safe to keep configured against either runtime
/// generation.
pub struct LegacyResultAdapter;

impl Middleware for LegacyResultAdapter {
    fn adapt_response(&self, result: CallResult) -> CallResult {
        if let CallResult::Ok(inner) = &result {
            if let Some(object) = inner.as_object() {
                if object.len() == 1 {
                    if let Some(payload) = object.get("Ok") {
                        return CallResult::Ok(payload.clone());
                    }
                    if let Some(reason) = object.get("Err") {
                        return CallResult::Err(reason.clone());
                    }
                }
            }
        }
        result
    }
}
