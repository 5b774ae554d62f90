//! Backend that forwards calls to a running editor process.
//!
//! The byte-level encoding belongs to a [`Wire`] implementation. This module
//! owns the parts every wire shares: a dedicated worker thread so a stuck
//! editor cannot block the caller past the configured timeout, and the
//! translation of the editor's failure sentinels into `RemoteFault`.

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use reslink_core::TransportError;

use crate::method::{Method, Sentinel};
use crate::transport::Transport;

/// Failure reported by a wire implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The editor process could not be reached.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The editor answered with an error.
    #[error("{0}")]
    Fault(String),
}

/// One synchronous request/response exchange with the editor.
pub trait Wire: Send + 'static {
    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, WireError>;
}

/// Remote backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Bus name the editor registers under
    pub service: String,
    /// Longest wait for a single call
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            service: "org.kde.kdenlive".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

struct Request {
    method: Method,
    args: Vec<Value>,
    reply: Sender<Result<Value, WireError>>,
}

/// [`Transport`] over a [`Wire`] driven by a worker thread.
pub struct RemoteBackend {
    config: RemoteConfig,
    requests: Sender<Request>,
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RemoteBackend {
    /// Start the worker thread that owns `wire`.
    pub fn connect<W: Wire>(config: RemoteConfig, mut wire: W) -> Result<Self, TransportError> {
        let (requests, inbox) = unbounded::<Request>();
        let service = config.service.clone();
        thread::Builder::new()
            .name(format!("reslink-remote-{service}"))
            .spawn(move || {
                for request in inbox.iter() {
                    let result = wire.call(request.method.as_str(), &request.args);
                    // The caller may have timed out and gone away.
                    let _ = request.reply.send(result);
                }
                debug!(service = %service, "remote worker stopped");
            })
            .map_err(|e| TransportError::NotConnected(format!("cannot start worker: {e}")))?;

        info!(
            service = %config.service,
            timeout_ms = config.timeout.as_millis() as u64,
            "remote backend connected"
        );
        Ok(Self { config, requests })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

impl Transport for RemoteBackend {
    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError> {
        let (reply, response) = bounded(1);
        let started = Instant::now();
        self.requests
            .send(Request {
                method,
                args: args.to_vec(),
                reply,
            })
            .map_err(|_| TransportError::NotConnected(self.config.service.clone()))?;

        let result = match response.recv_timeout(self.config.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                warn!(method = %method, elapsed_ms, "remote call timed out");
                return Err(TransportError::Timeout {
                    method: method.as_str().to_string(),
                    elapsed_ms,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(TransportError::NotConnected(self.config.service.clone()));
            }
        };

        let value = match result {
            Ok(value) => value,
            Err(WireError::Unreachable(reason)) => {
                return Err(TransportError::NotConnected(reason));
            }
            Err(WireError::Fault(message)) => {
                return Err(TransportError::fault(method.as_str(), message));
            }
        };
        debug!(method = %method, result = %value, "remote call");
        check_sentinel(method, value)
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}

/// Turn a failure encoded in the return value into `RemoteFault`.
pub fn check_sentinel(method: Method, value: Value) -> Result<Value, TransportError> {
    let failed = match method.sentinel() {
        Sentinel::None => false,
        Sentinel::NegativeInt => match &value {
            Value::Number(n) => n.as_i64().map_or(true, |i| i < 0),
            Value::String(s) => s.trim().parse::<i64>().map_or(true, |i| i < 0),
            _ => true,
        },
        Sentinel::EmptyOrMinusOne => match &value {
            Value::String(s) => s.is_empty() || s == "-1",
            Value::Number(n) => n.as_i64() == Some(-1),
            _ => true,
        },
    };
    if failed {
        Err(TransportError::fault(
            method.as_str(),
            format!("editor returned failure value {value}"),
        ))
    } else {
        Ok(value)
    }
}
