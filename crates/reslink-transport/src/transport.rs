//! The transport contract shared by every backend.

use serde_json::Value;

use reslink_core::TransportError;

use crate::method::Method;

/// Invoke a named remote method with positional arguments.
///
/// A call either returns the method's result or fails with
/// `NotConnected`, `RemoteFault` or `Timeout`. Callers never learn which
/// backend served the call, and failures are never retried here.
pub trait Transport: Send + Sync {
    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError> {
        (**self).invoke(method, args)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Build an argument list from heterogeneous values.
///
/// ```
/// use reslink_transport::args;
/// let list = args!["1", 0, 125, -1, -1];
/// assert_eq!(list.len(), 5);
/// ```
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}
