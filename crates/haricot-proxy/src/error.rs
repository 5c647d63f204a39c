//! Error taxonomy for proxy invocation and passivation.

use thiserror::Error;

use haricot_core::ContextError;

/// Errors surfaced by a proxy method handler. Every variant is returned
/// synchronously to the invoking thread at the failing step; nothing is
/// queued or retried.
#[derive(Debug, Error)]
pub enum ProxyError {
	/// Identity and hash methods of the universal object contract are not
	/// supported on contextual proxies.
	#[error("object contract method {method} is not supported on a contextual proxy")]
	UnsupportedObjectMethod { method: String },

	/// Stateful remove-methods are only legal on dependent-scoped beans.
	#[error("cannot invoke an EJB stateful remove method unless the bean is dependent-scoped")]
	RemoveOutsideDependent,

	/// The handler has no bean bound; the proxy was restored from a
	/// passivated form whose passivation id was absent.
	#[error("proxy has no bean bound; its passivation id was absent at encode time")]
	BeanUnset,

	/// Elevated call permission was denied for a guarded method.
	#[error("elevated call permission denied for method {method}")]
	AccessDenied { method: String },

	/// The underlying instance's method failed; the original error passes
	/// through unchanged.
	#[error("{0}")]
	Target(Box<dyn std::error::Error + Send + Sync>),

	#[error(transparent)]
	Context(#[from] ContextError),

	/// The passivation codec could not read or write the durable form.
	#[error("proxy passivation codec failure: {0}")]
	Codec(String),
}

pub type ProxyResult<T> = Result<T, ProxyError>;
