//! Passivation codec for proxy handlers.
//!
//! Only the bean's durable id crosses a passivation boundary: the wire form
//! is a single nullable string field written through a standard
//! serialization stream. Creational state is transient and is
//! re-established lazily on first use after restore.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use haricot_core::BeanManager;

use crate::error::{ProxyError, ProxyResult};
use crate::handler::SessionProxyHandler;

#[derive(Serialize, Deserialize)]
struct PassivatedProxy {
	passivation_id: Option<String>,
}

/// Serializes a handler to its durable form.
///
/// A bean without a passivation id is encoded as a null marker; encoding
/// still succeeds, but the resulting bytes cannot be restored into a usable
/// proxy. The condition is logged, not raised.
pub fn encode(handler: &SessionProxyHandler) -> ProxyResult<Vec<u8>> {
	let passivation_id = handler
		.bean()
		.and_then(|bean| bean.passivation_id().map(str::to_owned));
	if passivation_id.is_none() {
		match handler.bean() {
			Some(bean) => {
				tracing::warn!(bean = %bean.id(), "bean has no passivation id; proxy will not restore")
			}
			None => tracing::warn!("encoding a proxy with no bean bound"),
		}
	}
	serde_json::to_vec(&PassivatedProxy { passivation_id })
		.map_err(|e| ProxyError::Codec(e.to_string()))
}

/// Restores a handler from its durable form.
///
/// A null id, or an id unknown to the registry, leaves the handler's bean
/// unset; the first invocation on such a proxy fails with
/// [`ProxyError::BeanUnset`] rather than the decode itself.
pub fn decode(bytes: &[u8], manager: &Arc<BeanManager>) -> ProxyResult<SessionProxyHandler> {
	let passivated: PassivatedProxy =
		serde_json::from_slice(bytes).map_err(|e| ProxyError::Codec(e.to_string()))?;
	let bean = passivated
		.passivation_id
		.as_deref()
		.and_then(|id| manager.passivation_capable_bean(id));
	Ok(SessionProxyHandler::revived(bean, manager.clone()))
}
