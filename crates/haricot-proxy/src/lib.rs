//! # Haricot Proxy
//!
//! Proxy invocation handlers, interceptor access and the passivation codec
//! for the haricot contextual bean container.
//!
//! A client never holds a contextual instance directly; it holds a proxy
//! whose method handler re-resolves the instance through the bean's
//! declared scope on every call. The handler implements the full dispatch
//! protocol: object-contract guarding, stateful remove-method semantics,
//! per-thread invocation binding for interceptors, target resolution
//! through [`haricot_core::ScopeContext`], and scoped access elevation for
//! guarded methods.
//!
//! Proxies survive passivation boundaries through [`encode`]/[`decode`],
//! which persist nothing but the bean's durable id.

pub mod access;
pub mod error;
pub mod handler;
pub mod interceptor;
pub mod passivation;

pub use access::{AccessPolicy, AllowAll, is_elevated};
pub use error::{ProxyError, ProxyResult};
pub use handler::{ProxyHandler, SessionProxyHandler};
pub use interceptor::{Interceptor, InvocationBinding, current_binding};
pub use passivation::{decode, encode};
