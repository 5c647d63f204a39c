//! # Haricot
//!
//! Contextual bean container for Rust, inspired by CDI (Contexts and
//! Dependency Injection).
//!
//! Haricot manages *contextual instances*: every bean declares a scope, and
//! the active context for that scope owns at most one instance of the bean
//! per boundary: one per in-flight request, one per session, and so on.
//! Clients never hold instances directly; they hold proxies whose method
//! handlers re-resolve the right instance through the bean's scope on every
//! call, track dependent-object graphs for orderly teardown, and survive
//! passivation boundaries through a durable-id codec.
//!
//! The workspace splits into two crates, re-exported here:
//!
//! - [`haricot_core`]: bean model, scoped contexts, creational state and
//!   the [`BeanManager`] registry handle.
//! - [`haricot_proxy`]: the proxy dispatch protocol, interceptor access and
//!   the passivation codec.
//!
//! Bean metadata parsing, typesafe resolution and interceptor-binding
//! discovery are external collaborators: haricot consumes already-resolved
//! [`Bean`] contracts.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use haricot::{BeanManager, CreationalContext, MethodRef, ProxyHandler, ScopeKind, SessionProxyHandler};
//!
//! let manager = Arc::new(BeanManager::new());
//! manager.activate_context(ScopeKind::Session)?;
//!
//! let bean: Arc<dyn haricot::Bean> = metadata.resolve("orders/checkout")?;
//! let creational = Arc::new(CreationalContext::new(bean.as_ref()));
//! let handler = SessionProxyHandler::new(bean, creational, manager.clone())?;
//!
//! // every call re-resolves the contextual instance through the session context
//! let receipt = handler.invoke(&MethodRef::business("checkout"), vec![])?;
//!
//! manager.deactivate_context(ScopeKind::Session)?;
//! ```

pub use haricot_core::{
	Bean, BeanId, BeanInstance, BeanManager, CallArgs, CallOutcome, ContextError, ContextResult,
	CreationalContext, MethodRef, ObjectContract, ScopeContext, ScopeKind, SessionKind,
	ThirdPartyBean,
};
pub use haricot_proxy::{
	AccessPolicy, AllowAll, Interceptor, InvocationBinding, ProxyError, ProxyHandler, ProxyResult,
	SessionProxyHandler, current_binding, decode, encode, is_elevated,
};
