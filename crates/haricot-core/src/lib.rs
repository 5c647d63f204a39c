//! # Haricot Core
//!
//! Bean model, scoped contexts and creational state for the haricot
//! contextual bean container.
//!
//! The container manages *contextual instances*: each bean declares a
//! scope, and the active [`ScopeContext`] for that scope owns at most one
//! instance of the bean per boundary: one per in-flight request, one per
//! session, and so on. The dependent pseudo-scope has no shared storage;
//! dependent instances belong to whichever object created them, tracked
//! through [`CreationalContext`] so they can be torn down with their owner.
//!
//! Bean descriptors, typesafe resolution and annotation processing live in
//! the metadata subsystem; this crate consumes already-resolved
//! [`Bean`] contracts through the [`BeanManager`] registry handle.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use haricot_core::{
//! 	Bean, BeanId, BeanInstance, BeanManager, CallArgs, CallOutcome, ContextResult,
//! 	CreationalContext, MethodRef, ScopeKind,
//! };
//!
//! struct ClockBean {
//! 	id: BeanId,
//! }
//!
//! impl Bean for ClockBean {
//! 	fn id(&self) -> &BeanId {
//! 		&self.id
//! 	}
//!
//! 	fn scope(&self) -> ScopeKind {
//! 		ScopeKind::Application
//! 	}
//!
//! 	fn create(&self, _creational: &CreationalContext) -> ContextResult<BeanInstance> {
//! 		Ok(Arc::new(42u64))
//! 	}
//!
//! 	fn destroy(&self, _instance: BeanInstance) {}
//!
//! 	fn call(&self, instance: &BeanInstance, _method: &MethodRef, _args: CallArgs) -> CallOutcome {
//! 		let value = instance.downcast_ref::<u64>().copied().unwrap_or_default();
//! 		Ok(Box::new(value))
//! 	}
//! }
//!
//! let manager = BeanManager::new();
//! manager.activate_context(ScopeKind::Application)?;
//!
//! let bean: Arc<dyn Bean> = Arc::new(ClockBean { id: BeanId::new("clock") });
//! let first = manager.instance(&bean)?;
//! let second = manager.instance(&bean)?;
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! manager.deactivate_context(ScopeKind::Application)?;
//! # Ok::<(), haricot_core::ContextError>(())
//! ```

pub mod bean;
pub mod context;
pub mod creational;
pub mod error;
pub mod manager;
pub mod scope;
pub mod third_party;

pub use bean::{Bean, BeanId, BeanInstance, CallArgs, CallOutcome, MethodRef, ObjectContract};
pub use context::ScopeContext;
pub use creational::CreationalContext;
pub use error::{ContextError, ContextResult};
pub use manager::BeanManager;
pub use scope::{ScopeKind, SessionKind};
pub use third_party::ThirdPartyBean;
