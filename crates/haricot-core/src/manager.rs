//! Container-wide registry of contexts and passivation-capable beans.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::bean::{Bean, BeanInstance};
use crate::context::ScopeContext;
use crate::creational::CreationalContext;
use crate::error::{ContextError, ContextResult};
use crate::scope::ScopeKind;

/// Registry handle for context resolution and durable bean lookup.
///
/// One manager is constructed at container startup and handed explicitly to
/// every collaborator that resolves contexts; it is not process-global
/// state. Tearing the container down amounts to deactivating every bound
/// context and dropping the manager.
pub struct BeanManager {
	contexts: RwLock<HashMap<ScopeKind, Arc<ScopeContext>>>,
	passivation_capable: RwLock<HashMap<String, Arc<dyn Bean>>>,
}

impl BeanManager {
	pub fn new() -> Self {
		Self {
			contexts: RwLock::new(HashMap::new()),
			passivation_capable: RwLock::new(HashMap::new()),
		}
	}

	/// Resolves the active context for a scope.
	///
	/// The dependent pseudo-scope never resolves to a shared context; asking
	/// for it is an error, and callers must use direct ownership semantics
	/// instead.
	pub fn context(&self, scope: ScopeKind) -> ContextResult<Arc<ScopeContext>> {
		if scope.is_pseudo() {
			return Err(ContextError::DependentScopeShared);
		}
		let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
		let context = contexts
			.get(&scope)
			.ok_or(ContextError::NoContext { scope })?;
		if !context.is_active() {
			return Err(ContextError::NotActive { scope });
		}
		Ok(context.clone())
	}

	/// Begins a new boundary for a normal scope, replacing any prior
	/// binding.
	pub fn activate_context(&self, scope: ScopeKind) -> ContextResult<Arc<ScopeContext>> {
		if scope.is_pseudo() {
			return Err(ContextError::DependentScopeShared);
		}
		let context = Arc::new(ScopeContext::new(scope));
		tracing::debug!(scope = %scope, boundary = %context.boundary_id(), "context activated");
		let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
		contexts.insert(scope, context.clone());
		Ok(context)
	}

	/// Ends the scope's boundary: every entry is released, then the context
	/// is unbound.
	pub fn deactivate_context(&self, scope: ScopeKind) -> ContextResult<()> {
		let removed = {
			let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
			contexts.remove(&scope)
		};
		let context = removed.ok_or(ContextError::NoContext { scope })?;
		context.destroy();
		tracing::debug!(scope = %scope, boundary = %context.boundary_id(), "context destroyed");
		Ok(())
	}

	/// Registers a bean for lookup by its durable passivation id.
	///
	/// A bean without a passivation id can never be restored; it is skipped
	/// with a warning rather than rejected.
	pub fn register_passivation_capable(&self, bean: Arc<dyn Bean>) {
		let Some(id) = bean.passivation_id().map(str::to_owned) else {
			tracing::warn!(bean = %bean.id(), "bean has no passivation id; skipping registration");
			return;
		};
		let mut registry = self
			.passivation_capable
			.write()
			.unwrap_or_else(PoisonError::into_inner);
		registry.insert(id, bean);
	}

	/// Looks a bean up by its passivation id.
	pub fn passivation_capable_bean(&self, id: &str) -> Option<Arc<dyn Bean>> {
		let registry = self
			.passivation_capable
			.read()
			.unwrap_or_else(PoisonError::into_inner);
		registry.get(id).cloned()
	}

	/// Resolves or creates the contextual instance for a bean through its
	/// declared scope.
	///
	/// Dependent-scoped beans are produced directly and the caller owns the
	/// resulting instance's lifecycle; nothing tears it down on the caller's
	/// behalf.
	pub fn instance(&self, bean: &Arc<dyn Bean>) -> ContextResult<BeanInstance> {
		if bean.scope().is_pseudo() {
			let creational = CreationalContext::new(bean.as_ref());
			return bean.create(&creational);
		}
		let context = self.context(bean.scope())?;
		if let Some(existing) = context.get(bean)? {
			return Ok(existing);
		}
		let creational = match context.creational_context(bean)? {
			Some(existing) => existing,
			None => {
				let fresh = Arc::new(CreationalContext::new(bean.as_ref()));
				context.init_creational_bag(bean, fresh.clone())?;
				fresh
			}
		};
		context.get_or_create(bean, creational)
	}
}

impl Default for BeanManager {
	fn default() -> Self {
		Self::new()
	}
}
