//! Adapter for beans defined outside the container.

use std::sync::Arc;

use crate::bean::{Bean, BeanId, BeanInstance, CallArgs, CallOutcome, MethodRef};
use crate::creational::CreationalContext;
use crate::error::ContextResult;
use crate::scope::{ScopeKind, SessionKind};

/// Wraps an externally-supplied [`Bean`] contract so the container can
/// manage it like one of its own.
///
/// Third-party beans are never passivation capable: the durable id is
/// withheld regardless of what the wrapped contract reports, since the
/// container cannot vouch for an id it did not assign. When the wrapped
/// bean is dependent-scoped, every instance it produces is recorded into
/// the supplied creational context so it is torn down with its owner.
pub struct ThirdPartyBean {
	inner: Arc<dyn Bean>,
}

impl ThirdPartyBean {
	pub fn wrap(inner: Arc<dyn Bean>) -> Self {
		Self { inner }
	}

	pub fn inner(&self) -> &Arc<dyn Bean> {
		&self.inner
	}
}

impl Bean for ThirdPartyBean {
	fn id(&self) -> &BeanId {
		self.inner.id()
	}

	fn scope(&self) -> ScopeKind {
		self.inner.scope()
	}

	fn session_kind(&self) -> SessionKind {
		self.inner.session_kind()
	}

	fn remove_methods(&self) -> &[MethodRef] {
		self.inner.remove_methods()
	}

	fn passivation_id(&self) -> Option<&str> {
		None
	}

	fn create(&self, creational: &CreationalContext) -> ContextResult<BeanInstance> {
		let instance = self.inner.create(creational)?;
		if self.inner.scope().is_pseudo() {
			creational.push_dependent(self.inner.clone(), instance.clone());
		}
		Ok(instance)
	}

	fn destroy(&self, instance: BeanInstance) {
		self.inner.destroy(instance);
	}

	fn call(&self, instance: &BeanInstance, method: &MethodRef, args: CallArgs) -> CallOutcome {
		self.inner.call(instance, method, args)
	}

	fn mark_for_removal(&self) {
		self.inner.mark_for_removal();
	}

	fn pending_removal(&self) -> bool {
		self.inner.pending_removal()
	}
}
