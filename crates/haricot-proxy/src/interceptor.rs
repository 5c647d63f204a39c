//! Invocation binding and interceptor access.
//!
//! While a proxy invocation is in flight, the bean and its creational
//! context are bound onto the invoking thread so interceptors further down
//! the call chain can reach contextual creation state. The binding is
//! per-thread, stacks across nested proxy calls, and is cleared on every
//! exit path through an RAII guard.

use std::cell::RefCell;
use std::sync::Arc;

use haricot_core::{Bean, CreationalContext};

/// Bean and creational state of the invocation currently in flight.
#[derive(Clone)]
pub struct InvocationBinding {
	bean: Arc<dyn Bean>,
	creational: Arc<CreationalContext>,
}

impl InvocationBinding {
	pub fn new(bean: Arc<dyn Bean>, creational: Arc<CreationalContext>) -> Self {
		Self { bean, creational }
	}

	pub fn bean(&self) -> &Arc<dyn Bean> {
		&self.bean
	}

	pub fn creational(&self) -> &Arc<CreationalContext> {
		&self.creational
	}
}

thread_local! {
	static BINDINGS: RefCell<Vec<InvocationBinding>> = const { RefCell::new(Vec::new()) };
}

/// Binds an invocation onto the current thread until the guard drops.
pub(crate) fn bind(binding: InvocationBinding) -> BindingGuard {
	BINDINGS.with(|stack| stack.borrow_mut().push(binding));
	BindingGuard { _private: () }
}

/// The binding of the innermost proxy invocation on this thread, if any.
pub fn current_binding() -> Option<InvocationBinding> {
	BINDINGS.with(|stack| stack.borrow().last().cloned())
}

/// Clears its binding when dropped, on success, error and unwind alike.
pub struct BindingGuard {
	_private: (),
}

impl Drop for BindingGuard {
	fn drop(&mut self) {
		BINDINGS.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}

/// Observer invoked around proxy dispatch.
///
/// Hooks receive the active [`InvocationBinding`] directly; interceptors
/// living deeper in the call chain can reach the same state through
/// [`current_binding`].
pub trait Interceptor: Send + Sync {
	/// Runs after the binding is established, before the target method.
	fn before_invoke(&self, _binding: &InvocationBinding) {}

	/// Runs after the target method returned, regardless of its outcome.
	fn after_invoke(&self, _binding: &InvocationBinding) {}
}
