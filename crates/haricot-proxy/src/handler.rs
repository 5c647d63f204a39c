//! Proxy invocation handlers for session beans.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock};

use haricot_core::{
	Bean, BeanInstance, BeanManager, CallArgs, CreationalContext, MethodRef, SessionKind,
};

use crate::access::{self, AccessPolicy, AllowAll};
use crate::error::{ProxyError, ProxyResult};
use crate::interceptor::{self, Interceptor, InvocationBinding};

/// Capability implemented by every proxy method handler.
///
/// The dynamic-proxy infrastructure that fronts client calls is an external
/// collaborator; it forwards every intercepted method here together with
/// the original arguments.
pub trait ProxyHandler: Send + Sync {
	fn invoke(&self, method: &MethodRef, args: CallArgs) -> ProxyResult<Box<dyn Any + Send>>;
}

/// Method handler behind a session bean proxy.
///
/// The handler is long-lived and holds no per-call state. For a
/// normal-scoped bean it never caches the resolved instance: every
/// invocation re-resolves through the scope's active context, which is what
/// keeps at most one live instance per scope per bean. For a
/// dependent-scoped bean the handler exclusively owns its creational
/// context instead, since dependent instances are never shared.
pub struct SessionProxyHandler {
	bean: Option<Arc<dyn Bean>>,
	manager: Arc<BeanManager>,
	/// Held only in the dependent pseudo-scope case; re-established lazily
	/// after passivation.
	owned_creational: RwLock<Option<Arc<CreationalContext>>>,
	interceptors: Vec<Arc<dyn Interceptor>>,
	access_policy: Arc<dyn AccessPolicy>,
}

impl SessionProxyHandler {
	/// Builds the handler for a freshly constructed proxy.
	///
	/// For a normal-scoped bean the supplied creational context is bound
	/// into the scope context's creational bag immediately and the handler
	/// keeps nothing; for a dependent-scoped bean the handler takes
	/// ownership of it. Normal scopes therefore require their context to be
	/// active at proxy construction time.
	pub fn new(
		bean: Arc<dyn Bean>,
		creational: Arc<CreationalContext>,
		manager: Arc<BeanManager>,
	) -> ProxyResult<Self> {
		let owned = if bean.scope().is_normal() {
			let context = manager.context(bean.scope())?;
			context.init_creational_bag(&bean, creational)?;
			None
		} else {
			Some(creational)
		};
		Ok(Self {
			bean: Some(bean),
			manager,
			owned_creational: RwLock::new(owned),
			interceptors: Vec::new(),
			access_policy: Arc::new(AllowAll),
		})
	}

	/// Rebuilds a handler on the receiving side of a passivation boundary.
	/// The creational context is absent until first use.
	pub(crate) fn revived(bean: Option<Arc<dyn Bean>>, manager: Arc<BeanManager>) -> Self {
		Self {
			bean,
			manager,
			owned_creational: RwLock::new(None),
			interceptors: Vec::new(),
			access_policy: Arc::new(AllowAll),
		}
	}

	/// Registers an interceptor. `before_invoke` hooks run in registration
	/// order, `after_invoke` hooks in reverse.
	pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
		self.interceptors.push(interceptor);
		self
	}

	/// Replaces the default allow-all access policy for guarded methods.
	pub fn with_access_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
		self.access_policy = policy;
		self
	}

	/// The bean this proxy fronts. Unset only after decoding a proxy whose
	/// passivation id was absent.
	pub fn bean(&self) -> Option<&Arc<dyn Bean>> {
		self.bean.as_ref()
	}

	/// Releases the owned creational context, destroying its dependents in
	/// reverse creation order. Meaningful only for dependent-scoped proxies;
	/// normal-scoped state lives in the context and is released with its
	/// boundary.
	pub fn release(&self) {
		let owned = self
			.owned_creational
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone();
		if let Some(creational) = owned {
			creational.release();
		}
	}

	/// The creational context for the fronted bean.
	///
	/// Owned directly in the dependent case. For normal scopes it is
	/// fetched from the scope context's creational bag; a missing bag is
	/// recovered by synthesizing a fresh creational context and rebinding
	/// it. That recovery trades the stale bag's cleanup for availability:
	/// the scenario is a proxy held across a destroyed and recreated
	/// boundary (a session-scoped bean injected into an application-scoped
	/// one, say), where the previous dependents' owning scope is already
	/// gone.
	pub fn contextual_creational_context(&self) -> ProxyResult<Arc<CreationalContext>> {
		let bean = self.bean.as_ref().ok_or(ProxyError::BeanUnset)?;
		if bean.scope().is_pseudo() {
			{
				let owned = self
					.owned_creational
					.read()
					.unwrap_or_else(PoisonError::into_inner);
				if let Some(creational) = owned.as_ref() {
					return Ok(creational.clone());
				}
			}
			// first use after passivation
			let mut owned = self
				.owned_creational
				.write()
				.unwrap_or_else(PoisonError::into_inner);
			Ok(owned
				.get_or_insert_with(|| Arc::new(CreationalContext::new(bean.as_ref())))
				.clone())
		} else {
			let context = self.manager.context(bean.scope())?;
			match context.creational_context(bean)? {
				Some(existing) => Ok(existing),
				None => {
					let fresh = Arc::new(CreationalContext::new(bean.as_ref()));
					context.init_creational_bag(bean, fresh.clone())?;
					Ok(fresh)
				}
			}
		}
	}

	fn is_remove_method(bean: &dyn Bean, method: &MethodRef) -> bool {
		bean.remove_methods()
			.iter()
			.any(|declared| declared.name() == method.name())
	}

	fn resolve_target(
		&self,
		bean: &Arc<dyn Bean>,
		creational: &Arc<CreationalContext>,
	) -> ProxyResult<BeanInstance> {
		if bean.scope().is_pseudo() {
			// no shared store: produce through the owned creational state,
			// which also tracks the product for teardown
			let instance = bean.create(creational)?;
			creational.push_dependent(bean.clone(), instance.clone());
			return Ok(instance);
		}
		let context = self.manager.context(bean.scope())?;
		if let Some(existing) = context.get(bean)? {
			return Ok(existing);
		}
		Ok(context.get_or_create(bean, creational.clone())?)
	}

	fn dispatch(
		&self,
		bean: &Arc<dyn Bean>,
		instance: &BeanInstance,
		method: &MethodRef,
		args: CallArgs,
	) -> ProxyResult<Box<dyn Any + Send>> {
		let _grant = if method.is_guarded() {
			Some(access::elevate(self.access_policy.as_ref(), method)?)
		} else {
			None
		};
		bean.call(instance, method, args).map_err(ProxyError::Target)
	}
}

impl std::fmt::Debug for SessionProxyHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionProxyHandler")
			.field("bean", &self.bean.as_ref().map(|bean| bean.id()))
			.field("interceptors", &self.interceptors.len())
			.finish_non_exhaustive()
	}
}

impl ProxyHandler for SessionProxyHandler {
	fn invoke(&self, method: &MethodRef, args: CallArgs) -> ProxyResult<Box<dyn Any + Send>> {
		let bean = self.bean.as_ref().ok_or(ProxyError::BeanUnset)?.clone();

		if method.is_object_method() && !method.is_string_conversion() {
			tracing::trace!(
				method = method.name(),
				bean = %bean.id(),
				"object contract method rejected on contextual proxy"
			);
			return Err(ProxyError::UnsupportedObjectMethod {
				method: method.name().to_string(),
			});
		}

		let mut remove_after_call = false;
		if bean.session_kind() == SessionKind::Stateful
			&& Self::is_remove_method(bean.as_ref(), method)
		{
			if bean.scope().is_normal() {
				return Err(ProxyError::RemoveOutsideDependent);
			}
			bean.mark_for_removal();
			remove_after_call = true;
		}

		let creational = self.contextual_creational_context()?;
		let binding = InvocationBinding::new(bean.clone(), creational.clone());
		let _bound = interceptor::bind(binding.clone());

		for interceptor in &self.interceptors {
			interceptor.before_invoke(&binding);
		}

		let result = self
			.resolve_target(&bean, &creational)
			.and_then(|instance| self.dispatch(&bean, &instance, method, args));

		for interceptor in self.interceptors.iter().rev() {
			interceptor.after_invoke(&binding);
		}

		if remove_after_call && result.is_ok() {
			// end-of-life for the stateful instance and its dependents
			self.release();
		}

		result
	}
}

impl Drop for SessionProxyHandler {
	fn drop(&mut self) {
		self.release();
	}
}
