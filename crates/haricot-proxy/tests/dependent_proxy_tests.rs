//! Ownership semantics of dependent-scoped proxies.
//!
//! A dependent proxy owns its creational state outright: products are
//! tracked there, torn down in reverse creation order, and nothing is ever
//! shared through a context.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use haricot_core::{
	Bean, BeanId, BeanInstance, BeanManager, CallArgs, CallOutcome, ContextError, ContextResult,
	CreationalContext, MethodRef, ScopeKind, SessionKind,
};
use haricot_proxy::{ProxyError, ProxyHandler, SessionProxyHandler};

struct TrackerBean {
	id: BeanId,
	session_kind: SessionKind,
	remove_methods: Vec<MethodRef>,
	counter: AtomicUsize,
	destroyed: Arc<Mutex<Vec<String>>>,
}

impl TrackerBean {
	fn new(destroyed: Arc<Mutex<Vec<String>>>) -> Self {
		Self {
			id: BeanId::new("tracker"),
			session_kind: SessionKind::None,
			remove_methods: Vec::new(),
			counter: AtomicUsize::new(0),
			destroyed,
		}
	}

	fn stateful(destroyed: Arc<Mutex<Vec<String>>>) -> Self {
		Self {
			session_kind: SessionKind::Stateful,
			remove_methods: vec![MethodRef::business("close")],
			..Self::new(destroyed)
		}
	}
}

impl Bean for TrackerBean {
	fn id(&self) -> &BeanId {
		&self.id
	}

	fn scope(&self) -> ScopeKind {
		ScopeKind::Dependent
	}

	fn session_kind(&self) -> SessionKind {
		self.session_kind
	}

	fn remove_methods(&self) -> &[MethodRef] {
		&self.remove_methods
	}

	fn create(&self, _creational: &CreationalContext) -> ContextResult<BeanInstance> {
		let n = self.counter.fetch_add(1, Ordering::SeqCst);
		Ok(Arc::new(format!("tracker-{n}")))
	}

	fn destroy(&self, instance: BeanInstance) {
		let label = instance
			.downcast_ref::<String>()
			.cloned()
			.unwrap_or_default();
		self.destroyed.lock().unwrap().push(label);
	}

	fn call(&self, instance: &BeanInstance, _method: &MethodRef, _args: CallArgs) -> CallOutcome {
		let label = instance.downcast_ref::<String>().cloned().unwrap_or_default();
		Ok(Box::new(label))
	}
}

fn dependent_fixture() -> (
	Arc<Mutex<Vec<String>>>,
	Arc<dyn Bean>,
	Arc<CreationalContext>,
	SessionProxyHandler,
) {
	let destroyed = Arc::new(Mutex::new(Vec::new()));
	let bean: Arc<dyn Bean> = Arc::new(TrackerBean::new(destroyed.clone()));
	let creational = Arc::new(CreationalContext::new(bean.as_ref()));
	let manager = Arc::new(BeanManager::new());
	let handler = SessionProxyHandler::new(bean.clone(), creational.clone(), manager).unwrap();
	(destroyed, bean, creational, handler)
}

#[test]
fn test_dependent_proxy_owns_creational_state_from_construction() {
	let (_, _, creational, handler) = dependent_fixture();

	let owned = handler.contextual_creational_context().unwrap();

	assert!(Arc::ptr_eq(&owned, &creational));
}

#[test]
fn test_dependent_products_are_tracked_for_teardown() {
	let (_, _, creational, handler) = dependent_fixture();

	for _ in 0..3 {
		handler
			.invoke(&MethodRef::business("label"), Vec::new())
			.unwrap();
	}

	assert_eq!(creational.dependent_count(), 3);
}

#[test]
fn test_release_destroys_products_in_reverse_creation_order() {
	let (destroyed, _, _, handler) = dependent_fixture();

	for _ in 0..3 {
		handler
			.invoke(&MethodRef::business("label"), Vec::new())
			.unwrap();
	}
	handler.release();

	let order = destroyed.lock().unwrap().clone();
	assert_eq!(order, vec!["tracker-2", "tracker-1", "tracker-0"]);
}

#[test]
fn test_dropping_the_proxy_destroys_its_dependents() {
	let (destroyed, _, _, handler) = dependent_fixture();
	handler
		.invoke(&MethodRef::business("label"), Vec::new())
		.unwrap();

	drop(handler);

	assert_eq!(destroyed.lock().unwrap().as_slice(), &["tracker-0"]);
}

#[test]
fn test_remove_method_consumes_the_stateful_instance() {
	let destroyed = Arc::new(Mutex::new(Vec::new()));
	let concrete = Arc::new(TrackerBean::stateful(destroyed.clone()));
	let bean: Arc<dyn Bean> = concrete.clone();
	let creational = Arc::new(CreationalContext::new(bean.as_ref()));
	let manager = Arc::new(BeanManager::new());
	let handler = SessionProxyHandler::new(bean, creational.clone(), manager).unwrap();

	handler
		.invoke(&MethodRef::business("close"), Vec::new())
		.unwrap();

	assert!(concrete.pending_removal());
	assert_eq!(destroyed.lock().unwrap().as_slice(), &["tracker-0"]);
	assert_eq!(creational.dependent_count(), 0);
}

#[test]
fn test_normal_proxy_construction_initiates_the_creational_bag() {
	let destroyed = Arc::new(Mutex::new(Vec::new()));
	struct SessionTracker(TrackerBean);

	impl Bean for SessionTracker {
		fn id(&self) -> &BeanId {
			self.0.id()
		}

		fn scope(&self) -> ScopeKind {
			ScopeKind::Session
		}

		fn create(&self, creational: &CreationalContext) -> ContextResult<BeanInstance> {
			self.0.create(creational)
		}

		fn destroy(&self, instance: BeanInstance) {
			self.0.destroy(instance);
		}

		fn call(&self, instance: &BeanInstance, method: &MethodRef, args: CallArgs) -> CallOutcome {
			self.0.call(instance, method, args)
		}
	}

	let manager = Arc::new(BeanManager::new());
	let context = manager.activate_context(ScopeKind::Session).unwrap();
	let bean: Arc<dyn Bean> = Arc::new(SessionTracker(TrackerBean::new(destroyed)));
	let creational = Arc::new(CreationalContext::new(bean.as_ref()));

	let _handler =
		SessionProxyHandler::new(bean.clone(), creational.clone(), manager.clone()).unwrap();

	let bound = context.creational_context(&bean).unwrap().unwrap();
	assert!(Arc::ptr_eq(&bound, &creational));
}

#[test]
fn test_normal_proxy_construction_requires_an_active_boundary() {
	let destroyed = Arc::new(Mutex::new(Vec::new()));
	struct SessionTracker(TrackerBean);

	impl Bean for SessionTracker {
		fn id(&self) -> &BeanId {
			self.0.id()
		}

		fn scope(&self) -> ScopeKind {
			ScopeKind::Session
		}

		fn create(&self, creational: &CreationalContext) -> ContextResult<BeanInstance> {
			self.0.create(creational)
		}

		fn destroy(&self, instance: BeanInstance) {
			self.0.destroy(instance);
		}

		fn call(&self, instance: &BeanInstance, method: &MethodRef, args: CallArgs) -> CallOutcome {
			self.0.call(instance, method, args)
		}
	}

	let manager = Arc::new(BeanManager::new());
	let bean: Arc<dyn Bean> = Arc::new(SessionTracker(TrackerBean::new(destroyed)));
	let creational = Arc::new(CreationalContext::new(bean.as_ref()));

	let err = SessionProxyHandler::new(bean, creational, manager).unwrap_err();

	assert!(matches!(
		err,
		ProxyError::Context(ContextError::NoContext { scope: ScopeKind::Session })
	));
}
