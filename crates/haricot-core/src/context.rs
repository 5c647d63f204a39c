//! Per-scope contextual instance stores.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::bean::{Bean, BeanId, BeanInstance};
use crate::creational::CreationalContext;
use crate::error::{ContextError, ContextResult};
use crate::scope::ScopeKind;

/// One bean's slot inside a context: the creational bag plus the instance
/// once it has been produced.
struct InstanceBag {
	bean: Arc<dyn Bean>,
	creational: Arc<CreationalContext>,
	instance: Option<BeanInstance>,
}

/// Shared store for one normal scope's active boundary.
///
/// One `ScopeContext` exists per (scope kind, active boundary) pair: one
/// per in-flight request, one per session, and so on. All threads inside the
/// same boundary share it; every access checks the boundary's activity
/// first and fails with [`ContextError::NotActive`] once it has ended.
pub struct ScopeContext {
	scope: ScopeKind,
	boundary_id: Uuid,
	active: AtomicBool,
	store: RwLock<HashMap<BeanId, InstanceBag>>,
}

impl ScopeContext {
	pub fn new(scope: ScopeKind) -> Self {
		Self {
			scope,
			boundary_id: Uuid::new_v4(),
			active: AtomicBool::new(true),
			store: RwLock::new(HashMap::new()),
		}
	}

	pub fn scope(&self) -> ScopeKind {
		self.scope
	}

	/// Identifier of the boundary this context instance belongs to.
	pub fn boundary_id(&self) -> Uuid {
		self.boundary_id
	}

	pub fn is_active(&self) -> bool {
		self.active.load(Ordering::Acquire)
	}

	pub fn set_active(&self, active: bool) {
		self.active.store(active, Ordering::Release);
	}

	fn check_active(&self) -> ContextResult<()> {
		if self.is_active() {
			Ok(())
		} else {
			Err(ContextError::NotActive { scope: self.scope })
		}
	}

	/// Looks the bean up without creating.
	///
	/// `None` means the instance has not been produced in this boundary yet;
	/// callers must not treat it as an error.
	pub fn get(&self, bean: &Arc<dyn Bean>) -> ContextResult<Option<BeanInstance>> {
		self.check_active()?;
		let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
		Ok(store.get(bean.id()).and_then(|bag| bag.instance.clone()))
	}

	/// Looks the bean up, producing the instance on first access.
	///
	/// Concurrent creators for the same bean are serialized under the
	/// store's write lock: the production contract runs exactly once per
	/// boundary, and losing callers observe the winner's instance. The
	/// production contract must not resolve through this same context, or
	/// the creating thread deadlocks on its own lock.
	pub fn get_or_create(
		&self,
		bean: &Arc<dyn Bean>,
		creational: Arc<CreationalContext>,
	) -> ContextResult<BeanInstance> {
		self.check_active()?;
		if let Some(existing) = self.get(bean)? {
			return Ok(existing);
		}
		let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
		let bag = store.entry(bean.id().clone()).or_insert_with(|| InstanceBag {
			bean: bean.clone(),
			creational,
			instance: None,
		});
		if let Some(existing) = &bag.instance {
			return Ok(existing.clone());
		}
		let instance = bag.bean.create(&bag.creational)?;
		bag.instance = Some(instance.clone());
		Ok(instance)
	}

	/// Fetches the creational bag bound for a bean, if any.
	pub fn creational_context(
		&self,
		bean: &Arc<dyn Bean>,
	) -> ContextResult<Option<Arc<CreationalContext>>> {
		self.check_active()?;
		let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
		Ok(store.get(bean.id()).map(|bag| bag.creational.clone()))
	}

	/// Binds a creational bag for a bean, rebinding over a stale one.
	///
	/// Rebinding is the recovery path for proxies that outlived a destroyed
	/// and recreated boundary: the previous bag's dependents are no longer
	/// reachable for cleanup, which is acceptable because their owning
	/// boundary is gone.
	pub fn init_creational_bag(
		&self,
		bean: &Arc<dyn Bean>,
		creational: Arc<CreationalContext>,
	) -> ContextResult<()> {
		self.check_active()?;
		let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
		match store.entry(bean.id().clone()) {
			Entry::Occupied(mut bag) => {
				bag.get_mut().creational = creational;
			}
			Entry::Vacant(slot) => {
				slot.insert(InstanceBag {
					bean: bean.clone(),
					creational,
					instance: None,
				});
			}
		}
		Ok(())
	}

	/// Removes one bean's entry and destroys it.
	pub fn destroy_bean(&self, bean: &Arc<dyn Bean>) -> ContextResult<()> {
		self.check_active()?;
		let removed = {
			let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
			store.remove(bean.id())
		};
		if let Some(bag) = removed {
			destroy_bag(bag);
		}
		Ok(())
	}

	/// Releases every entry and deactivates the boundary. Called when the
	/// boundary ends; safe to call more than once.
	pub fn destroy(&self) {
		let drained: Vec<InstanceBag> = {
			let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
			store.drain().map(|(_, bag)| bag).collect()
		};
		for bag in drained {
			destroy_bag(bag);
		}
		self.set_active(false);
	}
}

fn destroy_bag(bag: InstanceBag) {
	// dependents go first, then the owning instance
	bag.creational.release();
	if let Some(instance) = bag.instance {
		bag.bean.destroy(instance);
	}
}
