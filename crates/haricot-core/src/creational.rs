//! Creational state for dependent-object graphs.

use std::sync::{Arc, Mutex, PoisonError};

use crate::bean::{Bean, BeanId, BeanInstance};

/// Bookkeeping of dependent instances created transitively while producing
/// one contextual instance.
///
/// Dependents are owned exclusively by this state. They are recorded in
/// creation order and destroyed in reverse creation order when the owning
/// instance goes away, so a child never outlives teardown of its parent's
/// graph.
pub struct CreationalContext {
	owner: BeanId,
	dependents: Mutex<Vec<(Arc<dyn Bean>, BeanInstance)>>,
}

impl CreationalContext {
	pub fn new(owner: &dyn Bean) -> Self {
		Self {
			owner: owner.id().clone(),
			dependents: Mutex::new(Vec::new()),
		}
	}

	/// Identity of the bean this state was created for.
	pub fn owner(&self) -> &BeanId {
		&self.owner
	}

	/// Records a dependent instance in creation order.
	///
	/// An instance that is already tracked is not recorded twice, so
	/// overlapping creation seams cannot double-destroy it.
	pub fn push_dependent(&self, bean: Arc<dyn Bean>, instance: BeanInstance) {
		let mut dependents = self.dependents.lock().unwrap_or_else(PoisonError::into_inner);
		if dependents.iter().any(|(_, tracked)| Arc::ptr_eq(tracked, &instance)) {
			return;
		}
		dependents.push((bean, instance));
	}

	/// Number of dependents currently tracked.
	pub fn dependent_count(&self) -> usize {
		self.dependents
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}

	/// Destroys every tracked dependent in reverse creation order and clears
	/// the state.
	pub fn release(&self) {
		let drained: Vec<_> = {
			let mut dependents = self.dependents.lock().unwrap_or_else(PoisonError::into_inner);
			dependents.drain(..).collect()
		};
		for (bean, instance) in drained.into_iter().rev() {
			bean.destroy(instance);
		}
	}
}
