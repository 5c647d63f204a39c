//! Scoped elevation of call permission for guarded methods.
//!
//! Dispatching a guarded method acquires an elevation grant for the
//! duration of exactly one call; the prior state is restored when the grant
//! drops, on every exit path. Denials surface as security errors and are
//! never retried.

use std::cell::Cell;

use haricot_core::MethodRef;

use crate::error::{ProxyError, ProxyResult};

/// Decides whether a guarded method may be dispatched with elevated call
/// permission.
pub trait AccessPolicy: Send + Sync {
	fn allow(&self, method: &MethodRef) -> bool;
}

/// Policy that grants every elevation request.
pub struct AllowAll;

impl AccessPolicy for AllowAll {
	fn allow(&self, _method: &MethodRef) -> bool {
		true
	}
}

thread_local! {
	static ELEVATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// True while at least one elevation grant is live on this thread. Guarded
/// call sites check this before touching restricted state.
pub fn is_elevated() -> bool {
	ELEVATION_DEPTH.with(|depth| depth.get() > 0)
}

pub(crate) fn elevate(policy: &dyn AccessPolicy, method: &MethodRef) -> ProxyResult<AccessGrant> {
	if !policy.allow(method) {
		return Err(ProxyError::AccessDenied {
			method: method.name().to_string(),
		});
	}
	Ok(AccessGrant::acquire())
}

/// Live elevation of call permission; restores the prior state on drop.
pub struct AccessGrant {
	prior: usize,
}

impl AccessGrant {
	fn acquire() -> Self {
		let prior = ELEVATION_DEPTH.with(|depth| {
			let prior = depth.get();
			depth.set(prior + 1);
			prior
		});
		Self { prior }
	}
}

impl Drop for AccessGrant {
	fn drop(&mut self) {
		ELEVATION_DEPTH.with(|depth| depth.set(self.prior));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct DenyAll;

	impl AccessPolicy for DenyAll {
		fn allow(&self, _method: &MethodRef) -> bool {
			false
		}
	}

	#[test]
	fn test_grant_restores_prior_state_on_drop() {
		assert!(!is_elevated());
		{
			let _grant = elevate(&AllowAll, &MethodRef::business("audit").guarded()).unwrap();
			assert!(is_elevated());
			{
				let _nested = elevate(&AllowAll, &MethodRef::business("inner").guarded()).unwrap();
				assert!(is_elevated());
			}
			assert!(is_elevated());
		}
		assert!(!is_elevated());
	}

	#[test]
	fn test_denied_elevation_surfaces_as_security_error() {
		let err = elevate(&DenyAll, &MethodRef::business("audit").guarded()).unwrap_err();
		assert!(matches!(err, ProxyError::AccessDenied { method } if method == "audit"));
		assert!(!is_elevated());
	}
}
