//! Bean scopes and session bean kinds.

use std::fmt;

/// Lifecycle/visibility policy of a bean.
///
/// The four normal scopes resolve to a shared, lifecycle-bound
/// [`ScopeContext`](crate::ScopeContext). `Dependent` is the pseudo-scope:
/// it has no shared storage, and every injection point owns its own
/// instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
	Request,
	Session,
	Conversation,
	Application,
	Dependent,
}

impl ScopeKind {
	/// True for scopes backed by a shared, lifecycle-bound context.
	pub fn is_normal(self) -> bool {
		!matches!(self, ScopeKind::Dependent)
	}

	/// True for the dependent pseudo-scope.
	pub fn is_pseudo(self) -> bool {
		matches!(self, ScopeKind::Dependent)
	}
}

impl fmt::Display for ScopeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ScopeKind::Request => "request",
			ScopeKind::Session => "session",
			ScopeKind::Conversation => "conversation",
			ScopeKind::Application => "application",
			ScopeKind::Dependent => "dependent",
		};
		f.write_str(name)
	}
}

/// EJB session bean kind of a bean, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
	/// Not a session bean.
	None,
	Stateless,
	Stateful,
	Singleton,
}
