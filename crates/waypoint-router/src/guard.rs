//! Navigation guards.
//!
//! A guard is consulted before a route is entered (`before_enter`) or left
//! (`before_leave`). It may let the navigation proceed, deny it, or redirect
//! it to another path.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Decision returned by a navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationHookResult {
	/// Continue with the navigation.
	Proceed,
	/// Cancel the navigation.
	Deny,
	/// Navigate to this path instead.
	Redirect(String),
}

impl NavigationHookResult {
	/// Creates a redirect result.
	pub fn redirect(path: impl Into<String>) -> Self {
		Self::Redirect(path.into())
	}

	/// Returns whether the navigation may continue unchanged.
	pub fn is_proceed(&self) -> bool {
		matches!(self, Self::Proceed)
	}
}

impl From<bool> for NavigationHookResult {
	fn from(allowed: bool) -> Self {
		if allowed { Self::Proceed } else { Self::Deny }
	}
}

/// Asynchronous navigation guard.
///
/// Implemented for any `Fn() -> impl Future<Output = NavigationHookResult>`,
/// so async closures can be used directly.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
	/// Decides whether the navigation may continue.
	async fn check(&self) -> NavigationHookResult;
}

#[async_trait]
impl<F, Fut> NavigationGuard for F
where
	F: Fn() -> Fut + Send + Sync,
	Fut: Future<Output = NavigationHookResult> + Send + 'static,
{
	async fn check(&self) -> NavigationHookResult {
		(self)().await
	}
}

/// Shared guard handle stored on route entries.
pub type Guard = Arc<dyn NavigationGuard>;

/// Wraps an async closure into a [`Guard`].
///
/// # Example
///
/// ```
/// use waypoint_router::guard::{NavigationHookResult, guard_fn};
///
/// let guard = guard_fn(|| async { NavigationHookResult::redirect("/login") });
/// ```
pub fn guard_fn<F, Fut>(f: F) -> Guard
where
	F: Fn() -> Fut + Send + Sync + 'static,
	Fut: Future<Output = NavigationHookResult> + Send + 'static,
{
	Arc::new(f)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(true, NavigationHookResult::Proceed)]
	#[case(false, NavigationHookResult::Deny)]
	fn test_from_bool(#[case] allowed: bool, #[case] expected: NavigationHookResult) {
		assert_eq!(NavigationHookResult::from(allowed), expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_closure_guard() {
		let guard = guard_fn(|| async { NavigationHookResult::redirect("/login") });

		assert_eq!(
			guard.check().await,
			NavigationHookResult::Redirect("/login".to_string())
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_custom_guard_type() {
		struct AllowAll;

		#[async_trait]
		impl NavigationGuard for AllowAll {
			async fn check(&self) -> NavigationHookResult {
				NavigationHookResult::Proceed
			}
		}

		let guard: Guard = Arc::new(AllowAll);
		assert!(guard.check().await.is_proceed());
	}
}
