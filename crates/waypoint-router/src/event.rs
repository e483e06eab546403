//! Route change notifications.

/// A change of the routed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
	/// Path before the change; `None` on the first navigation.
	pub from: Option<String>,
	/// Source pattern of the redirect that was applied, if any.
	pub redirected_from: Option<String>,
	/// Path after the change.
	pub to: String,
}

/// Event broadcast by a [`Router`](crate::router::Router) around each
/// outlet write that changes the routed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
	/// Sent before the outlets are written.
	WillChange(RouteChange),
	/// Sent after the outlets were written.
	DidChange(RouteChange),
}

impl RouterEvent {
	/// Returns the change carried by the event.
	pub fn change(&self) -> &RouteChange {
		match self {
			Self::WillChange(change) | Self::DidChange(change) => change,
		}
	}
}
