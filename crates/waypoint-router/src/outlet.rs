//! Outlet tree and the navigation state protocol.
//!
//! Outlets are the nested containers that display one active view each.
//! The router writes a matched chain into them level by level
//! ([`write_nav_state`]) and can read the ids they currently show back
//! ([`read_nav_state`]).

use crate::error::{OutletError, RouterResult};
use crate::history::NavDirection;
use crate::table::{Params, RouteEntry};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;

/// The kinds of node that act as an outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutletRole {
	/// Stack navigation container.
	Nav,
	/// Tab container.
	Tabs,
	/// Plain router outlet.
	RouterOutlet,
}

impl OutletRole {
	/// Every recognized outlet role.
	pub const ALL: [OutletRole; 3] = [OutletRole::Nav, OutletRole::Tabs, OutletRole::RouterOutlet];
}

/// A node of the tree that hosts outlets.
pub trait NavNode: Send + Sync {
	/// Returns whether this node has the given outlet role.
	fn matches(&self, role: OutletRole) -> bool {
		let _ = role;
		false
	}

	/// Returns whether the node opted out of routing.
	fn is_router_disabled(&self) -> bool {
		false
	}

	/// Returns the outlet behaviour of this node, if it has one.
	fn as_outlet(&self) -> Option<&dyn Outlet> {
		None
	}

	/// Returns the child nodes, in document order.
	fn children(&self) -> Vec<Arc<dyn NavNode>>;
}

/// Route id reported by an outlet.
#[derive(Clone)]
pub struct RouteId {
	/// Component id currently shown.
	pub id: String,
	/// Parameters of the shown component.
	pub params: Option<Params>,
	/// Root of the shown view, where nested outlets live.
	pub element: Option<Arc<dyn NavNode>>,
}

impl std::fmt::Debug for RouteId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteId")
			.field("id", &self.id)
			.field("params", &self.params)
			.field("has_element", &self.element.is_some())
			.finish()
	}
}

/// Callback that reveals a view once its nested outlets are written.
pub type MarkVisible = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Outcome of [`Outlet::set_route_id`].
#[derive(Default)]
pub struct RouteWrite {
	/// Whether the outlet swapped its displayed view.
	pub changed: bool,
	/// Root of the displayed view, where nested outlets live.
	pub element: Option<Arc<dyn NavNode>>,
	/// Called after the nested outlets were written.
	pub mark_visible: Option<MarkVisible>,
}

impl std::fmt::Debug for RouteWrite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteWrite")
			.field("changed", &self.changed)
			.field("has_element", &self.element.is_some())
			.field("has_mark_visible", &self.mark_visible.is_some())
			.finish()
	}
}

/// A container displaying one active nested view.
#[async_trait]
pub trait Outlet: Send + Sync {
	/// Resolves once the outlet can accept route ids.
	async fn ready(&self) {}

	/// Returns the route id currently displayed, if any.
	async fn get_route_id(&self) -> Option<RouteId>;

	/// Displays `id` with `params`.
	async fn set_route_id(
		&self,
		id: &str,
		params: Option<&Params>,
		direction: NavDirection,
		animation: Option<&str>,
	) -> Result<RouteWrite, OutletError>;
}

fn is_outlet(node: &dyn NavNode) -> bool {
	!node.is_router_disabled()
		&& node.as_outlet().is_some()
		&& OutletRole::ALL.iter().any(|role| node.matches(*role))
}

/// Finds the outlet at or below `root`, in pre-order.
pub fn search_outlet(root: &Arc<dyn NavNode>) -> Option<Arc<dyn NavNode>> {
	if is_outlet(root.as_ref()) {
		return Some(Arc::clone(root));
	}
	root.children().iter().find_map(search_outlet)
}

/// Writes `chain[index..]` into the outlets below `root`.
///
/// Returns whether any outlet changed its view. Below an outlet that
/// changed, deeper outlets receive [`NavDirection::None`]. Each level's
/// `mark_visible` runs after every deeper level was written. A failing
/// outlet is logged and makes its level report `false`.
pub fn write_nav_state<'a>(
	root: Option<Arc<dyn NavNode>>,
	chain: &'a [RouteEntry],
	direction: NavDirection,
	index: usize,
	changed: bool,
	animation: Option<&'a str>,
) -> BoxFuture<'a, bool> {
	async move {
		match write_level(root, chain, direction, index, changed, animation).await {
			Ok(changed) => changed,
			Err(e) => {
				tracing::error!(index, error = %e, "failed to write navigation state");
				false
			}
		}
	}
	.boxed()
}

async fn write_level(
	root: Option<Arc<dyn NavNode>>,
	chain: &[RouteEntry],
	mut direction: NavDirection,
	index: usize,
	mut changed: bool,
	animation: Option<&str>,
) -> RouterResult<bool> {
	let Some(node) = root.as_ref().and_then(search_outlet) else {
		return Ok(changed);
	};
	if index >= chain.len() {
		return Ok(changed);
	}
	let Some(outlet) = node.as_outlet() else {
		return Ok(changed);
	};

	outlet.ready().await;
	let route = &chain[index];
	let result = outlet
		.set_route_id(&route.id, route.params.as_ref(), direction, animation)
		.await?;
	tracing::debug!(index, id = %route.id, changed = result.changed, "outlet updated");

	if result.changed {
		direction = NavDirection::None;
		changed = true;
	}

	let changed = write_nav_state(result.element, chain, direction, index + 1, changed, animation).await;

	if let Some(mark_visible) = result.mark_visible {
		mark_visible().await;
	}
	Ok(changed)
}

/// Route ids shown by the nested outlets, root first.
#[derive(Default)]
pub struct NavState {
	/// Ids reported by each outlet, with elements stripped.
	pub ids: Vec<RouteId>,
	/// First outlet that reported no id.
	pub outlet: Option<Arc<dyn NavNode>>,
}

impl std::fmt::Debug for NavState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavState")
			.field("ids", &self.ids)
			.field("has_outlet", &self.outlet.is_some())
			.finish()
	}
}

/// Reads the ids shown by the successively nested outlets below `root`.
pub async fn read_nav_state(root: Arc<dyn NavNode>) -> NavState {
	let mut ids = Vec::new();
	let mut node = Some(root);

	while let Some(outlet_node) = node.as_ref().and_then(search_outlet) {
		let reported = match outlet_node.as_outlet() {
			Some(outlet) => outlet.get_route_id().await,
			None => None,
		};
		match reported {
			Some(mut id) => {
				node = id.element.take();
				ids.push(id);
			}
			None => {
				return NavState {
					ids,
					outlet: Some(outlet_node),
				};
			}
		}
	}

	NavState { ids, outlet: None }
}
