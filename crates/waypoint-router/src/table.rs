//! Route table construction.
//!
//! The declarative tree is read into [`RouteNode`]s, which are then
//! flattened into [`RouteChain`]s: one chain per root-to-leaf path. Redirect
//! declarations are read into [`RedirectRule`]s. Both are kept together in a
//! read-only [`RouteTable`] snapshot.

use crate::guard::Guard;
use crate::path::{ParsedPath, parse_path};
use crate::source::{ATTR_COMPONENT, ATTR_FROM, ATTR_TO, ATTR_URL, Declaration, DeclarationRole};
use indexmap::IndexMap;

/// Route parameters, in declaration or extraction order.
pub type Params = IndexMap<String, String>;

/// Root-to-leaf sequence of route entries.
pub type RouteChain = Vec<RouteEntry>;

/// A node of the declared route tree.
#[derive(Clone)]
pub struct RouteNode {
	/// Pattern segments; `:name` segments are parameters.
	pub segments: Vec<String>,
	/// Lowercased component id.
	pub id: String,
	/// Static parameters from the declaration.
	pub params: Option<Params>,
	/// Guard consulted before entering.
	pub before_enter: Option<Guard>,
	/// Guard consulted before leaving.
	pub before_leave: Option<Guard>,
	/// Nested routes.
	pub children: Vec<RouteNode>,
}

impl std::fmt::Debug for RouteNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteNode")
			.field("segments", &self.segments)
			.field("id", &self.id)
			.field("params", &self.params)
			.field("has_before_enter", &self.before_enter.is_some())
			.field("has_before_leave", &self.before_leave.is_some())
			.field("children", &self.children)
			.finish()
	}
}

impl RouteNode {
	/// Creates a leaf node. The id is lowercased.
	pub fn new(id: &str, segments: Vec<String>) -> Self {
		Self {
			segments,
			id: id.to_lowercase(),
			params: None,
			before_enter: None,
			before_leave: None,
			children: Vec::new(),
		}
	}

	/// Adds a child node.
	pub fn with_child(mut self, child: RouteNode) -> Self {
		self.children.push(child);
		self
	}

	/// Converts this node to a chain entry (children dropped).
	fn to_entry(&self) -> RouteEntry {
		RouteEntry {
			id: self.id.clone(),
			segments: self.segments.clone(),
			params: self.params.clone(),
			before_enter: self.before_enter.clone(),
			before_leave: self.before_leave.clone(),
		}
	}
}

/// One level of a route chain.
#[derive(Clone)]
pub struct RouteEntry {
	/// Lowercased component id.
	pub id: String,
	/// Pattern segments (not resolved).
	pub segments: Vec<String>,
	/// Static parameters, merged with extracted ones after a match.
	pub params: Option<Params>,
	/// Guard consulted before entering.
	pub before_enter: Option<Guard>,
	/// Guard consulted before leaving.
	pub before_leave: Option<Guard>,
}

impl std::fmt::Debug for RouteEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteEntry")
			.field("id", &self.id)
			.field("segments", &self.segments)
			.field("params", &self.params)
			.field("has_before_enter", &self.before_enter.is_some())
			.field("has_before_leave", &self.before_leave.is_some())
			.finish()
	}
}

impl PartialEq for RouteEntry {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.segments == other.segments && self.params == other.params
	}
}

impl RouteEntry {
	/// Creates an entry without guards. The id is lowercased.
	pub fn new(id: &str, segments: Vec<String>, params: Option<Params>) -> Self {
		Self {
			id: id.to_lowercase(),
			segments,
			params,
			before_enter: None,
			before_leave: None,
		}
	}

	/// Returns the same entry with different parameters.
	pub(crate) fn with_params(&self, params: Option<Params>) -> Self {
		Self {
			params,
			..self.clone()
		}
	}
}

/// A redirect rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
	/// Source pattern; a `*` segment matches everything that remains.
	pub from: Vec<String>,
	/// Target path; `None` disables the rule.
	pub to: Option<ParsedPath>,
}

/// Reads route nodes from the immediate route children of `node`.
///
/// Declarations without a component are skipped along with their children.
pub fn read_route_nodes(node: &dyn Declaration) -> Vec<RouteNode> {
	node.children()
		.into_iter()
		.filter(|child| child.matches(DeclarationRole::Route))
		.filter_map(|child| {
			let component = child.attribute(ATTR_COMPONENT)?;
			let url = child.attribute(ATTR_URL);
			Some(RouteNode {
				segments: parse_path(url.as_deref()).segments,
				id: component.to_lowercase(),
				params: child.component_props(),
				before_enter: child.before_enter(),
				before_leave: child.before_leave(),
				children: read_route_nodes(child.as_ref()),
			})
		})
		.collect()
}

/// Flattens route trees into one chain per leaf, depth first.
pub fn flatten_router_tree(nodes: &[RouteNode]) -> Vec<RouteChain> {
	let mut chains = Vec::new();
	for node in nodes {
		flatten_node(&[], &mut chains, node);
	}
	chains
}

fn flatten_node(prefix: &[RouteEntry], chains: &mut Vec<RouteChain>, node: &RouteNode) {
	let mut chain = prefix.to_vec();
	chain.push(node.to_entry());

	if node.children.is_empty() {
		chains.push(chain);
		return;
	}
	for child in &node.children {
		flatten_node(&chain, chains, child);
	}
}

/// Reads the redirect rules declared as immediate children of `node`.
pub fn read_redirects(node: &dyn Declaration) -> Vec<RedirectRule> {
	node.children()
		.into_iter()
		.filter(|child| child.matches(DeclarationRole::Redirect))
		.map(|child| {
			let from = child.attribute(ATTR_FROM);
			let to = child.attribute(ATTR_TO);
			RedirectRule {
				from: parse_path(from.as_deref()).segments,
				to: to.map(|to| parse_path(Some(to.as_str()))),
			}
		})
		.collect()
}

/// Snapshot of the route chains and redirect rules of a declaration tree.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	/// Flattened route chains, in declaration order.
	pub chains: Vec<RouteChain>,
	/// Redirect rules, in declaration order.
	pub redirects: Vec<RedirectRule>,
}

impl RouteTable {
	/// Reads a table from a declaration tree.
	pub fn read(source: &dyn Declaration) -> Self {
		let table = Self {
			chains: flatten_router_tree(&read_route_nodes(source)),
			redirects: read_redirects(source),
		};
		tracing::debug!(
			chains = table.chains.len(),
			redirects = table.redirects.len(),
			"route table read"
		);
		table
	}
}
