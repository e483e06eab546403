//! Declarative route source.
//!
//! The router reads its route and redirect definitions from a tree of
//! declarations. [`Declaration`] is the capability the tree must expose;
//! [`StaticDeclaration`] is an in-memory implementation built in code.

use crate::guard::Guard;
use crate::table::Params;
use std::collections::HashMap;
use std::sync::Arc;

/// Attribute holding a route's path pattern.
pub const ATTR_URL: &str = "url";
/// Attribute holding a route's component id.
pub const ATTR_COMPONENT: &str = "component";
/// Attribute holding a redirect's source pattern.
pub const ATTR_FROM: &str = "from";
/// Attribute holding a redirect's target path.
pub const ATTR_TO: &str = "to";

/// Kind of declaration a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationRole {
	/// A route definition (`url`, `component`, props and guards).
	Route,
	/// A redirect definition (`from`, `to`).
	Redirect,
}

/// A node of the declarative route tree.
pub trait Declaration: Send + Sync {
	/// Returns whether this node has the given role.
	fn matches(&self, role: DeclarationRole) -> bool;

	/// Returns the immediate child declarations, in document order.
	fn children(&self) -> Vec<Arc<dyn Declaration>>;

	/// Returns a string attribute such as [`ATTR_URL`] or [`ATTR_COMPONENT`].
	fn attribute(&self, name: &str) -> Option<String>;

	/// Static parameters handed to the component.
	fn component_props(&self) -> Option<Params> {
		None
	}

	/// Guard consulted before this route is entered.
	fn before_enter(&self) -> Option<Guard> {
		None
	}

	/// Guard consulted before this route is left.
	fn before_leave(&self) -> Option<Guard> {
		None
	}
}

/// In-memory declaration tree.
///
/// # Example
///
/// ```
/// use waypoint_router::source::StaticDeclaration;
///
/// let root = StaticDeclaration::root()
///     .child(StaticDeclaration::redirect("/", Some("/tabs")))
///     .child(
///         StaticDeclaration::route("/tabs", "app-tabs")
///             .child(StaticDeclaration::route("/home", "page-home")),
///     );
/// assert_eq!(root.child_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StaticDeclaration {
	role: Option<DeclarationRole>,
	attributes: HashMap<String, String>,
	props: Option<Params>,
	before_enter: Option<Guard>,
	before_leave: Option<Guard>,
	children: Vec<Arc<dyn Declaration>>,
}

impl std::fmt::Debug for StaticDeclaration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticDeclaration")
			.field("role", &self.role)
			.field("attributes", &self.attributes)
			.field("props", &self.props)
			.field("has_before_enter", &self.before_enter.is_some())
			.field("has_before_leave", &self.before_leave.is_some())
			.field("children", &self.children.len())
			.finish()
	}
}

impl StaticDeclaration {
	/// Creates a container without a role, typically the router element.
	pub fn root() -> Self {
		Self::default()
	}

	/// Creates a route declaration.
	pub fn route(url: impl Into<String>, component: impl Into<String>) -> Self {
		Self::root()
			.with_role(DeclarationRole::Route)
			.attr(ATTR_URL, url)
			.attr(ATTR_COMPONENT, component)
	}

	/// Creates a route declaration that has no component.
	///
	/// Such routes are ignored by the table builder, children included.
	pub fn route_without_component(url: impl Into<String>) -> Self {
		Self::root()
			.with_role(DeclarationRole::Route)
			.attr(ATTR_URL, url)
	}

	/// Creates a redirect declaration. A `None` target disables the redirect.
	pub fn redirect(from: impl Into<String>, to: Option<&str>) -> Self {
		let decl = Self::root()
			.with_role(DeclarationRole::Redirect)
			.attr(ATTR_FROM, from);
		match to {
			Some(to) => decl.attr(ATTR_TO, to),
			None => decl,
		}
	}

	/// Sets the role.
	pub fn with_role(mut self, role: DeclarationRole) -> Self {
		self.role = Some(role);
		self
	}

	/// Sets a string attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	/// Adds a static component parameter.
	pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.props
			.get_or_insert_with(Params::new)
			.insert(key.into(), value.into());
		self
	}

	/// Sets the `before_enter` guard.
	pub fn with_before_enter(mut self, guard: Guard) -> Self {
		self.before_enter = Some(guard);
		self
	}

	/// Sets the `before_leave` guard.
	pub fn with_before_leave(mut self, guard: Guard) -> Self {
		self.before_leave = Some(guard);
		self
	}

	/// Appends a child declaration.
	pub fn child(mut self, child: impl Declaration + 'static) -> Self {
		self.children.push(Arc::new(child));
		self
	}

	/// Appends an already shared child declaration.
	pub fn shared_child(mut self, child: Arc<dyn Declaration>) -> Self {
		self.children.push(child);
		self
	}

	/// Returns the number of immediate children.
	pub fn child_count(&self) -> usize {
		self.children.len()
	}
}

impl Declaration for StaticDeclaration {
	fn matches(&self, role: DeclarationRole) -> bool {
		self.role == Some(role)
	}

	fn children(&self) -> Vec<Arc<dyn Declaration>> {
		self.children.clone()
	}

	fn attribute(&self, name: &str) -> Option<String> {
		self.attributes.get(name).cloned()
	}

	fn component_props(&self) -> Option<Params> {
		self.props.clone()
	}

	fn before_enter(&self) -> Option<Guard> {
		self.before_enter.clone()
	}

	fn before_leave(&self) -> Option<Guard> {
		self.before_leave.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::guard::{NavigationHookResult, guard_fn};
	use rstest::rstest;

	#[rstest]
	fn test_route_declaration_attributes() {
		let decl = StaticDeclaration::route("/users/:id", "page-user").prop("mode", "ios");

		assert!(decl.matches(DeclarationRole::Route));
		assert!(!decl.matches(DeclarationRole::Redirect));
		assert_eq!(decl.attribute(ATTR_URL).as_deref(), Some("/users/:id"));
		assert_eq!(decl.attribute(ATTR_COMPONENT).as_deref(), Some("page-user"));
		assert_eq!(
			decl.component_props().unwrap().get("mode").map(String::as_str),
			Some("ios")
		);
	}

	#[rstest]
	fn test_redirect_declaration_without_target() {
		let decl = StaticDeclaration::redirect("/old", None);

		assert!(decl.matches(DeclarationRole::Redirect));
		assert_eq!(decl.attribute(ATTR_FROM).as_deref(), Some("/old"));
		assert!(decl.attribute(ATTR_TO).is_none());
	}

	#[rstest]
	fn test_guards_are_exposed() {
		let decl = StaticDeclaration::route("/", "page-home")
			.with_before_enter(guard_fn(|| async { NavigationHookResult::Deny }));

		assert!(decl.before_enter().is_some());
		assert!(decl.before_leave().is_none());
	}

	#[rstest]
	fn test_root_has_no_role() {
		let root = StaticDeclaration::root().child(StaticDeclaration::route("/", "page-home"));

		assert!(!root.matches(DeclarationRole::Route));
		assert_eq!(root.children().len(), 1);
	}
}
