//! Test doubles for router integration tests.
//!
//! Provides an in-memory outlet tree that records every write, a
//! declaration that can be edited after the router was created, and a
//! harness wiring both to a [`MemoryHistory`].

#![allow(dead_code)]

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use waypoint_router::prelude::*;
use waypoint_router::{Guard, OutletError, Params};

/// Shared, ordered log of outlet activity.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// One `set_route_id` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
	pub outlet: String,
	pub id: String,
	pub params: Option<Params>,
	pub direction: NavDirection,
	/// History fragment when the write finished, if the outlet watches a
	/// history.
	pub hash: Option<String>,
}

/// Node without outlet behaviour.
pub struct Container {
	pub children: Vec<Arc<dyn NavNode>>,
}

impl NavNode for Container {
	fn children(&self) -> Vec<Arc<dyn NavNode>> {
		self.children.clone()
	}
}

/// Outlet double.
///
/// Reports a change whenever the id or parameters differ from what it
/// currently shows. Views registered with [`TestOutlet::with_view`] are
/// returned as the element of that id, so nested outlets can be reached.
pub struct TestOutlet {
	name: String,
	role: OutletRole,
	views: HashMap<String, Arc<dyn NavNode>>,
	current: Mutex<Option<(String, Option<Params>)>>,
	writes: Mutex<Vec<WriteRecord>>,
	log: EventLog,
	delay: Option<Duration>,
	history: Option<Arc<MemoryHistory>>,
}

impl TestOutlet {
	pub fn new(name: &str, role: OutletRole, log: &EventLog) -> Self {
		Self {
			name: name.to_string(),
			role,
			views: HashMap::new(),
			current: Mutex::new(None),
			writes: Mutex::new(Vec::new()),
			log: Arc::clone(log),
			delay: None,
			history: None,
		}
	}

	pub fn with_view(mut self, id: &str, element: Arc<dyn NavNode>) -> Self {
		self.views.insert(id.to_string(), element);
		self
	}

	/// Makes every write take `delay` to complete.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	/// Records the fragment of `history` at the end of every write.
	pub fn with_history(mut self, history: &Arc<MemoryHistory>) -> Self {
		self.history = Some(Arc::clone(history));
		self
	}

	/// Changes the displayed view without going through the router.
	pub fn show(&self, id: &str, params: Option<Params>) {
		*self.current.lock() = Some((id.to_string(), params));
	}

	pub fn current_id(&self) -> Option<String> {
		self.current.lock().as_ref().map(|(id, _)| id.clone())
	}

	pub fn current_params(&self) -> Option<Params> {
		self.current.lock().as_ref().and_then(|(_, params)| params.clone())
	}

	pub fn writes(&self) -> Vec<WriteRecord> {
		self.writes.lock().clone()
	}

	pub fn last_write(&self) -> Option<WriteRecord> {
		self.writes.lock().last().cloned()
	}
}

impl NavNode for TestOutlet {
	fn matches(&self, role: OutletRole) -> bool {
		self.role == role
	}

	fn as_outlet(&self) -> Option<&dyn Outlet> {
		Some(self)
	}

	fn children(&self) -> Vec<Arc<dyn NavNode>> {
		Vec::new()
	}
}

#[async_trait]
impl Outlet for TestOutlet {
	async fn get_route_id(&self) -> Option<RouteId> {
		let (id, params) = self.current.lock().clone()?;
		Some(RouteId {
			element: self.views.get(&id).cloned(),
			id,
			params,
		})
	}

	async fn set_route_id(
		&self,
		id: &str,
		params: Option<&Params>,
		direction: NavDirection,
		_animation: Option<&str>,
	) -> Result<RouteWrite, OutletError> {
		self.log.lock().push(format!("start {} {}", self.name, id));
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		self.writes.lock().push(WriteRecord {
			outlet: self.name.clone(),
			id: id.to_string(),
			params: params.cloned(),
			direction,
			hash: self.history.as_ref().map(|history| history.location().hash),
		});

		let next = (id.to_string(), params.cloned());
		let changed = self.current.lock().as_ref() != Some(&next);
		*self.current.lock() = Some(next);
		self.log.lock().push(format!("end {} {}", self.name, id));

		let log = Arc::clone(&self.log);
		let visible = format!("visible {} {}", self.name, id);
		Ok(RouteWrite {
			changed,
			element: self.views.get(id).cloned(),
			mark_visible: Some(Box::new(move || {
				async move {
					log.lock().push(visible);
				}
				.boxed()
			})),
		})
	}
}

/// Declaration whose content can be replaced while a router reads it.
#[derive(Default)]
pub struct SharedDeclaration {
	inner: RwLock<StaticDeclaration>,
}

impl SharedDeclaration {
	pub fn new(declaration: StaticDeclaration) -> Self {
		Self {
			inner: RwLock::new(declaration),
		}
	}

	pub fn replace(&self, declaration: StaticDeclaration) {
		*self.inner.write() = declaration;
	}
}

impl Declaration for SharedDeclaration {
	fn matches(&self, role: waypoint_router::DeclarationRole) -> bool {
		self.inner.read().matches(role)
	}

	fn children(&self) -> Vec<Arc<dyn Declaration>> {
		self.inner.read().children()
	}

	fn attribute(&self, name: &str) -> Option<String> {
		self.inner.read().attribute(name)
	}

	fn component_props(&self) -> Option<Params> {
		self.inner.read().component_props()
	}

	fn before_enter(&self) -> Option<Guard> {
		self.inner.read().before_enter()
	}

	fn before_leave(&self) -> Option<Guard> {
		self.inner.read().before_leave()
	}
}

/// Default route set: a tab container with nested pages plus two
/// top-level pages and redirects.
pub fn tab_routes() -> StaticDeclaration {
	StaticDeclaration::root()
		.child(StaticDeclaration::redirect("/", Some("/tabs/home")))
		.child(StaticDeclaration::redirect("/old/*", Some("/tabs/settings")))
		.child(
			StaticDeclaration::route("/tabs", "app-tabs")
				.child(StaticDeclaration::route("/home", "page-home"))
				.child(StaticDeclaration::route("/settings", "page-settings"))
				.child(StaticDeclaration::route("/users/:id", "page-user")),
		)
		.child(StaticDeclaration::route("/login", "page-login"))
}

/// Router wired to a two level outlet tree and an in-memory history.
pub struct Harness {
	pub router: Arc<Router>,
	pub history: Arc<MemoryHistory>,
	pub source: Arc<SharedDeclaration>,
	/// Root outlet, displays `app-tabs` and top-level pages.
	pub tabs: Arc<TestOutlet>,
	/// Nested outlet inside `app-tabs`.
	pub pages: Arc<TestOutlet>,
	pub log: EventLog,
}

pub struct HarnessBuilder {
	config: RouterConfig,
	routes: StaticDeclaration,
	href: String,
	page_delay: Option<Duration>,
}

impl HarnessBuilder {
	pub fn config(mut self, config: RouterConfig) -> Self {
		self.config = config;
		self
	}

	pub fn routes(mut self, routes: StaticDeclaration) -> Self {
		self.routes = routes;
		self
	}

	pub fn href(mut self, href: &str) -> Self {
		self.href = href.to_string();
		self
	}

	pub fn page_delay(mut self, delay: Duration) -> Self {
		self.page_delay = Some(delay);
		self
	}

	pub fn build(self) -> Harness {
		let log: EventLog = Arc::new(Mutex::new(Vec::new()));
		let history = Arc::new(MemoryHistory::new(&self.href));

		let mut pages =
			TestOutlet::new("pages", OutletRole::RouterOutlet, &log).with_history(&history);
		if let Some(delay) = self.page_delay {
			pages = pages.with_delay(delay);
		}
		let pages = Arc::new(pages);
		let tabs = Arc::new(
			TestOutlet::new("tabs", OutletRole::Tabs, &log)
				.with_history(&history)
				.with_view("app-tabs", Arc::clone(&pages) as Arc<dyn NavNode>),
		);
		let root: Arc<dyn NavNode> = Arc::new(Container {
			children: vec![Arc::clone(&tabs) as Arc<dyn NavNode>],
		});

		let source = Arc::new(SharedDeclaration::new(self.routes));
		let router = Arc::new(Router::new(
			self.config,
			Arc::clone(&source) as Arc<dyn Declaration>,
			root,
			Arc::clone(&history) as Arc<dyn History>,
		));

		Harness {
			router,
			history,
			source,
			tabs,
			pages,
			log,
		}
	}
}

impl Harness {
	pub fn builder() -> HarnessBuilder {
		HarnessBuilder {
			config: RouterConfig::default(),
			routes: tab_routes(),
			href: "/".to_string(),
			page_delay: None,
		}
	}

	/// Harness with the default routes, started at the root.
	pub async fn started() -> Harness {
		let harness = Harness::builder().build();
		assert!(harness.router.start().await);
		harness
	}

	/// Full href of the current history entry.
	pub fn url(&self) -> String {
		self.history.location().href()
	}

	/// Fragment of the current history entry, where hash mode keeps the path.
	pub fn hash(&self) -> String {
		self.history.location().hash
	}

	pub fn log(&self) -> Vec<String> {
		self.log.lock().clone()
	}

	pub fn clear_log(&self) {
		self.log.lock().clear();
	}
}
