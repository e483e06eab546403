//! The router: drives navigation between the history, the route table and
//! the outlet tree.
//!
//! Every navigation holds a FIFO async lock from its guards through the
//! history update and the outlet write, so concurrent navigations are
//! applied one after the other in the order they were issued. A busy flag
//! additionally rejects writes that re-enter the router while a write is in
//! flight.

use crate::config::RouterConfig;
use crate::debug::{describe_redirects, describe_routes};
use crate::error::RouterError;
use crate::event::{RouteChange, RouterEvent};
use crate::guard::NavigationHookResult;
use crate::history::{History, HistoryTracker, NavDirection};
use crate::matching::{find_chain_for_ids, find_chain_for_segments, find_route_redirect};
use crate::outlet::{NavNode, NavState, read_nav_state, write_nav_state};
use crate::path::{
	chain_to_segments, generate_path, parse_path, read_segments, resolve_path, write_segments,
};
use crate::source::Declaration;
use crate::table::{RouteEntry, RouteTable};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct NavigationState {
	previous_path: Option<String>,
	tracker: HistoryTracker,
}

/// Clears the busy flag when the write finishes or is dropped.
struct BusyFlag<'a>(&'a AtomicBool);

impl<'a> BusyFlag<'a> {
	fn acquire(flag: &'a AtomicBool) -> Option<Self> {
		(!flag.swap(true, Ordering::AcqRel)).then_some(Self(flag))
	}
}

impl Drop for BusyFlag<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// Nested-outlet router.
///
/// Reads its routes and redirects from a [`Declaration`] tree, keeps the
/// location in a [`History`] and displays matched chains in the outlets
/// found below a [`NavNode`] root.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use waypoint_router::config::RouterConfig;
/// use waypoint_router::history::MemoryHistory;
/// use waypoint_router::outlet::NavNode;
/// use waypoint_router::router::Router;
/// use waypoint_router::source::StaticDeclaration;
///
/// struct Empty;
///
/// impl NavNode for Empty {
///     fn children(&self) -> Vec<Arc<dyn NavNode>> {
///         Vec::new()
///     }
/// }
///
/// let routes = StaticDeclaration::root().child(StaticDeclaration::route("/home", "page-home"));
/// let router = Router::new(
///     RouterConfig::default(),
///     Arc::new(routes),
///     Arc::new(Empty),
///     Arc::new(MemoryHistory::default()),
/// );
/// assert_eq!(router.table().chains.len(), 1);
/// ```
pub struct Router {
	config: RouterConfig,
	source: Arc<dyn Declaration>,
	root: Arc<dyn NavNode>,
	history: Arc<dyn History>,
	table: RwLock<Arc<RouteTable>>,
	state: Mutex<NavigationState>,
	busy: AtomicBool,
	lock: tokio::sync::Mutex<()>,
	events: broadcast::Sender<RouterEvent>,
	route_generation: AtomicU64,
	redirect_generation: AtomicU64,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("config", &self.config)
			.field("table", &self.table.read())
			.field("previous_path", &self.state.lock().previous_path)
			.field("busy", &self.is_busy())
			.finish()
	}
}

impl Router {
	/// Creates a router and reads the route table from `source`.
	pub fn new(
		config: RouterConfig,
		source: Arc<dyn Declaration>,
		root: Arc<dyn NavNode>,
		history: Arc<dyn History>,
	) -> Self {
		let table = RouteTable::read(source.as_ref());
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Self {
			config,
			source,
			root,
			history,
			table: RwLock::new(Arc::new(table)),
			state: Mutex::new(NavigationState::default()),
			busy: AtomicBool::new(false),
			lock: tokio::sync::Mutex::new(()),
			events,
			route_generation: AtomicU64::new(0),
			redirect_generation: AtomicU64::new(0),
		}
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	/// Returns the current route table snapshot.
	pub fn table(&self) -> Arc<RouteTable> {
		Arc::clone(&self.table.read())
	}

	/// Returns the last path written to the outlets.
	pub fn previous_path(&self) -> Option<String> {
		self.state.lock().previous_path.clone()
	}

	/// Returns whether an outlet write is in flight.
	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::Acquire)
	}

	/// Subscribes to route change events.
	pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
		self.events.subscribe()
	}

	/// Performs the initial navigation to the current location.
	///
	/// A guard redirect rewrites the history entry and navigates to the
	/// target; a denial leaves the outlets untouched.
	pub async fn start(&self) -> bool {
		let _lock = self.lock.lock().await;
		match self.run_guards(None, None).await {
			NavigationHookResult::Proceed => self.reload_and_navigate().await,
			NavigationHookResult::Redirect(path) => {
				let parsed = parse_path(Some(path.as_str()));
				self.set_segments(
					&parsed.segments,
					NavDirection::None,
					parsed.query_string.as_deref(),
				);
				self.write_nav_state_root(Some(parsed.segments), NavDirection::None, None)
					.await
			}
			NavigationHookResult::Deny => {
				tracing::debug!("initial navigation denied by guard");
				false
			}
		}
	}

	/// Navigates to `path`.
	///
	/// Paths starting with `.` are resolved against the previous path. The
	/// guards run first and may deny or redirect the navigation. Waits for
	/// earlier navigations to finish before doing either.
	pub async fn push(&self, path: &str, direction: NavDirection, animation: Option<&str>) -> bool {
		let _lock = self.lock.lock().await;
		let mut path = path.to_string();
		if path.starts_with('.') {
			let current = self.previous_path().unwrap_or_else(|| "/".to_string());
			path = match resolve_path(&current, &path) {
				Ok(resolved) => resolved,
				Err(e) => {
					tracing::warn!(error = %e, "push cancelled");
					return false;
				}
			};
		}

		let mut parsed = parse_path(Some(path.as_str()));
		match self.run_guards(Some(parsed.segments.clone()), None).await {
			NavigationHookResult::Proceed => {}
			NavigationHookResult::Deny => return false,
			NavigationHookResult::Redirect(target) => parsed = parse_path(Some(target.as_str())),
		}

		self.set_segments(&parsed.segments, direction, parsed.query_string.as_deref());
		self.write_nav_state_root(Some(parsed.segments), direction, animation)
			.await
	}

	/// Goes back one history entry and waits for the in-flight navigation.
	///
	/// The resulting pop is expected to be reported through
	/// [`Router::pop_state`] by whoever owns the history.
	pub async fn back(&self) {
		self.history.back();
		drop(self.lock.lock().await);
	}

	/// Handles a history pop.
	pub async fn pop_state(&self) -> bool {
		let _lock = self.lock.lock().await;
		let direction = self.history_direction();
		let mut segments = self.get_segments();
		match self.run_guards(segments.clone(), None).await {
			NavigationHookResult::Proceed => {}
			NavigationHookResult::Deny => return false,
			NavigationHookResult::Redirect(target) => {
				segments = Some(parse_path(Some(target.as_str())).segments);
			}
		}
		self.write_nav_state_root(segments, direction, None).await
	}

	/// Reconciles the history with a change made inside the outlets.
	///
	/// Reads the ids the outlets display, finds the chain they agree with
	/// and rewrites the history entry to its path. Outlets below the last
	/// one that reported an id are then filled in. Guards are not consulted.
	pub async fn nav_changed(&self, direction: NavDirection) -> bool {
		if self.is_busy() {
			tracing::warn!(error = %RouterError::Busy("nav_changed"), "outlet change ignored");
			return false;
		}

		let _lock = self.lock.lock().await;
		let NavState { ids, outlet } = read_nav_state(Arc::clone(&self.root)).await;
		let table = self.table();
		let Some(chain) = find_chain_for_ids(&ids, &table.chains) else {
			let error = RouterError::NoMatchingIds(ids.iter().map(|id| id.id.clone()).collect());
			tracing::warn!(error = %error, "outlet change ignored");
			return false;
		};
		let Some(segments) = chain_to_segments(&chain) else {
			tracing::warn!(error = %RouterError::MissingParameter, "outlet change ignored");
			return false;
		};

		self.set_segments(&segments, direction, None);
		self.write_outlets(
			outlet,
			&chain,
			NavDirection::None,
			&segments,
			None,
			ids.len(),
			None,
		)
		.await;
		true
	}

	/// Runs the guards of a navigation from `from` to `to`.
	///
	/// `to` defaults to the current location and `from` to the previous
	/// path. The `before_leave` guard of the chain being left runs first; a
	/// denial or redirect from it is returned without consulting the
	/// `before_enter` guard of the chain being entered.
	pub async fn run_guards(
		&self,
		to: Option<Vec<String>>,
		from: Option<Vec<String>>,
	) -> NavigationHookResult {
		let Some(to) = to.or_else(|| self.get_segments()) else {
			return NavigationHookResult::Proceed;
		};
		let from = from.unwrap_or_else(|| parse_path(self.previous_path().as_deref()).segments);

		let table = self.table();
		let from_chain = find_chain_for_segments(&from, &table.chains);
		let to_chain = find_chain_for_segments(&to, &table.chains);

		let before_leave = from_chain
			.as_ref()
			.and_then(|chain| chain.last())
			.and_then(|entry| entry.before_leave.clone());
		if let Some(guard) = before_leave {
			let result = guard.check().await;
			if !result.is_proceed() {
				tracing::debug!(?result, "before_leave guard stopped navigation");
				return result;
			}
		}

		let before_enter = to_chain
			.as_ref()
			.and_then(|chain| chain.last())
			.and_then(|entry| entry.before_enter.clone());
		match before_enter {
			Some(guard) => guard.check().await,
			None => NavigationHookResult::Proceed,
		}
	}

	/// Returns whether leaving the current location is allowed.
	pub async fn can_transition(&self) -> NavigationHookResult {
		self.run_guards(None, None).await
	}

	/// Re-reads the route table and navigates to the current location.
	pub async fn routes_changed(&self) -> bool {
		let _lock = self.lock.lock().await;
		self.reload_and_navigate().await
	}

	/// Re-reads the route table and navigates again if a redirect now
	/// applies to the current location.
	pub async fn redirects_changed(&self) -> bool {
		let _lock = self.lock.lock().await;
		let table = self.reload_table();
		match self.get_segments() {
			Some(segments) if find_route_redirect(&segments, &table.redirects).is_some() => {
				self.write_nav_state_root(Some(segments), NavDirection::None, None)
					.await
			}
			_ => false,
		}
	}

	/// Schedules [`Router::routes_changed`] after the configured delay.
	///
	/// A later call supersedes a pending one, whose task then resolves to
	/// `false` without navigating.
	pub fn notify_routes_changed(self: &Arc<Self>) -> JoinHandle<bool> {
		let generation = self.route_generation.fetch_add(1, Ordering::AcqRel) + 1;
		let router = Arc::clone(self);
		Self::debounce(self.config.route_debounce(), async move {
			if router.route_generation.load(Ordering::Acquire) != generation {
				return false;
			}
			router.routes_changed().await
		})
	}

	/// Schedules [`Router::redirects_changed`] after the configured delay.
	pub fn notify_redirects_changed(self: &Arc<Self>) -> JoinHandle<bool> {
		let generation = self.redirect_generation.fetch_add(1, Ordering::AcqRel) + 1;
		let router = Arc::clone(self);
		Self::debounce(self.config.redirect_debounce(), async move {
			if router.redirect_generation.load(Ordering::Acquire) != generation {
				return false;
			}
			router.redirects_changed().await
		})
	}

	fn debounce<F>(delay: Duration, task: F) -> JoinHandle<bool>
	where
		F: std::future::Future<Output = bool> + Send + 'static,
	{
		tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			task.await
		})
	}

	/// Logs the route chains and redirects at debug level.
	pub fn print_debug(&self) {
		let table = self.table();
		for line in describe_routes(&table.chains) {
			tracing::debug!(route = %line, "route");
		}
		for line in describe_redirects(&table.redirects) {
			tracing::debug!(redirect = %line, "redirect");
		}
	}

	/// Expects the navigation lock to be held.
	async fn reload_and_navigate(&self) -> bool {
		self.reload_table();
		self.write_nav_state_root(self.get_segments(), NavDirection::None, None)
			.await
	}

	fn reload_table(&self) -> Arc<RouteTable> {
		let table = Arc::new(RouteTable::read(self.source.as_ref()));
		*self.table.write() = Arc::clone(&table);
		table
	}

	fn history_direction(&self) -> NavDirection {
		self.state.lock().tracker.direction(self.history.as_ref())
	}

	fn get_segments(&self) -> Option<Vec<String>> {
		read_segments(
			&self.history.location(),
			&self.config.root,
			self.config.use_hash,
		)
	}

	fn set_segments(&self, segments: &[String], direction: NavDirection, query_string: Option<&str>) {
		let state = self.state.lock().tracker.next_state();
		write_segments(
			self.history.as_ref(),
			&self.config.root,
			self.config.use_hash,
			segments,
			direction,
			state,
			query_string,
		);
	}

	/// Resolves `segments` (after redirects) and writes the chain from the
	/// root of the outlet tree. Expects the navigation lock to be held.
	async fn write_nav_state_root(
		&self,
		segments: Option<Vec<String>>,
		direction: NavDirection,
		animation: Option<&str>,
	) -> bool {
		let Some(mut segments) = segments else {
			tracing::error!(error = %RouterError::OutsideRoutingSet, "navigation aborted");
			return false;
		};

		let table = self.table();
		let mut redirected_from = None;
		let redirect = find_route_redirect(&segments, &table.redirects)
			.and_then(|redirect| redirect.to.as_ref().map(|to| (&redirect.from, to)));
		if let Some((from, to)) = redirect {
			tracing::debug!(?from, to = ?to.segments, "redirect applied");
			self.set_segments(&to.segments, direction, to.query_string.as_deref());
			redirected_from = Some(generate_path(from));
			segments = to.segments.clone();
		}

		let Some(chain) = find_chain_for_segments(&segments, &table.chains) else {
			let error = RouterError::NoMatchingRoute(generate_path(&segments));
			tracing::error!(error = %error, "navigation aborted");
			return false;
		};

		self.write_outlets(
			Some(Arc::clone(&self.root)),
			&chain,
			direction,
			&segments,
			redirected_from,
			0,
			animation,
		)
		.await
	}

	/// Writes the outlets and emits the route change events.
	///
	/// Expects the navigation lock to be held; taking it again here would
	/// deadlock.
	#[allow(clippy::too_many_arguments)]
	async fn write_outlets(
		&self,
		node: Option<Arc<dyn NavNode>>,
		chain: &[RouteEntry],
		direction: NavDirection,
		segments: &[String],
		redirected_from: Option<String>,
		index: usize,
		animation: Option<&str>,
	) -> bool {
		let Some(busy) = BusyFlag::acquire(&self.busy) else {
			tracing::warn!(error = %RouterError::Busy("transition"), "outlet write skipped");
			return false;
		};

		let change = self.route_change(segments, redirected_from);
		if let Some(change) = &change {
			let _ = self.events.send(RouterEvent::WillChange(change.clone()));
		}

		let changed = write_nav_state(node, chain, direction, index, false, animation).await;
		drop(busy);

		if let Some(change) = change {
			tracing::debug!(from = ?change.from, to = %change.to, changed, "route changed");
			let _ = self.events.send(RouterEvent::DidChange(change));
		}
		changed
	}

	/// Records the new path; returns the change if the path differs.
	fn route_change(&self, segments: &[String], redirected_from: Option<String>) -> Option<RouteChange> {
		let to = generate_path(segments);
		let from = self.state.lock().previous_path.replace(to.clone());
		if from.as_deref() == Some(to.as_str()) {
			return None;
		}
		Some(RouteChange {
			from,
			redirected_from,
			to,
		})
	}
}
