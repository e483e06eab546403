//! Nested-outlet client router core.
//!
//! The router maps a URL path to a chain of route entries, one per nesting
//! level, and writes that chain into a tree of outlets. It works against
//! three injected capabilities:
//!
//! - a [`Declaration`](source::Declaration) tree describing routes and
//!   redirects,
//! - a [`NavNode`](outlet::NavNode) tree containing the outlets,
//! - a [`History`](history::History) provider holding the location.
//!
//! ## Modules
//!
//! - [`path`]: segment parsing, generation and prefix handling
//! - [`source`] / [`table`]: reading declarations into route chains
//! - [`matching`]: chain matching, ranking and redirect lookup
//! - [`guard`]: `before_enter` / `before_leave` guards
//! - [`outlet`]: the outlet read/write protocol
//! - [`history`]: location access and direction inference
//! - [`router`]: the [`Router`](router::Router) driving all of the above
//!
//! ## Example
//!
//! ```
//! use waypoint_router::matching::find_chain_for_segments;
//! use waypoint_router::path::parse_path;
//! use waypoint_router::source::StaticDeclaration;
//! use waypoint_router::table::RouteTable;
//!
//! let routes = StaticDeclaration::root().child(
//!     StaticDeclaration::route("/users", "page-users")
//!         .child(StaticDeclaration::route("/:id", "page-user")),
//! );
//! let table = RouteTable::read(&routes);
//!
//! let segments = parse_path(Some("/users/42")).segments;
//! let chain = find_chain_for_segments(&segments, &table.chains).unwrap();
//! assert_eq!(chain[1].params.as_ref().unwrap()["id"], "42");
//! ```

pub mod config;
pub mod debug;
pub mod error;
pub mod event;
pub mod guard;
pub mod history;
pub mod matching;
pub mod outlet;
pub mod path;
pub mod router;
pub mod source;
pub mod table;

pub use config::RouterConfig;
pub use error::{OutletError, RouterError, RouterResult};
pub use event::{RouteChange, RouterEvent};
pub use guard::{Guard, NavigationGuard, NavigationHookResult, guard_fn};
pub use history::{History, Location, MemoryHistory, NavDirection};
pub use outlet::{NavNode, NavState, Outlet, OutletRole, RouteId, RouteWrite};
pub use path::ParsedPath;
pub use router::Router;
pub use source::{Declaration, DeclarationRole, StaticDeclaration};
pub use table::{Params, RedirectRule, RouteChain, RouteEntry, RouteTable};

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		Declaration, History, MemoryHistory, NavDirection, NavNode, NavigationHookResult, Outlet,
		OutletRole, RouteId, RouteWrite, Router, RouterConfig, RouterEvent, StaticDeclaration,
		guard_fn,
	};
}
