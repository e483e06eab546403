//! # Waypoint
//!
//! A client router core for nested outlets.
//!
//! Waypoint resolves a URL path into a chain of routes, one per nesting level,
//! and keeps a tree of outlets in sync with it. It also reconciles the URL
//! when the outlets change on their own.
//!
//! ## Feature Flags
//!
//! - `router` (default): the router core from `waypoint-router`
//!
//! ## Quick Start
//!
//! ```
//! # #[cfg(feature = "router")]
//! # {
//! use waypoint::prelude::*;
//!
//! let routes = StaticDeclaration::root()
//!     .child(StaticDeclaration::redirect("/", Some("/home")))
//!     .child(StaticDeclaration::route("/home", "page-home"));
//! # let _ = routes;
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "router")]
#[cfg_attr(docsrs, doc(cfg(feature = "router")))]
pub use waypoint_router as router;

#[cfg(feature = "router")]
#[cfg_attr(docsrs, doc(cfg(feature = "router")))]
pub use waypoint_router::{
	NavDirection, NavigationHookResult, Router, RouterConfig, RouterError, RouterEvent,
};

/// Commonly used types.
#[cfg(feature = "router")]
#[cfg_attr(docsrs, doc(cfg(feature = "router")))]
pub mod prelude {
	pub use waypoint_router::prelude::*;
}
