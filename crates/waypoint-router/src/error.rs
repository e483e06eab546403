//! Error types for route resolution and navigation.

use thiserror::Error;

/// Error type for router operations.
///
/// Public navigation entry points never surface these to the caller; they are
/// logged and turned into a `false` result. The fallible building blocks
/// (`resolve_path`, `RouterConfig::from_toml_str`) return them directly.
/// Outlet failures are wrapped in [`RouterError::Outlet`] before being
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// The current location lies outside the configured root.
	#[error("URL is not part of the routing set")]
	OutsideRoutingSet,

	/// No route chain matches the given path.
	#[error("the path does not match any route: {0}")]
	NoMatchingRoute(String),

	/// No route chain matches the ids reported by the outlets.
	#[error("no matching URL for outlet ids: {0:?}")]
	NoMatchingIds(Vec<String>),

	/// A parameter needed to rebuild the path from a chain is unbound.
	#[error("router could not match path because some required param is missing")]
	MissingParameter,

	/// Another navigation is writing outlet state.
	#[error("router is busy, {0} was cancelled")]
	Busy(&'static str),

	/// A relative path could not be resolved against the current path.
	#[error("invalid path '{path}': {message}")]
	InvalidPath {
		/// The path as supplied by the caller.
		path: String,
		/// Reason reported by the URL resolver.
		message: String,
	},

	/// An outlet failed while applying a route id.
	#[error("outlet error: {0}")]
	Outlet(#[from] OutletError),

	/// Router configuration could not be parsed.
	#[error("configuration error: {0}")]
	Config(String),
}

/// Error reported by an outlet while reading or applying a route id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutletError {
	/// The outlet does not know the requested component id.
	#[error("unknown component '{0}'")]
	UnknownComponent(String),

	/// The view transition failed.
	#[error("transition failed: {0}")]
	Transition(String),

	/// Any other outlet-specific failure.
	#[error("{0}")]
	Custom(String),
}

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;
