//! Router configuration.

use crate::error::{RouterError, RouterResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of a [`Router`](crate::router::Router).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Path prefix under which the router operates.
	pub root: String,

	/// Keep the routed path in the URL fragment instead of the path.
	pub use_hash: bool,

	/// Delay before re-reading the table after route declarations changed.
	pub route_debounce_ms: u64,

	/// Delay before re-reading the table after redirect declarations changed.
	pub redirect_debounce_ms: u64,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			root: String::from("/"),
			use_hash: true,
			route_debounce_ms: 100,
			redirect_debounce_ms: 10,
		}
	}
}

impl RouterConfig {
	/// Parses a configuration from TOML. Missing keys take their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use waypoint_router::config::RouterConfig;
	///
	/// let config = RouterConfig::from_toml_str("root = \"/app\"\nuse_hash = false").unwrap();
	/// assert_eq!(config.root, "/app");
	/// assert!(!config.use_hash);
	/// assert_eq!(config.route_debounce_ms, 100);
	/// ```
	pub fn from_toml_str(input: &str) -> RouterResult<Self> {
		toml::from_str(input).map_err(|e| RouterError::Config(e.to_string()))
	}

	/// Sets the root prefix.
	pub fn with_root(mut self, root: impl Into<String>) -> Self {
		self.root = root.into();
		self
	}

	/// Selects hash or path mode.
	pub fn with_use_hash(mut self, use_hash: bool) -> Self {
		self.use_hash = use_hash;
		self
	}

	pub(crate) fn route_debounce(&self) -> Duration {
		Duration::from_millis(self.route_debounce_ms)
	}

	pub(crate) fn redirect_debounce(&self) -> Duration {
		Duration::from_millis(self.redirect_debounce_ms)
	}
}
