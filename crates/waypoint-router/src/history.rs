//! History and location provider.
//!
//! The router never touches a browser directly. It reads the location and
//! writes history entries through the [`History`] trait. Each entry carries
//! an increasing counter used to infer the direction of pop navigations.

use parking_lot::Mutex;

/// Direction of a navigation, used as an animation hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavDirection {
	/// Root or initial navigation; replaces the current history entry.
	#[default]
	None,
	/// Forward navigation; pushes a history entry.
	Forward,
	/// Backward navigation.
	Back,
}

/// Current location as seen by the history provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
	/// Path part of the URL, without query or fragment.
	pub pathname: String,
	/// Query part including the leading `?`, or empty.
	pub search: String,
	/// Fragment including the leading `#`, or empty.
	pub hash: String,
}

impl Location {
	/// Splits a relative href such as `/a/b?x=1#/c` into its parts.
	pub fn from_href(href: &str) -> Self {
		let (rest, hash) = match href.find('#') {
			Some(i) => (&href[..i], &href[i..]),
			None => (href, ""),
		};
		let (pathname, search) = match rest.find('?') {
			Some(i) => (&rest[..i], &rest[i..]),
			None => (rest, ""),
		};
		let pathname = if pathname.is_empty() { "/" } else { pathname };
		Self {
			pathname: pathname.to_string(),
			search: search.to_string(),
			hash: hash.to_string(),
		}
	}

	/// Reassembles the href.
	pub fn href(&self) -> String {
		format!("{}{}{}", self.pathname, self.search, self.hash)
	}

	/// Applies a URL written by the router on top of this location.
	///
	/// Fragment-only URLs keep the current path and query.
	pub fn with_url(&self, url: &str) -> Self {
		if url.starts_with('#') {
			Self {
				pathname: self.pathname.clone(),
				search: self.search.clone(),
				hash: url.to_string(),
			}
		} else {
			Self::from_href(url)
		}
	}
}

/// Browser-like history provider.
pub trait History: Send + Sync {
	/// Returns the current location.
	fn location(&self) -> Location;

	/// Returns the counter stored with the current entry, if any.
	fn state(&self) -> Option<u64>;

	/// Adds an entry after the current one.
	fn push_state(&self, state: u64, url: &str);

	/// Replaces the current entry.
	fn replace_state(&self, state: u64, url: &str);

	/// Moves one entry back.
	fn back(&self);
}

#[derive(Debug, Clone)]
struct HistoryEntry {
	location: Location,
	state: Option<u64>,
}

#[derive(Debug)]
struct MemoryHistoryInner {
	entries: Vec<HistoryEntry>,
	index: usize,
}

/// In-memory [`History`] implementation.
///
/// Keeps a stack of entries and a cursor. Pushing drops every entry after
/// the cursor, like a browser does.
#[derive(Debug)]
pub struct MemoryHistory {
	inner: Mutex<MemoryHistoryInner>,
}

impl MemoryHistory {
	/// Creates a history with a single entry at `href` and no state.
	pub fn new(href: &str) -> Self {
		Self {
			inner: Mutex::new(MemoryHistoryInner {
				entries: vec![HistoryEntry {
					location: Location::from_href(href),
					state: None,
				}],
				index: 0,
			}),
		}
	}

	/// Moves one entry forward, if there is one.
	pub fn forward(&self) {
		let mut inner = self.inner.lock();
		if inner.index + 1 < inner.entries.len() {
			inner.index += 1;
		}
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.inner.lock().entries.len()
	}

	/// Returns whether the history is empty. Never true.
	pub fn is_empty(&self) -> bool {
		self.inner.lock().entries.is_empty()
	}

	/// Returns the position of the current entry.
	pub fn index(&self) -> usize {
		self.inner.lock().index
	}

	/// Returns the href of every entry, oldest first.
	pub fn hrefs(&self) -> Vec<String> {
		self.inner
			.lock()
			.entries
			.iter()
			.map(|entry| entry.location.href())
			.collect()
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Location {
		let inner = self.inner.lock();
		inner.entries[inner.index].location.clone()
	}

	fn state(&self) -> Option<u64> {
		let inner = self.inner.lock();
		inner.entries[inner.index].state
	}

	fn push_state(&self, state: u64, url: &str) {
		let mut inner = self.inner.lock();
		let location = inner.entries[inner.index].location.with_url(url);
		let next = inner.index + 1;
		inner.entries.truncate(next);
		inner.entries.push(HistoryEntry {
			location,
			state: Some(state),
		});
		inner.index = next;
	}

	fn replace_state(&self, state: u64, url: &str) {
		let mut inner = self.inner.lock();
		let index = inner.index;
		let location = inner.entries[index].location.with_url(url);
		inner.entries[index] = HistoryEntry {
			location,
			state: Some(state),
		};
	}

	fn back(&self) {
		let mut inner = self.inner.lock();
		inner.index = inner.index.saturating_sub(1);
	}
}

/// Tracks history counters to infer the direction of pop navigations.
#[derive(Debug, Default)]
pub(crate) struct HistoryTracker {
	/// Counter written with the most recent router-created entry.
	pub(crate) state: u64,
	/// Counter seen on the previous pop.
	pub(crate) last_state: u64,
}

impl HistoryTracker {
	/// Returns the next counter value for a new entry.
	pub(crate) fn next_state(&mut self) -> u64 {
		self.state += 1;
		self.state
	}

	/// Infers the direction of the navigation that led to the current entry.
	///
	/// An entry without a counter is stamped with a fresh one first. A
	/// counter at or above the previous one counts as forward once the
	/// previous counter is positive.
	pub(crate) fn direction(&mut self, history: &dyn History) -> NavDirection {
		let state = match history.state() {
			Some(state) => state,
			None => {
				let state = self.next_state();
				history.replace_state(state, &history.location().href());
				state
			}
		};

		let last_state = std::mem::replace(&mut self.last_state, state);
		if state > last_state || (state >= last_state && last_state > 0) {
			NavDirection::Forward
		} else if state < last_state {
			NavDirection::Back
		} else {
			NavDirection::None
		}
	}
}
