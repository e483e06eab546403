//! Path parsing and generation.
//!
//! A path is handled as a list of segments: the `/`-separated, trimmed,
//! non-empty tokens of the URL path. The empty path is represented by the
//! root sentinel `[""]`, so a segment list is never empty.

use crate::error::{RouterError, RouterResult};
use crate::history::{History, Location, NavDirection};
use crate::table::RouteEntry;

/// Base used to resolve relative paths. Only the path and query of the
/// resolved URL are kept.
const RESOLVE_BASE: &str = "https://host/";

/// A parsed location: path segments plus the raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
	/// Path segments, never empty.
	pub segments: Vec<String>,
	/// Everything after the first `?`, unescaped.
	pub query_string: Option<String>,
}

/// Returns the root sentinel segment list.
pub fn root_segments() -> Vec<String> {
	vec![String::new()]
}

/// Parses a raw location string into segments and an optional query string.
///
/// # Examples
///
/// ```
/// use waypoint_router::path::parse_path;
///
/// let parsed = parse_path(Some("/users/ 42 //edit?tab=1"));
/// assert_eq!(parsed.segments, vec!["users", "42", "edit"]);
/// assert_eq!(parsed.query_string.as_deref(), Some("tab=1"));
///
/// assert_eq!(parse_path(None).segments, vec![""]);
/// ```
pub fn parse_path(raw: Option<&str>) -> ParsedPath {
	let Some(raw) = raw else {
		return ParsedPath {
			segments: root_segments(),
			query_string: None,
		};
	};

	let (path, query_string) = match raw.split_once('?') {
		Some((path, query)) => (path, Some(query.to_string())),
		None => (raw, None),
	};

	let mut segments: Vec<String> = path
		.split('/')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect();
	if segments.is_empty() {
		segments = root_segments();
	}

	ParsedPath {
		segments,
		query_string,
	}
}

/// Joins the non-empty segments with `/` behind a single leading slash.
pub fn generate_path<S: AsRef<str>>(segments: &[S]) -> String {
	let joined = segments
		.iter()
		.map(AsRef::as_ref)
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("/");
	format!("/{}", joined)
}

/// Builds a URL from segments, optionally in hash mode and with a query.
pub fn generate_url<S: AsRef<str>>(
	segments: &[S],
	use_hash: bool,
	query_string: Option<&str>,
) -> String {
	let mut url = generate_path(segments);
	if use_hash {
		url.insert(0, '#');
	}
	if let Some(query) = query_string {
		url.push('?');
		url.push_str(query);
	}
	url
}

/// Strips a mandatory root prefix from `segments`.
///
/// Returns `None` when `segments` does not start with `prefix`. A root
/// sentinel prefix leaves the segments untouched, and consuming every
/// segment yields the root sentinel.
pub fn remove_prefix(prefix: &[String], segments: &[String]) -> Option<Vec<String>> {
	if prefix.len() > segments.len() {
		return None;
	}
	if prefix.len() <= 1 && prefix.first().is_none_or(|p| p.is_empty()) {
		return Some(segments.to_vec());
	}
	if prefix.iter().zip(segments).any(|(p, s)| p != s) {
		return None;
	}
	if segments.len() == prefix.len() {
		return Some(root_segments());
	}
	Some(segments[prefix.len()..].to_vec())
}

/// Rebuilds concrete path segments from a chain with bound parameters.
///
/// Returns `None` if a parameter segment has no (or an empty) bound value.
pub fn chain_to_segments(chain: &[RouteEntry]) -> Option<Vec<String>> {
	let mut segments = Vec::new();
	for entry in chain {
		for segment in &entry.segments {
			if let Some(name) = segment.strip_prefix(':') {
				let value = entry.params.as_ref().and_then(|p| p.get(name))?;
				if value.is_empty() {
					return None;
				}
				segments.push(value.clone());
			} else if !segment.is_empty() {
				segments.push(segment.clone());
			}
		}
	}
	Some(segments)
}

/// Resolves a relative path (`./x`, `../x`) against the current path.
///
/// The result keeps the resolved path and query, dropping scheme and host.
pub fn resolve_path(current: &str, relative: &str) -> RouterResult<String> {
	let invalid = |e: url::ParseError| RouterError::InvalidPath {
		path: relative.to_string(),
		message: e.to_string(),
	};
	let base = url::Url::parse(&format!("{}{}", RESOLVE_BASE, current)).map_err(invalid)?;
	let resolved = base.join(relative).map_err(invalid)?;

	let mut path = resolved.path().to_string();
	if let Some(query) = resolved.query() {
		path.push('?');
		path.push_str(query);
	}
	Ok(path)
}

/// Reads the routed segments out of a location.
///
/// In hash mode the path is taken from the fragment. Returns `None` when the
/// location is not under `root`.
pub fn read_segments(location: &Location, root: &str, use_hash: bool) -> Option<Vec<String>> {
	let prefix = parse_path(Some(root)).segments;
	let pathname = if use_hash {
		location.hash.strip_prefix('#').unwrap_or(&location.hash)
	} else {
		location.pathname.as_str()
	};
	let segments = parse_path(Some(pathname)).segments;
	remove_prefix(&prefix, &segments)
}

/// Writes `segments` (under `root`) to the history.
///
/// Forward navigation pushes a new entry; anything else replaces the current
/// one.
pub fn write_segments(
	history: &dyn History,
	root: &str,
	use_hash: bool,
	segments: &[String],
	direction: NavDirection,
	state: u64,
	query_string: Option<&str>,
) {
	let mut full = parse_path(Some(root)).segments;
	full.extend_from_slice(segments);
	let url = generate_url(&full, use_hash, query_string);

	if direction == NavDirection::Forward {
		history.push_state(state, &url);
	} else {
		history.replace_state(state, &url);
	}
}
