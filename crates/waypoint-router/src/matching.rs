//! Route chain matching and ranking.
//!
//! Chains are matched either against path segments (URL driven navigation)
//! or against the route ids reported by the outlets (outlet driven
//! reconciliation). When several chains match a path, [`compute_priority`]
//! ranks them so that literal segments beat parameters.

use crate::outlet::RouteId;
use crate::table::{Params, RedirectRule, RouteChain, RouteEntry};

/// Segment that matches everything that remains in a redirect source.
pub const WILDCARD: &str = "*";

/// Consumes path segments left to right, yielding `""` once exhausted.
struct SegmentCursor<'a> {
	segments: std::slice::Iter<'a, String>,
}

impl<'a> SegmentCursor<'a> {
	fn new(segments: &'a [String]) -> Self {
		Self {
			segments: segments.iter(),
		}
	}

	fn next(&mut self) -> &'a str {
		self.segments.next().map(String::as_str).unwrap_or("")
	}
}

/// Merges two parameter bags; entries of `overrides` win.
pub fn merge_params(base: Option<&Params>, overrides: Option<&Params>) -> Option<Params> {
	match (base, overrides) {
		(None, None) => None,
		(base, overrides) => {
			let mut merged = base.cloned().unwrap_or_default();
			if let Some(overrides) = overrides {
				merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
			}
			Some(merged)
		}
	}
}

/// Returns whether `redirect` applies to `segments`.
///
/// Disabled rules (no target) never match. A `*` in the source matches the
/// rest of the path; otherwise the whole path must match exactly.
pub fn matches_redirect(segments: &[String], redirect: &RedirectRule) -> bool {
	if redirect.to.is_none() {
		return false;
	}
	if redirect.from.len() > segments.len() {
		return false;
	}
	for (expected, actual) in redirect.from.iter().zip(segments) {
		if expected == WILDCARD {
			return true;
		}
		if expected != actual {
			return false;
		}
	}
	redirect.from.len() == segments.len()
}

/// Returns the first rule, in declaration order, that applies to `segments`.
pub fn find_route_redirect<'a>(
	segments: &[String],
	redirects: &'a [RedirectRule],
) -> Option<&'a RedirectRule> {
	redirects
		.iter()
		.find(|redirect| matches_redirect(segments, redirect))
}

/// Matches `segments` against `chain`, binding parameters.
///
/// Every pattern segment consumes one path segment. An entry whose pattern
/// is the default `[""]` consumes nothing; if the last processed entry is a
/// default entry, the match only succeeds when no path segment is left.
/// On success the returned chain carries the static parameters merged with
/// the extracted ones.
pub fn matches_segments(segments: &[String], chain: &[RouteEntry]) -> Option<RouteChain> {
	let mut input = SegmentCursor::new(segments);
	let mut matches_default = false;
	let mut extracted: Vec<Option<Params>> = vec![None; chain.len()];

	for (entry, bound) in chain.iter().zip(extracted.iter_mut()) {
		if entry.segments.first().is_some_and(|s| s.is_empty()) {
			matches_default = true;
			continue;
		}
		for pattern in &entry.segments {
			let data = input.next();
			if let Some(name) = pattern.strip_prefix(':') {
				if data.is_empty() {
					return None;
				}
				bound
					.get_or_insert_with(Params::new)
					.insert(name.to_string(), data.to_string());
			} else if data != pattern {
				return None;
			}
		}
		matches_default = false;
	}

	if matches_default && !input.next().is_empty() {
		return None;
	}

	Some(
		chain
			.iter()
			.zip(extracted)
			.map(|(entry, bound)| match bound {
				Some(bound) => entry.with_params(merge_params(entry.params.as_ref(), Some(&bound))),
				None => entry.clone(),
			})
			.collect(),
	)
}

/// Scores a chain; literal segments weigh exponentially by their depth.
///
/// Each parameter segment adds `1`, each literal segment adds `2^level`,
/// where `level` counts pattern segments from 1 across the whole chain.
pub fn compute_priority(chain: &[RouteEntry]) -> u64 {
	let mut score: u64 = 1;
	let mut level: u32 = 1;
	for entry in chain {
		for segment in &entry.segments {
			if segment.starts_with(':') {
				score = score.saturating_add(1);
			} else if !segment.is_empty() {
				score = score.saturating_add(2u64.saturating_pow(level));
			}
			level = level.saturating_add(1);
		}
	}
	score
}

/// Returns the highest priority chain matching `segments`.
///
/// Ties keep the chain declared first.
pub fn find_chain_for_segments(segments: &[String], chains: &[RouteChain]) -> Option<RouteChain> {
	let mut best: Option<(u64, RouteChain)> = None;
	for chain in chains {
		let Some(found) = matches_segments(segments, chain) else {
			continue;
		};
		let score = compute_priority(&found);
		if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
			best = Some((score, found));
		}
	}
	best.map(|(_, chain)| chain)
}

/// Scores how far the reported outlet ids agree with `chain` from the root.
///
/// Scoring stops at the first position whose id differs. At an agreeing
/// position, when the reported parameter count equals the entry's pattern
/// length, every leading parameter name that lines up with a `:name` pattern
/// segment adds one; the id itself always adds one.
pub fn matches_ids(ids: &[RouteId], chain: &[RouteEntry]) -> usize {
	let mut score = 0;
	for (route_id, entry) in ids.iter().zip(chain) {
		if route_id.id.to_lowercase() != entry.id {
			break;
		}
		if let Some(params) = route_id
			.params
			.as_ref()
			.filter(|params| params.len() == entry.segments.len())
		{
			score += params
				.keys()
				.zip(&entry.segments)
				.take_while(|(key, segment)| {
					segment
						.strip_prefix(':')
						.is_some_and(|name| name == key.to_lowercase())
				})
				.count();
		}
		score += 1;
	}
	score
}

/// Returns the chain that best agrees with the reported outlet ids.
///
/// The winner must score above zero; ties keep the chain declared first.
/// Each entry of the result carries its static parameters merged with the
/// parameters reported at the same depth.
pub fn find_chain_for_ids(ids: &[RouteId], chains: &[RouteChain]) -> Option<RouteChain> {
	let mut best: Option<&RouteChain> = None;
	let mut max_score = 0;
	for chain in chains {
		let score = matches_ids(ids, chain);
		if score > max_score {
			best = Some(chain);
			max_score = score;
		}
	}

	best.map(|chain| {
		chain
			.iter()
			.enumerate()
			.map(|(i, entry)| {
				let reported = ids.get(i).and_then(|id| id.params.as_ref());
				entry.with_params(merge_params(entry.params.as_ref(), reported))
			})
			.collect()
	})
}
