//! Human readable dumps of a route table.

use crate::path::generate_path;
use crate::table::{RedirectRule, RouteChain};

/// Describes each chain as `"/full/path -> id-a > id-b"`.
pub fn describe_routes(chains: &[RouteChain]) -> Vec<String> {
	chains
		.iter()
		.map(|chain| {
			let segments: Vec<&str> = chain
				.iter()
				.flat_map(|entry| entry.segments.iter().map(String::as_str))
				.collect();
			let ids: Vec<&str> = chain.iter().map(|entry| entry.id.as_str()).collect();
			format!("{} -> {}", generate_path(&segments), ids.join(" > "))
		})
		.collect()
}

/// Describes each enabled redirect as `"FROM: /a  TO: /b"`.
pub fn describe_redirects(redirects: &[RedirectRule]) -> Vec<String> {
	redirects
		.iter()
		.filter_map(|redirect| {
			let to = redirect.to.as_ref()?;
			Some(format!(
				"FROM: {}  TO: {}",
				generate_path(&redirect.from),
				generate_path(&to.segments)
			))
		})
		.collect()
}
