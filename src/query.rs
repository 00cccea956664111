//! Ticket request URL construction.
//!
//! The base URL is never re-serialized: scheme, authority, path and any query
//! it already carries are kept byte-for-byte, and only the supplied retrieval
//! parameters are appended, form-urlencoded.

use crate::params::RetrievalParameters;
use url::form_urlencoded;

/// Build the URL a ticket is requested from.
///
/// Without parameters the base URL is returned unchanged.
pub fn ticket_request_url(base: &str, params: &RetrievalParameters) -> String {
    let pairs = params.query_pairs();
    if pairs.is_empty() {
        return base.to_string();
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();

    let (head, fragment) = match base.find('#') {
        Some(idx) => base.split_at(idx),
        None => (base, ""),
    };

    let separator = match head.find('?') {
        None => "?",
        Some(_) if head.ends_with('?') || head.ends_with('&') => "",
        Some(_) => "&",
    };

    format!("{}{}{}{}", head, separator, encoded, fragment)
}
