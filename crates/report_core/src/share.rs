//! Share links for reports.
//!
//! A share link carries a random token next to the report id. The token is
//! only checked for shape here; authorising it belongs to the API.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a report or user id for use as one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

pub fn shareable_url(origin: &str, report_id: &str) -> String {
    shareable_url_with_token(origin, report_id, &generate_token())
}

pub fn shareable_url_with_token(origin: &str, report_id: &str, token: &str) -> String {
    format!(
        "{}/shared-report/{}?token={token}",
        origin.trim_end_matches('/'),
        encode_path_segment(report_id)
    )
}

/// True for a hyphenated 8-4-4-4-12 hex string, in either case.
pub fn validate_token(token: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|ch| ch.is_ascii_hexdigit()))
}

/// Reads one parameter from a query string, with or without the leading `?`.
pub fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// A shared view needs both a `token` of the right shape and a `reportId`.
pub fn validate_share_query(query: &str) -> bool {
    match (query_param(query, "token"), query_param(query, "reportId")) {
        (Some(token), Some(_)) => validate_token(token),
        _ => false,
    }
}

/// Where a browser URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRoute {
    Direct(String),
    Shared(String),
    InvalidShare,
    Missing,
}

const SHARED_PREFIX: &str = "/shared-report/";
const REPORT_PREFIX: &str = "/report/";

/// Resolves the report to show from a location's path and query.
///
/// Shared links must carry a well-formed token, either as
/// `/shared-report/{id}?token=` or as `?reportId={id}&token=`. Direct links
/// take the id from `/report/{id}`, `?reportId=` or `?id=`.
pub fn resolve_route(path: &str, query: &str) -> ReportRoute {
    if let Some(id) = path_id(path, SHARED_PREFIX) {
        return match query_param(query, "token") {
            Some(token) if validate_token(token) => ReportRoute::Shared(id),
            _ => ReportRoute::InvalidShare,
        };
    }

    if query_param(query, "token").is_some() {
        return match query_param(query, "reportId") {
            Some(id) if validate_share_query(query) => ReportRoute::Shared(id.to_string()),
            _ => ReportRoute::InvalidShare,
        };
    }

    path_id(path, REPORT_PREFIX)
        .or_else(|| query_param(query, "reportId").map(str::to_string))
        .or_else(|| query_param(query, "id").map(str::to_string))
        .map_or(ReportRoute::Missing, ReportRoute::Direct)
}

/// The decoded id after `prefix`, when the rest of the path is a single segment.
fn path_id(path: &str, prefix: &str) -> Option<String> {
    path.strip_prefix(prefix)
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .map(|id| percent_decode_str(id).decode_utf8_lossy().into_owned())
}

/// The query with `token` removed, so a validated link does not linger in history.
pub fn strip_token(query: &str) -> String {
    let kept: Vec<&str> = query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("token"))
        .collect();
    if kept.is_empty() {
        String::new()
    } else {
        format!("?{}", kept.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_validate() {
        let token = generate_token();
        assert!(validate_token(&token));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn token_shape_is_case_insensitive() {
        assert!(validate_token("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!validate_token("123e4567e89b12d3a456426614174000"));
        assert!(!validate_token("123e4567-e89b-12d3-a456-42661417400g"));
        assert!(!validate_token(""));
    }

    #[test]
    fn share_url_has_expected_layout() {
        let url = shareable_url_with_token("https://app.example/", "r1", "tok");
        assert_eq!(url, "https://app.example/shared-report/r1?token=tok");
        let generated = shareable_url("https://app.example", "r1");
        let token = generated.rsplit('=').next().unwrap();
        assert!(validate_token(token));
    }

    #[test]
    fn share_query_needs_both_fields() {
        let token = "123e4567-e89b-12d3-a456-426614174000";
        assert!(validate_share_query(&format!("?token={token}&reportId=abc")));
        assert!(!validate_share_query(&format!("?token={token}")));
        assert!(!validate_share_query("?token=nope&reportId=abc"));
        assert!(!validate_share_query("?reportId=abc&token="));
    }

    #[test]
    fn routes_resolve_from_path_or_query() {
        let token = "123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(
            resolve_route("/shared-report/r9", &format!("?token={token}")),
            ReportRoute::Shared("r9".to_string())
        );
        assert_eq!(resolve_route("/shared-report/r9", "?token=bad"), ReportRoute::InvalidShare);
        assert_eq!(resolve_route("/report/r2/", ""), ReportRoute::Direct("r2".to_string()));
        assert_eq!(resolve_route("/", "?id=r3"), ReportRoute::Direct("r3".to_string()));
        assert_eq!(resolve_route("/", "?reportId=r4&id=r3"), ReportRoute::Direct("r4".to_string()));
        assert_eq!(resolve_route("/", ""), ReportRoute::Missing);
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(encode_path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(encode_path_segment("r-1_v2.~"), "r-1_v2.~");
        assert_eq!(encode_path_segment("deck one"), "deck%20one");
        assert_eq!(
            shareable_url_with_token("https://app.example", "a/b", "tok"),
            "https://app.example/shared-report/a%2Fb?token=tok"
        );
        assert_eq!(resolve_route("/report/a%2Fb", ""), ReportRoute::Direct("a/b".to_string()));
    }

    #[test]
    fn query_form_share_links_need_a_valid_token() {
        let token = "123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(
            resolve_route("/", &format!("?reportId=r5&token={token}")),
            ReportRoute::Shared("r5".to_string())
        );
        assert_eq!(resolve_route("/", "?reportId=r5&token=bad"), ReportRoute::InvalidShare);
        assert_eq!(resolve_route("/", &format!("?id=r5&token={token}")), ReportRoute::InvalidShare);
        assert_eq!(strip_token(&format!("?reportId=r5&token={token}")), "?reportId=r5");
    }

    #[test]
    fn stripping_token_keeps_other_params() {
        assert_eq!(strip_token("?token=x&reportId=abc"), "?reportId=abc");
        assert_eq!(strip_token("?token=x"), "");
    }
}
