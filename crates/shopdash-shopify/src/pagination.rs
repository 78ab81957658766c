//! Cursor pagination via the Admin API `Link` response header.
//!
//! Each page response may carry a `Link` header naming the adjacent pages.
//! The cursor is the `page_info` query parameter of the `rel="next"` URL:
//!
//! ```text
//! <https://acme.myshopify.com/admin/api/2024-01/orders.json?limit=250&page_info=PREV>; rel="previous",
//! <https://acme.myshopify.com/admin/api/2024-01/orders.json?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! Only the cursor is taken from the header. The next request URL is rebuilt
//! from the configured shop origin so the access token is never sent to a
//! host named by a response header.

/// Returns the `page_info` cursor of the `rel="next"` link, or `None` when
/// there is no header, no next link, or the next link has no cursor.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|segment| is_next_relation(segment))
        .and_then(angle_bracket_url)
        .and_then(|url| query_param(url, "page_info"))
}

fn is_next_relation(segment: &str) -> bool {
    segment
        .split(';')
        .skip(1)
        .map(str::trim)
        .any(|attr| attr == r#"rel="next""# || attr == "rel=next")
}

fn angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    (start < end).then(|| &segment[start..end])
}

/// Cursors are URL-safe base64 and are returned without percent-decoding.
fn query_param(url: &str, param: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == param && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}
