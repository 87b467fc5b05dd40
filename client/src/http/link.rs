//! RFC 5988 `Link` header parsing.
//!
//! ```text
//! Link: <https://packagecloud.io/api/v1/repos/u/r/packages.json?page=2>; rel="next",
//!       <https://packagecloud.io/api/v1/repos/u/r/packages.json?page=9>; rel="last"
//! ```

use std::collections::HashMap;

use reqwest::header::{HeaderMap, LINK};

/// The relation that points at the following page.
pub const REL_NEXT: &str = "next";

/// A single link target with its parameters (excluding `rel`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    pub params: HashMap<String, String>,
}

/// Links keyed by relation name. The first link wins when a relation repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGroup(HashMap<String, Link>);

impl LinkGroup {
    /// Collect links from every `Link` header on a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut group = Self::default();
        for value in headers.get_all(LINK) {
            if let Ok(value) = value.to_str() {
                group.extend(value);
            }
        }
        group
    }

    pub fn parse(header: &str) -> Self {
        let mut group = Self::default();
        group.extend(header);
        group
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }

    pub fn next(&self) -> Option<&Link> {
        self.get(REL_NEXT)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn extend(&mut self, header: &str) {
        let mut rest = header;
        while let Some((link, rels, remaining)) = parse_one(rest) {
            for rel in rels {
                self.0.entry(rel).or_insert_with(|| link.clone());
            }
            rest = remaining;
        }
    }
}

/// Parse the first `<uri>; params` entry, returning it with its relation
/// names and the unparsed remainder.
fn parse_one(input: &str) -> Option<(Link, Vec<String>, &str)> {
    let start = input.find('<')?;
    let after_open = &input[start + 1..];
    let end = after_open.find('>')?;
    let uri = after_open[..end].trim().to_string();
    let mut rest = &after_open[end + 1..];

    let mut params = HashMap::new();
    let mut rels = Vec::new();

    loop {
        rest = rest.trim_start();
        if let Some(r) = rest.strip_prefix(',') {
            rest = r;
            break;
        }
        let Some(r) = rest.strip_prefix(';') else {
            // End of header or garbage: stop at the next entry, if any.
            rest = match rest.find(',') {
                Some(i) => &rest[i + 1..],
                None => "",
            };
            break;
        };
        let (key, value, remaining) = parse_param(r);
        rest = remaining;
        if key.is_empty() {
            continue;
        }
        if key == "rel" {
            rels.extend(value.split_whitespace().map(str::to_lowercase));
        } else {
            params.insert(key, value);
        }
    }

    Some((Link { uri, params }, rels, rest))
}

/// Parse `key=value` or `key="quoted value"` up to the next `;` or `,`.
fn parse_param(input: &str) -> (String, String, &str) {
    let input = input.trim_start();
    let key_end = input
        .find(|c| c == '=' || c == ';' || c == ',')
        .unwrap_or(input.len());
    let key = input[..key_end].trim().to_lowercase();
    let rest = &input[key_end..];

    let Some(rest) = rest.strip_prefix('=') else {
        return (key, String::new(), rest);
    };
    let rest = rest.trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let close = quoted.find('"').unwrap_or(quoted.len());
        let value = quoted[..close].to_string();
        let remaining = quoted.get(close + 1..).unwrap_or("");
        (key, value, remaining)
    } else {
        let end = rest.find(|c| c == ';' || c == ',').unwrap_or(rest.len());
        (key, rest[..end].trim().to_string(), &rest[end..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_next_and_last() {
        let group = LinkGroup::parse(
            r#"<https://pc.example.com/api/v1/repos/u/r/packages.json?page=2>; rel="next", <https://pc.example.com/api/v1/repos/u/r/packages.json?page=9>; rel="last""#,
        );
        assert_eq!(
            group.next().unwrap().uri,
            "https://pc.example.com/api/v1/repos/u/r/packages.json?page=2"
        );
        assert_eq!(
            group.get("last").unwrap().uri,
            "https://pc.example.com/api/v1/repos/u/r/packages.json?page=9"
        );
    }

    #[test]
    fn test_no_next_relation() {
        let group = LinkGroup::parse(r#"<https://x/p?page=1>; rel="first", <https://x/p?page=1>; rel="prev""#);
        assert!(group.next().is_none());
        assert!(group.get("prev").is_some());
    }

    #[test]
    fn test_unquoted_rel_and_extra_params() {
        let group = LinkGroup::parse(r#"</page/3>; rel=next; title="Page 3""#);
        let next = group.next().unwrap();
        assert_eq!(next.uri, "/page/3");
        assert_eq!(next.params.get("title").unwrap(), "Page 3");
    }

    #[test]
    fn test_multiple_rel_values() {
        let group = LinkGroup::parse(r#"</p/2>; rel="next last""#);
        assert_eq!(group.next().unwrap().uri, "/p/2");
        assert_eq!(group.get("last").unwrap().uri, "/p/2");
    }

    #[test]
    fn test_rel_is_case_insensitive() {
        let group = LinkGroup::parse(r#"</p/2>; REL="Next""#);
        assert!(group.next().is_some());
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(LinkGroup::parse("").is_empty());
        assert!(LinkGroup::parse("not a link header").is_empty());
    }

    #[test]
    fn test_from_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(LINK, HeaderValue::from_static(r#"</p/1>; rel="prev""#));
        headers.append(LINK, HeaderValue::from_static(r#"</p/3>; rel="next""#));
        let group = LinkGroup::from_headers(&headers);
        assert_eq!(group.next().unwrap().uri, "/p/3");
        assert_eq!(group.get("prev").unwrap().uri, "/p/1");
    }
}
