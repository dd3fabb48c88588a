//! `Link` header parsing.
//!
//! GitHub Link headers look like:
//! `<https://api.github.com/user/repos?page=2>; rel="next", <https://api.github.com/user/repos?page=5>; rel="last"`
//!
//! Only the four pagination relations are kept, and only the server-relative
//! part of each URL, so the value can be handed straight back to
//! [`crate::transport::HttpTransport::execute`].

use std::collections::BTreeMap;
use std::fmt;

/// A named pointer from one page to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    First,
    Prev,
    Next,
    Last,
}

impl Relation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }

    /// Parse a `rel` value; unknown names yield `None`.
    #[must_use]
    pub fn from_rel(rel: &str) -> Option<Self> {
        match rel {
            "first" => Some(Self::First),
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "last" => Some(Self::Last),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation → request path, for the relations the server advertised.
pub type Links = BTreeMap<Relation, String>;

/// Parse an optional Link header.
#[must_use]
pub fn parse_link_header(header: Option<&str>) -> Links {
    let mut links = Links::new();
    let Some(header) = header else {
        return links;
    };

    for part in header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(relation)) = (url, rel.and_then(Relation::from_rel)) {
            links.insert(relation, relative_path(url).to_string());
        }
    }

    links
}

/// Strip scheme and host, leaving the path (and query) without a leading `/`.
#[must_use]
pub fn relative_path(url: &str) -> &str {
    let path = match url.find("://") {
        Some(idx) => {
            let rest = &url[idx + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => url,
    };
    path.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_and_prev() {
        let header = r#"<https://api.example.com/x?page=2>; rel="next", <https://api.example.com/x?page=1>; rel="prev""#;
        let links = parse_link_header(Some(header));

        assert_eq!(links.len(), 2);
        assert_eq!(links.get(&Relation::Next).map(String::as_str), Some("x?page=2"));
        assert_eq!(links.get(&Relation::Prev).map(String::as_str), Some("x?page=1"));
    }

    #[test]
    fn test_absent_or_empty_header() {
        assert!(parse_link_header(None).is_empty());
        assert!(parse_link_header(Some("")).is_empty());
    }

    #[test]
    fn test_all_relations() {
        let header = concat!(
            r#"<https://api.github.com/user/repos?per_page=2&page=1>; rel="first", "#,
            r#"<https://api.github.com/user/repos?per_page=2&page=2>; rel="prev", "#,
            r#"<https://api.github.com/user/repos?per_page=2&page=4>; rel="next", "#,
            r#"<https://api.github.com/user/repos?per_page=2&page=9>; rel="last""#,
        );
        let links = parse_link_header(Some(header));

        assert_eq!(links[&Relation::First], "user/repos?per_page=2&page=1");
        assert_eq!(links[&Relation::Prev], "user/repos?per_page=2&page=2");
        assert_eq!(links[&Relation::Next], "user/repos?per_page=2&page=4");
        assert_eq!(links[&Relation::Last], "user/repos?per_page=2&page=9");
    }

    #[test]
    fn test_unknown_relations_are_ignored() {
        let header = r#"<https://api.github.com/a?page=3>; rel="next", <https://api.github.com/a?page=7>; rel="alternate""#;
        let links = parse_link_header(Some(header));

        assert_eq!(links.len(), 1);
        assert!(links.contains_key(&Relation::Next));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let header = r#"https://api.github.com/a?page=3; rel="next", <https://api.github.com/a?page=1>; rel="first""#;
        let links = parse_link_header(Some(header));

        assert_eq!(links.len(), 1);
        assert_eq!(links[&Relation::First], "a?page=1");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("https://api.github.com/repositories?since=369"), "repositories?since=369");
        assert_eq!(relative_path("https://api.github.com"), "");
        assert_eq!(relative_path("/user/repos"), "user/repos");
    }

    #[test]
    fn test_relation_names() {
        assert_eq!(Relation::Prev.to_string(), "prev");
        assert_eq!(Relation::from_rel("last"), Some(Relation::Last));
    }
}
