//! Splitting the routed path into service and resource.
//!
//! Routing strips trailing slashes from the `path` value, but some services
//! distinguish `table` from `table/`. The resolver looks at the raw URI to
//! put the slash back.

/// The target of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourcePath {
    /// First path segment.
    pub service: String,
    /// Everything after the first `/`, possibly with a restored trailing `/`.
    pub resource: String,
}

/// Splits `path` at its first `/`.
///
/// ```
/// use restgate_dispatch::path::split_path;
///
/// assert_eq!(split_path("db"), ("db", ""));
/// assert_eq!(split_path("db/todo/1"), ("db", "todo/1"));
/// ```
#[must_use]
pub fn split_path(path: &str) -> (&str, &str) {
    path.split_once('/').unwrap_or((path, ""))
}

/// Returns `true` if the URI's path part ends in `/`.
///
/// With a query string, only the character right before the first `?`
/// counts.
#[must_use]
pub fn uri_has_trailing_slash(uri: &str) -> bool {
    let path_part = match uri.find('?') {
        Some(query_start) => &uri[..query_start],
        None => uri,
    };
    path_part.ends_with('/')
}

/// Resolves the service and resource for `path`, restoring a trailing slash
/// the router dropped from a non-empty resource.
#[must_use]
pub fn resolve_path(path: &str, request_uri: &str) -> ResourcePath {
    let (service, resource) = split_path(path);
    let mut resource = resource.to_string();

    if !resource.is_empty() && uri_has_trailing_slash(request_uri) {
        resource.push('/');
    }

    ResourcePath {
        service: service.to_string(),
        resource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_service_only() {
        let resolved = resolve_path("db", "/rest/db/");
        assert_eq!(resolved.service, "db");
        // no resource, so nothing to restore
        assert_eq!(resolved.resource, "");
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(resolve_path("", "/rest"), ResourcePath::default());
    }

    #[test]
    fn test_trailing_slash_restored() {
        let resolved = resolve_path("db/mytable", "/rest/db/mytable/");
        assert_eq!(resolved.service, "db");
        assert_eq!(resolved.resource, "mytable/");
    }

    #[test]
    fn test_trailing_slash_before_query() {
        let resolved = resolve_path("db/mytable", "/rest/db/mytable/?app_name=x&fields=a/b/");
        assert_eq!(resolved.resource, "mytable/");
    }

    #[test]
    fn test_slash_in_query_only_is_ignored() {
        let resolved = resolve_path("db/mytable", "/rest/db/mytable?filter=a/");
        assert_eq!(resolved.resource, "mytable");
    }

    #[test]
    fn test_no_trailing_slash() {
        let resolved = resolve_path("db/mytable/5", "/rest/db/mytable/5");
        assert_eq!(resolved.resource, "mytable/5");
    }

    #[test]
    fn test_uri_has_trailing_slash() {
        assert!(uri_has_trailing_slash("/rest/"));
        assert!(uri_has_trailing_slash("/rest/db/?x=1"));
        assert!(!uri_has_trailing_slash("/rest/db?x=/"));
        assert!(!uri_has_trailing_slash("?x=1"));
    }

    proptest! {
        #[test]
        fn prop_split_at_first_slash(
            service in "[a-z0-9_-]{0,12}",
            resource in "[a-z0-9_/.-]{0,24}",
        ) {
            let path = format!("{service}/{resource}");
            let (s, r) = split_path(&path);
            prop_assert_eq!(s, service.as_str());
            prop_assert_eq!(r, resource.as_str());
        }

        #[test]
        fn prop_no_slash_is_service_only(path in "[a-zA-Z0-9_ .-]{0,24}") {
            let resolved = resolve_path(&path, &format!("/rest/{path}/"));
            prop_assert_eq!(resolved.service, path);
            prop_assert_eq!(resolved.resource, "");
        }
    }
}
