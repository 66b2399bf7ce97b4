//! REST verbs understood by services.
//!
//! [`Verb`] is the logical operation a service performs. It is not always the
//! HTTP method on the wire: PATCH and the `MERGE` extension method both map
//! to [`Verb::Merge`], and a POST can carry any verb through tunneling.

use std::fmt;
use std::str::FromStr;

use http::Method;
use serde::{Deserialize, Serialize};

use crate::GateError;

/// A logical REST verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    /// Retrieve a resource or collection.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource (MERGE or PATCH on the wire).
    Merge,
    /// Remove a resource.
    Delete,
}

impl Verb {
    /// All verbs, in documentation order.
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Merge, Self::Delete];

    /// Returns the upper-case verb name passed to services.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Merge => "MERGE",
            Self::Delete => "DELETE",
        }
    }

    /// Maps an HTTP method to a verb.
    ///
    /// Returns `None` for methods the dispatcher does not route
    /// (HEAD, OPTIONS, TRACE, CONNECT and unknown extensions).
    ///
    /// ```
    /// use http::Method;
    /// use restgate_core::Verb;
    ///
    /// assert_eq!(Verb::from_method(&Method::PATCH), Some(Verb::Merge));
    /// assert_eq!(Verb::from_method(&Method::OPTIONS), None);
    /// ```
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::PATCH => Some(Self::Merge),
            Method::DELETE => Some(Self::Delete),
            _ if method.as_str().eq_ignore_ascii_case("MERGE") => Some(Self::Merge),
            _ => None,
        }
    }

    /// Returns `true` if a successful call creates a resource.
    #[must_use]
    pub const fn creates(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "merge" | "patch" => Ok(Self::Merge),
            "delete" => Ok(Self::Delete),
            _ => Err(GateError::bad_request(format!("Unknown verb '{s}'."))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_method() {
        assert_eq!(Verb::from_method(&Method::GET), Some(Verb::Get));
        assert_eq!(Verb::from_method(&Method::POST), Some(Verb::Post));
        assert_eq!(Verb::from_method(&Method::PUT), Some(Verb::Put));
        assert_eq!(Verb::from_method(&Method::PATCH), Some(Verb::Merge));
        assert_eq!(Verb::from_method(&Method::DELETE), Some(Verb::Delete));
        assert_eq!(Verb::from_method(&Method::HEAD), None);
    }

    #[test]
    fn test_merge_extension_method() {
        let merge = Method::from_bytes(b"MERGE").unwrap();
        assert_eq!(Verb::from_method(&merge), Some(Verb::Merge));
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Delete".parse::<Verb>().unwrap(), Verb::Delete);
        assert_eq!("PATCH".parse::<Verb>().unwrap(), Verb::Merge);
        assert!("fetch".parse::<Verb>().is_err());
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Verb::Merge.to_string(), "MERGE");
        let json = serde_json::to_string(&Verb::Delete).unwrap();
        assert_eq!(json, "\"DELETE\"");
    }

    #[test]
    fn test_only_post_creates() {
        assert!(Verb::Post.creates());
        assert!(Verb::ALL.iter().filter(|v| v.creates()).count() == 1);
    }
}
