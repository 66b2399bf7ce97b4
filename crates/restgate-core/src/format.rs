//! Response format negotiation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The output format requested for a response.
///
/// The dispatcher accepts any value here; deciding whether a format can be
/// rendered is the response formatter's job, so unknown values are kept in
/// [`ResponseFormat::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ResponseFormat {
    /// `application/json`
    #[default]
    Json,
    /// `application/xml`
    Xml,
    /// Any other requested format, lower-cased.
    Other(String),
}

impl ResponseFormat {
    /// Parses a format name, lower-casing it first.
    ///
    /// ```
    /// use restgate_core::ResponseFormat;
    ///
    /// assert_eq!(ResponseFormat::parse("XML"), ResponseFormat::Xml);
    /// assert_eq!(ResponseFormat::parse("Csv").as_str(), "csv");
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let lowered = value.to_lowercase();
        match lowered.as_str() {
            "json" => Self::Json,
            "xml" => Self::Xml,
            _ => Self::Other(lowered),
        }
    }

    /// Returns the lower-case format name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ResponseFormat {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ResponseFormat> for String {
    fn from(value: ResponseFormat) -> Self {
        value.as_str().to_string()
    }
}
