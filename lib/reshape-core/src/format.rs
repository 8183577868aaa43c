//! Body format types.
//!
//! [`Format`] is the flat enumeration used where a format is *declared*
//! (a response content type, a caller's expectation). The conversion engine
//! works on two narrower sets so that illegal combinations cannot be expressed:
//!
//! - [`SourceFormat`] - formats a body can be read from
//! - [`TargetFormat`] - formats a body can be rendered into and decoded from
//!
//! [`RequestFormat`] covers the request side, where a payload may also be
//! sent as a URL query.

use derive_more::Display;

use crate::Error;

/// A declared body format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Format {
    /// Unspecified or unrecognized.
    #[default]
    #[display("default")]
    Default,
    /// JSON (`application/json`).
    #[display("json")]
    Json,
    /// XML (`application/xml`).
    #[display("xml")]
    Xml,
    /// URL-encoded query pairs (request only).
    #[display("url-query")]
    UrlQuery,
    /// Spreadsheet document (xlsx, xls, xlsb, ods).
    #[display("spreadsheet")]
    Spreadsheet,
    /// JSON wrapped in a callback function call.
    #[display("jsonp")]
    Jsonp,
    /// Comma-separated values (`text/csv`).
    #[display("csv")]
    Csv,
}

const SPREADSHEET_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

impl Format {
    /// Classify a `Content-Type` header value.
    ///
    /// Parameters such as `charset` are ignored and the media type is
    /// compared case-insensitively. Anything unknown is [`Format::Default`].
    ///
    /// ```
    /// use reshape_core::Format;
    ///
    /// assert_eq!(Format::from_content_type("application/json; charset=utf-8"), Format::Json);
    /// assert_eq!(Format::from_content_type("text/html"), Format::Default);
    /// ```
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "application/json" => Self::Json,
            "application/xml" => Self::Xml,
            "text/csv" => Self::Csv,
            other if SPREADSHEET_TYPES.contains(&other) => Self::Spreadsheet,
            _ => Self::Default,
        }
    }
}

/// A format the conversion engine can read a body from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SourceFormat {
    /// JSON document.
    #[display("json")]
    Json,
    /// XML document.
    #[display("xml")]
    Xml,
    /// Spreadsheet document; the first sheet is read as a table.
    #[display("spreadsheet")]
    Spreadsheet,
    /// JSON wrapped in a callback function call.
    #[display("jsonp")]
    Jsonp,
    /// CSV table with a header row.
    #[display("csv")]
    Csv,
}

impl From<SourceFormat> for Format {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Json => Self::Json,
            SourceFormat::Xml => Self::Xml,
            SourceFormat::Spreadsheet => Self::Spreadsheet,
            SourceFormat::Jsonp => Self::Jsonp,
            SourceFormat::Csv => Self::Csv,
        }
    }
}

impl TryFrom<Format> for SourceFormat {
    type Error = Error;

    fn try_from(format: Format) -> Result<Self, Self::Error> {
        match format {
            Format::Json => Ok(Self::Json),
            Format::Xml => Ok(Self::Xml),
            Format::Spreadsheet => Ok(Self::Spreadsheet),
            Format::Jsonp => Ok(Self::Jsonp),
            Format::Csv => Ok(Self::Csv),
            Format::Default | Format::UrlQuery => Err(Error::unsupported_format(format)),
        }
    }
}

/// A format the conversion engine can render into and decode from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TargetFormat {
    /// JSON document.
    #[display("json")]
    Json,
    /// XML document.
    #[display("xml")]
    Xml,
}

impl TargetFormat {
    /// Get the MIME type string.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl From<TargetFormat> for Format {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Json => Self::Json,
            TargetFormat::Xml => Self::Xml,
        }
    }
}

impl From<TargetFormat> for SourceFormat {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Json => Self::Json,
            TargetFormat::Xml => Self::Xml,
        }
    }
}

impl TryFrom<Format> for TargetFormat {
    type Error = Error;

    fn try_from(format: Format) -> Result<Self, Self::Error> {
        match format {
            Format::Json => Ok(Self::Json),
            Format::Xml => Ok(Self::Xml),
            _ => Err(Error::unsupported_format(format)),
        }
    }
}

/// How a request payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum RequestFormat {
    /// URL query for `GET`, JSON for everything else.
    #[default]
    #[display("default")]
    Default,
    /// JSON body.
    #[display("json")]
    Json,
    /// XML body.
    #[display("xml")]
    Xml,
    /// Pairs appended to the URL query, no body.
    #[display("url-query")]
    UrlQuery,
}

impl RequestFormat {
    /// Resolve [`RequestFormat::Default`] for the given method.
    #[must_use]
    pub const fn resolve(self, method: crate::Method) -> Self {
        match self {
            Self::Default if matches!(method, crate::Method::Get) => Self::UrlQuery,
            Self::Default => Self::Json,
            other => other,
        }
    }
}
