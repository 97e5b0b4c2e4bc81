//! Error types for feed encoding and decoding.

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Feed codec error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document root is not the element the decoder expects.
    #[error("expected element type <{expected}> but have <{found}>")]
    MalformedDocument {
        /// Local name of the expected root element (`entry` or `feed`).
        expected: &'static str,
        /// Local name of the root element actually found.
        found: String,
    },

    /// The document root has the right name but lives in another namespace.
    #[error("expected element <{element}> in name space {expected} but have {}", .found.as_deref().unwrap_or("no name space"))]
    UnexpectedNamespace {
        /// Local name of the root element.
        element: &'static str,
        /// Namespace the element must be declared in.
        expected: &'static str,
        /// Namespace the element was declared in, if any.
        found: Option<String>,
    },

    /// The document contains no root element.
    #[error("document has no root element, expected <{expected}>")]
    EmptyDocument {
        /// Local name of the expected root element.
        expected: &'static str,
    },

    /// The document ended before the element was closed.
    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof {
        /// Local name of the unclosed element.
        element: &'static str,
    },

    /// XML syntax error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute on an element.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A record without an end date cannot be written.
    #[error("monitor for {destination:?} has no end date")]
    MissingEndDate {
        /// Destination account of the rejected record.
        destination: String,
    },
}

impl Error {
    /// Returns true if the error means the input was not a usable document.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument { .. }
                | Self::UnexpectedNamespace { .. }
                | Self::EmptyDocument { .. }
                | Self::UnexpectedEof { .. }
                | Self::Xml(_)
                | Self::Attribute(_)
        )
    }
}
