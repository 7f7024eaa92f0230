//! The write contract the parser builds through.
//!
//! [`DomTree`](crate::DomTree) is the default sink. Other sinks (a foreign
//! DOM binding, a counting sink for tests) implement [`NodeSink`] and may
//! refuse operations by returning an error, which the parser propagates
//! immediately.

use strum_macros::Display;
use thiserror::Error;

/// Factory and mutation interface used by the tree builder.
///
/// Every operation is fallible so a sink can stop the parse. Names follow
/// the DOM methods they stand for.
pub trait NodeSink {
    /// Opaque node reference.
    type Handle: Copy;
    /// Error a sink reports when it cannot honour an operation.
    type Error;

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createdocumentfragment)
    fn create_document_fragment(&mut self) -> Result<Self::Handle, Self::Error>;

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createelementns)
    ///
    /// `local_name` is already lowercase.
    fn create_element_ns(
        &mut self,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<Self::Handle, Self::Error>;

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    fn create_text_node(&mut self, data: &str) -> Result<Self::Handle, Self::Error>;

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createcomment)
    fn create_comment(&mut self, data: &str) -> Result<Self::Handle, Self::Error>;

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-appendchild)
    ///
    /// Appending a fragment moves its children into `parent`.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle)
    -> Result<(), Self::Error>;

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-setattribute)
    fn set_attribute(
        &mut self,
        element: Self::Handle,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error>;
}

/// The sink operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SinkOperation {
    /// `createDocumentFragment`
    #[strum(serialize = "createDocumentFragment")]
    CreateDocumentFragment,
    /// `createElementNS`
    #[strum(serialize = "createElementNS")]
    CreateElementNs,
    /// `createTextNode`
    #[strum(serialize = "createTextNode")]
    CreateTextNode,
    /// `createComment`
    #[strum(serialize = "createComment")]
    CreateComment,
    /// `appendChild`
    #[strum(serialize = "appendChild")]
    AppendChild,
    /// `setAttribute`
    #[strum(serialize = "setAttribute")]
    SetAttribute,
}

/// Error type for sinks that have no richer error of their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink cannot perform the requested operation.
    #[error("node sink rejected {operation}: {detail}")]
    ContractViolation {
        /// Operation that was rejected.
        operation: SinkOperation,
        /// Human-readable reason.
        detail: String,
    },
}

impl SinkError {
    /// Shorthand for [`SinkError::ContractViolation`].
    pub fn violation(operation: SinkOperation, detail: impl Into<String>) -> Self {
        Self::ContractViolation {
            operation,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_displays_dom_method_name() {
        assert_eq!(SinkOperation::CreateElementNs.to_string(), "createElementNS");
        assert_eq!(SinkOperation::AppendChild.to_string(), "appendChild");
    }

    #[test]
    fn test_violation_message() {
        let err = SinkError::violation(SinkOperation::SetAttribute, "read-only");
        assert_eq!(err.to_string(), "node sink rejected setAttribute: read-only");
    }
}
