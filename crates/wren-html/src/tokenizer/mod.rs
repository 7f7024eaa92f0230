//! Markup tokenizer.
//!
//! A forgiving single-pass scanner. It recognizes comments, start and end
//! tags, and `<!...>` declarations; everything else between them is text.
//! There are no error states: input that does not form a construct is text.

/// Attribute span scanning.
pub mod attributes;
/// The tokenizer proper.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use attributes::AttributeScanner;
pub use scanner::{RawText, Tokenizer};
pub use token::{Attribute, Token};
