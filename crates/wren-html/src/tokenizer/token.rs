/// An attribute on a start tag, borrowed from the markup.
///
/// The name keeps its source case; the value is the raw source text with
/// quotes removed and no character reference decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name as written.
    pub name: &'a str,
    /// Attribute value, or `""` when none was given.
    pub value: &'a str,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// A token borrowed from the markup being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Character data between constructs, verbatim. Never empty.
    Text(&'a str),

    /// `<!--data-->`. The data may be empty.
    Comment(&'a str),

    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Tag name as written.
        name: &'a str,
        /// The tag ended in `/>`.
        self_closing: bool,
        /// Attributes in source order; duplicates are kept.
        attributes: Vec<Attribute<'a>>,
    },

    /// `</name ...>`. Anything after the name is ignored.
    EndTag {
        /// Tag name as written.
        name: &'a str,
    },

    /// `<!name ...>`, e.g. a doctype.
    Declaration {
        /// Declaration keyword as written.
        name: &'a str,
    },
}
