//! CSS selector compilation and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) needed for
//! structural queries: type, universal, id, class and attribute selectors,
//! the four combinators, and the structural, form-state and `:not()`
//! pseudo-classes.
//!
//! A selector string compiles to a [`SelectorList`]. Each
//! [`CompiledSelector`] in the list is a flat sequence of [`Group`]s that
//! alternates compound and combinator, left to right as written. Matching
//! runs right to left, starting at the key (rightmost) compound.

use core::fmt;

/// Selector string parsing.
pub mod compile;
/// Tree matching.
pub mod matching;
/// `An+B` notation.
pub mod nth;

pub use compile::{compile, compile_list};
pub use matching::{matches_chain, matches_compound, matches_simple};
pub use nth::Nth;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element. Id and class
/// selectors compile to attribute selectors (`#x` is `[id="x"]`, `.x` is
/// `[class~="x"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type..."
    ///
    /// Stored in ASCII lowercase.
    Type(String),

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),
}

/// Attribute selectors per [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[att]`: "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Exists(String),

    /// `[att<op>val<modifier>]`
    Match {
        /// Attribute name, ASCII lowercase.
        name: String,
        /// Comparison to apply.
        operator: AttributeOperator,
        /// Value to compare against.
        value: String,
        /// [§ 6.3](https://www.w3.org/TR/selectors-4/#attribute-case)
        /// Set by the `i` modifier.
        case_insensitive: bool,
    },
}

impl AttributeSelector {
    /// `#id`
    #[must_use]
    pub fn id(value: &str) -> Self {
        Self::Match {
            name: "id".to_string(),
            operator: AttributeOperator::Equals,
            value: value.to_string(),
            case_insensitive: false,
        }
    }

    /// `.class`
    #[must_use]
    pub fn class(value: &str) -> Self {
        Self::Match {
            name: "class".to_string(),
            operator: AttributeOperator::Includes,
            value: value.to_string(),
            case_insensitive: false,
        }
    }
}

/// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation) and
/// [§ 6.2](https://www.w3.org/TR/selectors-4/#attribute-substrings)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `=` exact value.
    Equals,
    /// `~=` one of the whitespace-separated words.
    Includes,
    /// `|=` exact value, or value followed by `-`.
    DashMatch,
    /// `^=` prefix.
    Prefix,
    /// `$=` suffix.
    Suffix,
    /// `*=` substring.
    Substring,
}

impl AttributeOperator {
    /// The operator as written in a selector.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// Supported pseudo-classes per [§ 3.5](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    ///
    /// Here: an element whose parent is a fragment, i.e. a top-level element.
    Root,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    ///
    /// No element or text children. Comments are ignored.
    Empty,
    /// [§ 13.1.2 :disabled](https://www.w3.org/TR/selectors-4/#disabled-pseudo)
    Disabled,
    /// [§ 13.1.1 :enabled](https://www.w3.org/TR/selectors-4/#enabled-pseudo)
    Enabled,
    /// [§ 13.3.4 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 13.2 :read-only](https://www.w3.org/TR/selectors-4/#rw-pseudos)
    ReadOnly,
    /// [§ 13.2 :read-write](https://www.w3.org/TR/selectors-4/#rw-pseudos)
    ReadWrite,
    /// [§ 13.3.6 :optional](https://www.w3.org/TR/selectors-4/#opt-pseudos)
    Optional,
    /// [§ 13.3.6 :required](https://www.w3.org/TR/selectors-4/#opt-pseudos)
    Required,
    /// [§ 14.4.3 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.4 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.5 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.5.3 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.4 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.5 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),
    /// [§ 14.4.2 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 14.5.1 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 14.5.2 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class
    /// taking a selector list as an argument."
    ///
    /// Cannot be nested.
    Not(SelectorList),
}

impl PseudoClass {
    /// Name without the leading colon.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Empty => "empty",
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::Checked => "checked",
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
            Self::Optional => "optional",
            Self::Required => "required",
            Self::FirstChild => "first-child",
            Self::LastChild => "last-child",
            Self::OnlyChild => "only-child",
            Self::FirstOfType => "first-of-type",
            Self::LastOfType => "last-of-type",
            Self::OnlyOfType => "only-of-type",
            Self::NthChild(_) => "nth-child",
            Self::NthLastChild(_) => "nth-last-child",
            Self::NthOfType(_) => "nth-of-type",
            Self::NthLastOfType(_) => "nth-last-of-type",
            Self::Not(_) => "not",
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    SubsequentSibling,
}

/// One step of a compiled selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    /// [§ 3.1](https://www.w3.org/TR/selectors-4/#compound)
    /// "A compound selector is a sequence of simple selectors that are not
    /// separated by a combinator." Never empty.
    Compound(Vec<SimpleSelector>),
    /// Relation between the compounds on either side.
    Combinator(Combinator),
}

/// [§ 3.1](https://www.w3.org/TR/selectors-4/#complex)
///
/// A complex selector. Groups alternate compound and combinator, and start
/// and end with a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelector {
    /// Groups in source order.
    pub groups: Vec<Group>,
}

impl CompiledSelector {
    /// The key (rightmost) compound.
    #[must_use]
    pub fn key(&self) -> &[SimpleSelector] {
        match self.groups.last() {
            Some(Group::Compound(compound)) => compound,
            _ => &[],
        }
    }
}

/// [§ 3.1](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors." An element
/// matches the list if it matches any selector in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// Selectors in source order.
    pub selectors: Vec<CompiledSelector>,
}

// ===== Serialization =====

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Type(name) => f.write_str(name),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::PseudoClass(pc) => write!(f, "{pc}"),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists(name) => write!(f, "[{name}]"),
            Self::Match {
                name,
                operator,
                value,
                case_insensitive,
            } => {
                let plain = !case_insensitive && is_identifier(value);
                match (name.as_str(), operator) {
                    ("id", AttributeOperator::Equals) if plain => write!(f, "#{value}"),
                    ("class", AttributeOperator::Includes) if plain => write!(f, ".{value}"),
                    _ => {
                        let quote = if value.contains('"') { '\'' } else { '"' };
                        write!(f, "[{name}{}{quote}{value}{quote}", operator.as_str())?;
                        if *case_insensitive {
                            f.write_str(" i")?;
                        }
                        f.write_str("]")
                    }
                }
            }
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())?;
        match self {
            Self::NthChild(nth)
            | Self::NthLastChild(nth)
            | Self::NthOfType(nth)
            | Self::NthLastOfType(nth) => write!(f, "({nth})"),
            Self::Not(list) => write!(f, "({list})"),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        })
    }
}

impl fmt::Display for CompiledSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            match group {
                Group::Compound(compound) => {
                    for simple in compound {
                        write!(f, "{simple}")?;
                    }
                }
                Group::Combinator(combinator) => write!(f, "{combinator}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// True if `value` can be written after `#` or `.` without quoting.
fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(compile::is_ident_char)
}
