//! CSS selector compiler and matching engine for wren trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector Compiler** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id, class and attribute selectors (`= ~= |= ^= $= *=`,
//!     `i` / `s` modifiers)
//!   - Descendant, child, next-sibling and subsequent-sibling combinators
//!   - Structural pseudo-classes including `:nth-*()` with `An+B`
//!   - Form-state pseudo-classes and `:not()` with a selector list
//!   - Selector lists
//!
//! - **Selector Matcher**
//!   - Right-to-left matching with an explicit work-list
//!
//! - **Query surface** ([DOM § 4.2.6](https://dom.spec.whatwg.org/#interface-parentnode))
//!   - `querySelector`, `querySelectorAll`, `matches`, `closest`
//!
//! # Not Implemented
//!
//! - Pseudo-elements
//! - Interactive pseudo-classes (`:hover`, `:focus`, ...)
//! - Namespace prefixes and CSS escapes
//! - Specificity

mod error;
/// Query functions over a tree.
pub mod query;
/// Selector AST, compilation and matching.
pub mod selector;

pub use error::{Operation, SelectorError};
pub use query::{closest, matches, query_selector, query_selector_all};
pub use selector::{CompiledSelector, SelectorList, compile, compile_list};
