//! Selector string parsing.
//!
//! A hand-written recursive-descent parser over the selector text. The only
//! recursion is for the argument of `:not()`, which may not itself contain
//! `:not()`.

use tracing::debug;

use super::{
    AttributeOperator, AttributeSelector, Combinator, CompiledSelector, Group, Nth, PseudoClass,
    SelectorList, SimpleSelector,
};
use crate::error::{Operation, SelectorError};

type ParseResult<T> = Result<T, String>;

/// Compile a single complex selector. Commas are rejected; use
/// [`compile_list`] for selector lists.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` is malformed.
pub fn compile(selector: &str) -> Result<CompiledSelector, SelectorError> {
    let mut list = compile_list(selector)?;
    if list.selectors.len() != 1 {
        return Err(SelectorError::invalid(
            Operation::Compile,
            selector,
            "expected a single selector, found a list",
        ));
    }
    Ok(list.selectors.remove(0))
}

/// Compile a comma-separated selector list.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` is malformed.
pub fn compile_list(selector: &str) -> Result<SelectorList, SelectorError> {
    let list = Parser::new(selector, false)
        .parse_list()
        .map_err(|reason| SelectorError::invalid(Operation::Compile, selector, reason))?;
    debug!(selector, compiled = %list, "compiled selector");
    Ok(list)
}

/// Characters allowed in identifiers: ASCII alphanumerics, `-`, `_`, and
/// anything non-ASCII.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Whitespace per [CSS Syntax § 4.2](https://www.w3.org/TR/css-syntax-3/#whitespace).
const fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Parsing the argument of `:not()`.
    in_negation: bool,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str, in_negation: bool) -> Self {
        Self {
            input,
            pos: 0,
            in_negation,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace; returns true if any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_css_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn identifier(&mut self, what: &str) -> ParseResult<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            let _ = self.bump();
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => format!("expected {what}, found '{c}'"),
                None => format!("expected {what}"),
            });
        }
        Ok(&self.input[start..self.pos])
    }

    // ===== Lists and complex selectors =====

    /// [§ 3.1](https://www.w3.org/TR/selectors-4/#selector-list)
    fn parse_list(&mut self) -> ParseResult<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            if self.at_end() || self.peek() == Some(',') {
                return Err("empty selector".to_string());
            }
            selectors.push(self.parse_complex()?);
            if self.at_end() {
                return Ok(SelectorList { selectors });
            }
            // parse_complex stops only at a comma or end of input.
            let _ = self.eat(',');
        }
    }

    /// Compounds separated by combinators, up to a top-level comma.
    fn parse_complex(&mut self) -> ParseResult<CompiledSelector> {
        let mut groups = vec![Group::Compound(self.parse_compound()?)];

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(c) => return Err(format!("unexpected character '{c}'")),
            };
            if combinator != Combinator::Descendant {
                let _ = self.bump();
                let _ = self.skip_whitespace();
            }

            match self.peek() {
                None | Some(',') => return Err("selector ends with a combinator".to_string()),
                Some('>' | '+' | '~') => return Err("consecutive combinators".to_string()),
                Some(_) => {}
            }

            groups.push(Group::Combinator(combinator));
            groups.push(Group::Compound(self.parse_compound()?));
        }

        Ok(CompiledSelector { groups })
    }

    // ===== Compound and simple selectors =====

    /// [§ 3.1](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> ParseResult<Vec<SimpleSelector>> {
        let mut compound = Vec::new();

        match self.peek() {
            Some('*') => {
                let _ = self.bump();
                compound.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_char(c) => {
                let name = self.identifier("a type selector")?;
                compound.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            let simple = match self.peek() {
                Some('#') => {
                    let _ = self.bump();
                    SimpleSelector::Attribute(AttributeSelector::id(self.identifier("an id")?))
                }
                Some('.') => {
                    let _ = self.bump();
                    SimpleSelector::Attribute(AttributeSelector::class(
                        self.identifier("a class name")?,
                    ))
                }
                Some('[') => {
                    let _ = self.bump();
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }
                Some(':') => {
                    let _ = self.bump();
                    SimpleSelector::PseudoClass(self.parse_pseudo_class()?)
                }
                Some('>' | '+' | '~') if compound.is_empty() => {
                    return Err("selector starts with a combinator".to_string());
                }
                Some(c) if compound.is_empty() => {
                    return Err(format!("unexpected character '{c}'"));
                }
                _ => break,
            };
            compound.push(simple);
        }

        if compound.is_empty() {
            return Err("expected a selector".to_string());
        }
        Ok(compound)
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the opening `[`.
    fn parse_attribute(&mut self) -> ParseResult<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = self.attribute_name()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector::Exists(name));
        }

        let operator = match self.bump() {
            Some('=') => AttributeOperator::Equals,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) if self.eat('=') => match c {
                '~' => AttributeOperator::Includes,
                '|' => AttributeOperator::DashMatch,
                '^' => AttributeOperator::Prefix,
                '$' => AttributeOperator::Suffix,
                _ => AttributeOperator::Substring,
            },
            Some(c) => return Err(format!("unknown attribute operator at '{c}'")),
            None => return Err("unterminated attribute selector".to_string()),
        };

        let _ = self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.bump();
                self.quoted(quote)?.to_string()
            }
            Some(_) => self.identifier("an attribute value")?.to_string(),
            None => return Err("unterminated attribute selector".to_string()),
        };

        let _ = self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                let _ = self.bump();
                true
            }
            Some('s' | 'S') => {
                let _ = self.bump();
                false
            }
            _ => false,
        };
        let _ = self.skip_whitespace();

        match self.bump() {
            Some(']') => Ok(AttributeSelector::Match {
                name,
                operator,
                value,
                case_insensitive,
            }),
            Some(c) => Err(format!("unexpected character '{c}' in attribute selector")),
            None => Err("unterminated attribute selector".to_string()),
        }
    }

    /// Attribute names also allow `:` and `.`, matching what the markup
    /// parser accepts.
    fn attribute_name(&mut self) -> ParseResult<&'a str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| is_ident_char(c) || c == ':' || c == '.')
        {
            let _ = self.bump();
        }
        if self.pos == start {
            return Err("expected an attribute name".to_string());
        }
        Ok(&self.input[start..self.pos])
    }

    /// Body of a quoted string, after the opening quote. Consumes the closing
    /// quote.
    fn quoted(&mut self, quote: char) -> ParseResult<&'a str> {
        let start = self.pos;
        let len = self.input[start..]
            .find(quote)
            .ok_or_else(|| "unterminated string".to_string())?;
        self.pos = start + len + quote.len_utf8();
        Ok(&self.input[start..start + len])
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Called after the `:`.
    fn parse_pseudo_class(&mut self) -> ParseResult<PseudoClass> {
        if self.peek() == Some(':') {
            return Err("pseudo-elements are not supported".to_string());
        }
        let name = self.identifier("a pseudo-class name")?.to_ascii_lowercase();
        let argument = if self.eat('(') {
            Some(self.argument()?)
        } else {
            None
        };

        let nth = |argument: Option<&str>| -> ParseResult<Nth> {
            let argument = argument.ok_or_else(|| format!(":{name}() requires an argument"))?;
            Nth::parse(argument).ok_or_else(|| format!("invalid :{name}() argument '{argument}'"))
        };

        let pseudo = match name.as_str() {
            "nth-child" => PseudoClass::NthChild(nth(argument)?),
            "nth-last-child" => PseudoClass::NthLastChild(nth(argument)?),
            "nth-of-type" => PseudoClass::NthOfType(nth(argument)?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(nth(argument)?),
            "not" => {
                if self.in_negation {
                    return Err(":not() cannot be nested".to_string());
                }
                let argument = argument.ok_or_else(|| ":not() requires an argument".to_string())?;
                PseudoClass::Not(Parser::new(argument, true).parse_list()?)
            }
            _ if argument.is_some() => {
                return Err(format!("unknown functional pseudo-class ':{name}()'"));
            }
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "checked" => PseudoClass::Checked,
            "read-only" => PseudoClass::ReadOnly,
            "read-write" => PseudoClass::ReadWrite,
            "optional" => PseudoClass::Optional,
            "required" => PseudoClass::Required,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            _ => return Err(format!("unknown pseudo-class ':{name}'")),
        };
        Ok(pseudo)
    }

    /// Text up to the matching `)`, after the opening `(`. Parentheses nest
    /// and quoted strings are skipped. Consumes the closing `)`.
    fn argument(&mut self) -> ParseResult<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '"' | '\'' => {
                    let _ = self.quoted(c)?;
                }
                '(' => depth += 1,
                ')' if depth == 0 => return Ok(&self.input[start..self.pos - 1]),
                ')' => depth -= 1,
                _ => {}
            }
        }
        Err("unterminated '('".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(selector: &str) -> String {
        match Parser::new(selector, false).parse_list() {
            Ok(list) => panic!("{selector:?} compiled to {list:?}"),
            Err(reason) => reason,
        }
    }

    #[test]
    fn test_error_reasons() {
        assert_eq!(reason(""), "empty selector");
        assert_eq!(reason("a,,b"), "empty selector");
        assert_eq!(reason("a, "), "empty selector");
        assert_eq!(reason("a)"), "unexpected character ')'");
        assert_eq!(reason("> a"), "selector starts with a combinator");
        assert_eq!(reason("a >"), "selector ends with a combinator");
        assert_eq!(reason("a > > b"), "consecutive combinators");
        assert_eq!(reason("a::before"), "pseudo-elements are not supported");
        assert_eq!(reason("a:hover"), "unknown pseudo-class ':hover'");
        assert_eq!(reason(":not(:not(a))"), ":not() cannot be nested");
        assert_eq!(reason("[a!=b]"), "unknown attribute operator at '!'");
        assert_eq!(reason("[a=\"b]"), "unterminated string");
        assert_eq!(reason("li:nth-child(2n+"), "unterminated '('");
        assert_eq!(reason(":nth-child"), ":nth-child() requires an argument");
        assert_eq!(reason(":first-child(1)"), "unknown functional pseudo-class ':first-child()'");
    }

    #[test]
    fn test_ident_chars() {
        assert!(is_ident_char('a'));
        assert!(is_ident_char('-'));
        assert!(is_ident_char('é'));
        assert!(!is_ident_char('.'));
        assert!(!is_ident_char(' '));
    }
}
