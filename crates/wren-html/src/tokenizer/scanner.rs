use super::attributes::AttributeScanner;
use super::token::Token;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Content of a raw-text element, as returned by
/// [`Tokenizer::consume_raw_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawText<'a> {
    /// Everything between the start tag and the matching end tag.
    pub text: &'a str,
    /// False if the input ended before a matching end tag.
    pub terminated: bool,
}

/// Single-pass tokenizer over borrowed markup.
///
/// Tokens come out in source order. Text is everything between two
/// constructs and is never empty. The tree builder switches to raw-text
/// scanning after a `script` or `style` start tag with
/// [`Tokenizer::consume_raw_text`].
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

/// A construct found at a `<`: the token and the position after it.
type Construct<'a> = (Token<'a>, usize);

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset into the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// True once the whole input has been consumed.
    ///
    /// Right after a [`Token::Text`] this tells trailing text (everything
    /// after the last construct) apart from text between two constructs.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        let mut search = self.pos;
        while let Some(offset) = self.input[search..].find('<') {
            let lt = search + offset;
            match self.construct_at(lt) {
                Some(found) if lt == self.pos => {
                    let (token, next) = found;
                    self.pos = next;
                    return Some(token);
                }
                Some(_) => {
                    let text = &self.input[self.pos..lt];
                    self.pos = lt;
                    return Some(Token::Text(text));
                }
                // Every construct ends in `>`; none can start past the last one.
                None if !self.input[lt..].contains('>') => break,
                None => search = lt + 1,
            }
        }

        let text = &self.input[self.pos..];
        self.pos = self.input.len();
        Some(Token::Text(text))
    }

    /// Recognize a comment or tag starting at `lt`, which holds a `<`.
    fn construct_at(&self, lt: usize) -> Option<Construct<'a>> {
        self.comment_at(lt).or_else(|| self.tag_at(lt))
    }

    /// [§ 13.1.6 Comments](https://html.spec.whatwg.org/multipage/syntax.html#comments)
    ///
    /// `<!--` up to the first following `-->`. The two may not overlap, so
    /// `<!-->` alone is not a comment.
    fn comment_at(&self, lt: usize) -> Option<Construct<'a>> {
        let rest = &self.input[lt..];
        if !rest.starts_with(COMMENT_OPEN) {
            return None;
        }
        let body = lt + COMMENT_OPEN.len();
        let len = self.input[body..].find(COMMENT_CLOSE)?;
        let data = &self.input[body..body + len];
        Some((Token::Comment(data), body + len + COMMENT_CLOSE.len()))
    }

    /// `<`, optional `/` or `!`, a name, optional whitespace, then an
    /// attribute span up to the first `>`. A `/` directly before the `>` marks
    /// the tag self-closing.
    fn tag_at(&self, lt: usize) -> Option<Construct<'a>> {
        let bytes = self.input.as_bytes();
        let mut pos = lt + 1;

        let marker = match bytes.get(pos) {
            Some(&b @ (b'/' | b'!')) => {
                pos += 1;
                Some(b)
            }
            _ => None,
        };

        let name_start = pos;
        if !bytes.get(pos).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }
        pos += 1;
        while bytes
            .get(pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-')
        {
            pos += 1;
        }
        let name = &self.input[name_start..pos];

        while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
            pos += 1;
        }
        let gt = pos + self.input[pos..].find('>')?;
        let next = gt + 1;

        let token = match marker {
            Some(b'/') => Token::EndTag { name },
            Some(_) => Token::Declaration { name },
            None => {
                let span = &self.input[pos..gt];
                let (span, self_closing) = match span.strip_suffix('/') {
                    Some(rest) => (rest, true),
                    None => (span, false),
                };
                Token::StartTag {
                    name,
                    self_closing,
                    attributes: AttributeScanner::new(span).collect(),
                }
            }
        };
        Some((token, next))
    }

    /// Consume the content of a raw-text element named `name`.
    ///
    /// Scans for `<name` and `</name` (any ASCII case) followed by
    /// whitespace, `/` or `>`, and closed by a `>`. Nested start tags that are
    /// not self-closing raise the depth; end tags lower it, and an end tag at
    /// depth zero terminates the region. The tokenizer resumes after the
    /// terminating end tag, or at end of input if there is none.
    pub fn consume_raw_text(&mut self, name: &str) -> RawText<'a> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut depth = 0usize;
        let mut search = start;

        while let Some(offset) = self.input[search..].find('<') {
            let lt = search + offset;
            search = lt + 1;

            let closing = bytes.get(lt + 1) == Some(&b'/');
            let name_start = lt + 1 + usize::from(closing);
            let name_end = name_start + name.len();
            let name_matches = bytes
                .get(name_start..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()));
            let boundary = bytes
                .get(name_end)
                .is_some_and(|&b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'));
            if !name_matches || !boundary {
                continue;
            }

            let Some(gt) = self.input[name_end..].find('>').map(|i| name_end + i) else {
                break;
            };

            if closing {
                if depth == 0 {
                    self.pos = gt + 1;
                    return RawText {
                        text: &self.input[start..lt],
                        terminated: true,
                    };
                }
                depth -= 1;
            } else if bytes[gt - 1] != b'/' {
                depth += 1;
            }
            search = gt + 1;
        }

        self.pos = self.input.len();
        RawText {
            text: &self.input[start..],
            terminated: false,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
