use super::token::Attribute;

/// Iterator over the attributes in a start tag's attribute span.
///
/// At each position an ASCII letter starts a name made of letters, digits,
/// `_`, `-`, `.` and `:`. The name may be followed by `=` (with optional
/// whitespace around it) and a value: double-quoted, single-quoted, or an
/// unquoted run of non-whitespace. A quoted value needs its closing quote;
/// without it the unquoted form applies. If no value follows, the value is
/// empty. Characters that cannot start a name are skipped.
pub struct AttributeScanner<'a> {
    span: &'a str,
    pos: usize,
}

impl<'a> AttributeScanner<'a> {
    /// Scan `span`, the text between a tag name and its closing `>`.
    #[must_use]
    pub const fn new(span: &'a str) -> Self {
        Self { span, pos: 0 }
    }

    fn skip_whitespace(&self, mut pos: usize) -> usize {
        let bytes = self.span.as_bytes();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Try to read `=value` starting at `pos` (just after the name).
    /// Returns the value and the position after it.
    fn value_at(&self, pos: usize) -> Option<(&'a str, usize)> {
        let bytes = self.span.as_bytes();
        let eq = self.skip_whitespace(pos);
        if bytes.get(eq) != Some(&b'=') {
            return None;
        }
        let start = self.skip_whitespace(eq + 1);
        let quote = *bytes.get(start)?;

        if quote == b'"' || quote == b'\'' {
            let body = start + 1;
            if let Some(len) = self.span[body..].find(char::from(quote)) {
                return Some((&self.span[body..body + len], body + len + 1));
            }
        }

        let len = self.span[start..]
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(self.span.len() - start);
        // `start` is not whitespace, so the run is never empty.
        Some((&self.span[start..start + len], start + len))
    }
}

const fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

impl<'a> Iterator for AttributeScanner<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.span.as_bytes();
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let name_start = self.pos;
        let mut name_end = name_start + 1;
        while name_end < bytes.len() && is_name_char(bytes[name_end]) {
            name_end += 1;
        }
        let name = &self.span[name_start..name_end];

        match self.value_at(name_end) {
            Some((value, next)) => {
                self.pos = next;
                Some(Attribute::new(name, value))
            }
            None => {
                self.pos = name_end;
                Some(Attribute::new(name, ""))
            }
        }
    }
}
