use core::fmt;

/// [§ 6.2 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// "The An+B notation defines an integer step (A) and offset (B), and
/// represents the An+Bth elements in a list, for every positive integer or
/// zero value of n, with the first element in the list having index 1."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Step.
    pub a: i32,
    /// Offset.
    pub b: i32,
}

impl Nth {
    /// `odd`, i.e. `2n+1`.
    pub const ODD: Self = Self { a: 2, b: 1 };
    /// `even`, i.e. `2n`.
    pub const EVEN: Self = Self { a: 2, b: 0 };

    /// Parse `odd`, `even`, an integer, or `An+B` with optional whitespace
    /// around the sign. Returns `None` for anything else.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_ascii_lowercase();
        match input.as_str() {
            "odd" => return Some(Self::ODD),
            "even" => return Some(Self::EVEN),
            _ => {}
        }

        let Some(n_pos) = input.find('n') else {
            return parse_signed(&input).map(|b| Self { a: 0, b });
        };

        let a = match &input[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            digits => parse_signed(digits)?,
        };

        let rest = input[n_pos + 1..].trim_start();
        let b = if rest.is_empty() {
            0
        } else {
            let (negative, digits) = match rest.as_bytes()[0] {
                b'+' => (false, rest[1..].trim_start()),
                b'-' => (true, rest[1..].trim_start()),
                _ => return None,
            };
            let magnitude = parse_unsigned(digits)?;
            if negative { -magnitude } else { magnitude }
        };

        Some(Self { a, b })
    }

    /// True if the 1-based `position` equals `a*k + b` for some integer
    /// `k >= 0`.
    #[must_use]
    pub fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return position == b;
        }
        let diff = position - b;
        diff % a == 0 && diff / a >= 0
    }
}

/// `[+-]?digits`, no inner whitespace.
fn parse_signed(input: &str) -> Option<i32> {
    let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
    let magnitude = parse_unsigned(digits)?;
    Some(if input.starts_with('-') { -magnitude } else { magnitude })
}

fn parse_unsigned(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Nth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{b}"),
            (a, b) => {
                match a {
                    1 => f.write_str("n")?,
                    -1 => f.write_str("-n")?,
                    _ => write!(f, "{a}n")?,
                }
                if b != 0 {
                    write!(f, "{b:+}")?;
                }
                Ok(())
            }
        }
    }
}
