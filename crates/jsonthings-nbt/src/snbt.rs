//! Stringified NBT (SNBT) reader.
//!
//! Accepts the same syntax the game's tag parser does: compounds with quoted
//! or bare keys, homogeneous lists, typed arrays (`[B;..]`, `[I;..]`,
//! `[L;..]`), quoted strings with `\` escapes and suffixed numbers
//! (`1b`, `2s`, `3L`, `4.5f`, `6d`). Bare words that are not numbers become
//! strings; `true`/`false` become bytes.

use crate::error::NbtError;
use crate::tag::{is_unquoted_char, NbtCompound, NbtTag};

/// Maximum nesting depth to prevent stack overflow.
const MAX_DEPTH: usize = 512;

/// Parse an SNBT string whose root must be a compound.
pub fn parse_compound(input: &str) -> Result<NbtCompound, NbtError> {
    let mut reader = Reader::new(input);
    let compound = reader.read_struct(0)?;
    reader.skip_ws();
    if reader.peek().is_some() {
        return Err(NbtError::TrailingData {
            position: reader.pos,
        });
    }
    Ok(compound)
}

/// Parse a single SNBT value of any type.
pub fn parse_tag(input: &str) -> Result<NbtTag, NbtError> {
    let mut reader = Reader::new(input);
    let tag = reader.read_value(0)?;
    reader.skip_ws();
    if reader.peek().is_some() {
        return Err(NbtError::TrailingData {
            position: reader.pos,
        });
    }
    Ok(tag)
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), NbtError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(_) => Err(NbtError::Expected {
                expected,
                position: self.pos,
            }),
            None => Err(NbtError::UnexpectedEof { position: self.pos }),
        }
    }

    /// Consumes a `,` separator if present. Returns whether one was found.
    fn has_element_separator(&mut self) -> bool {
        self.skip_ws();
        if self.peek() == Some(',') {
            self.bump();
            self.skip_ws();
            true
        } else {
            false
        }
    }

    fn check_depth(depth: usize) -> Result<(), NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn read_value(&mut self, depth: usize) -> Result<NbtTag, NbtError> {
        Self::check_depth(depth)?;
        self.skip_ws();
        match self.peek() {
            None => Err(NbtError::UnexpectedEof { position: self.pos }),
            Some('{') => Ok(NbtTag::Compound(self.read_struct(depth + 1)?)),
            Some('[') => self.read_list_or_array(depth + 1),
            Some(_) => self.read_typed_value(),
        }
    }

    fn read_struct(&mut self, depth: usize) -> Result<NbtCompound, NbtError> {
        Self::check_depth(depth)?;
        self.expect('{')?;
        self.skip_ws();

        let mut compound = NbtCompound::new();
        while self.peek().is_some_and(|c| c != '}') {
            let start = self.pos;
            let key = self.read_key()?;
            if key.is_empty() {
                return Err(NbtError::ExpectedKey { position: start });
            }
            self.expect(':')?;
            let value = self.read_value(depth)?;
            compound.insert(key, value);

            if !self.has_element_separator() {
                break;
            }
            if self.peek().is_none() {
                return Err(NbtError::ExpectedKey { position: self.pos });
            }
        }
        self.expect('}')?;
        Ok(compound)
    }

    fn read_key(&mut self) -> Result<String, NbtError> {
        self.skip_ws();
        match self.peek() {
            None => Err(NbtError::ExpectedKey { position: self.pos }),
            Some(q @ ('"' | '\'')) => {
                self.bump();
                self.read_quoted(q)
            }
            Some(_) => Ok(self.read_unquoted().to_string()),
        }
    }

    fn read_unquoted(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_unquoted_char) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, NbtError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(NbtError::UnexpectedEof { position: self.pos }),
                Some('\\') => match self.bump() {
                    Some(c) if c == quote || c == '\\' => out.push(c),
                    Some(c) => {
                        return Err(NbtError::InvalidEscape {
                            escape: c,
                            position: self.pos - c.len_utf8(),
                        })
                    }
                    None => return Err(NbtError::UnexpectedEof { position: self.pos }),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn read_typed_value(&mut self) -> Result<NbtTag, NbtError> {
        self.skip_ws();
        let start = self.pos;
        if let Some(q @ ('"' | '\'')) = self.peek() {
            self.bump();
            return Ok(NbtTag::String(self.read_quoted(q)?));
        }
        let word = self.read_unquoted();
        if word.is_empty() {
            return Err(NbtError::ExpectedValue { position: start });
        }
        Ok(classify(word))
    }

    fn read_list_or_array(&mut self, depth: usize) -> Result<NbtTag, NbtError> {
        let is_array = matches!(self.peek_nth(1), Some(c) if c != '"' && c != '\'')
            && self.peek_nth(2) == Some(';');
        if is_array {
            self.read_array()
        } else {
            self.read_list(depth)
        }
    }

    fn read_list(&mut self, depth: usize) -> Result<NbtTag, NbtError> {
        self.expect('[')?;
        self.skip_ws();

        let mut list: Vec<NbtTag> = Vec::new();
        while self.peek().is_some_and(|c| c != ']') {
            let value = self.read_value(depth)?;
            if let Some(first) = list.first() {
                if first.tag_type_id() != value.tag_type_id() {
                    return Err(NbtError::MixedList {
                        found: value.tag_type_name(),
                        expected: first.tag_type_name(),
                    });
                }
            }
            list.push(value);

            if !self.has_element_separator() {
                break;
            }
            if self.peek().is_none() {
                return Err(NbtError::ExpectedValue { position: self.pos });
            }
        }
        self.expect(']')?;
        Ok(NbtTag::List(list))
    }

    fn read_array(&mut self) -> Result<NbtTag, NbtError> {
        self.expect('[')?;
        let kind = self.bump().unwrap_or_default();
        self.bump(); // ';'
        self.skip_ws();

        let mut values = Vec::new();
        while self.peek().is_some_and(|c| c != ']') {
            values.push(self.read_typed_value()?);
            if !self.has_element_separator() {
                break;
            }
            if self.peek().is_none() {
                return Err(NbtError::ExpectedValue { position: self.pos });
            }
        }
        self.expect(']')?;

        match kind {
            'B' => collect_array(values, "TAG_Byte_Array", |t| match t {
                NbtTag::Byte(v) => Some(v),
                _ => None,
            })
            .map(NbtTag::ByteArray),
            'I' => collect_array(values, "TAG_Int_Array", |t| match t {
                NbtTag::Int(v) => Some(v),
                NbtTag::Short(v) => Some(v.into()),
                NbtTag::Byte(v) => Some(v.into()),
                _ => None,
            })
            .map(NbtTag::IntArray),
            'L' => collect_array(values, "TAG_Long_Array", |t| match t {
                NbtTag::Long(v) => Some(v),
                NbtTag::Int(v) => Some(v.into()),
                NbtTag::Short(v) => Some(v.into()),
                NbtTag::Byte(v) => Some(v.into()),
                _ => None,
            })
            .map(NbtTag::LongArray),
            other => Err(NbtError::InvalidArrayType(other)),
        }
    }
}

fn collect_array<T>(
    values: Vec<NbtTag>,
    array: &'static str,
    convert: impl Fn(NbtTag) -> Option<T>,
) -> Result<Vec<T>, NbtError> {
    values
        .into_iter()
        .map(|tag| {
            let found = tag.tag_type_name();
            convert(tag).ok_or(NbtError::MixedArray { found, array })
        })
        .collect()
}

/// Turn a bare word into the most specific tag it can represent.
/// Out-of-range numbers fall back to strings, as the game does.
fn classify(word: &str) -> NbtTag {
    if word.eq_ignore_ascii_case("true") {
        return NbtTag::Byte(1);
    }
    if word.eq_ignore_ascii_case("false") {
        return NbtTag::Byte(0);
    }

    let (body, suffix) = match word.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&word[..i], Some(c.to_ascii_lowercase())),
        _ => (word, None),
    };

    let parsed = match suffix {
        Some('b') if is_integer(body) => body.parse().ok().map(NbtTag::Byte),
        Some('s') if is_integer(body) => body.parse().ok().map(NbtTag::Short),
        Some('l') if is_integer(body) => body.parse().ok().map(NbtTag::Long),
        Some('f') if is_float(body, false) => body.parse().ok().map(NbtTag::Float),
        Some('d') if is_float(body, false) => body.parse().ok().map(NbtTag::Double),
        None if is_integer(body) => body.parse().ok().map(NbtTag::Int),
        None if is_float(body, true) => body.parse().ok().map(NbtTag::Double),
        _ => None,
    };
    parsed.unwrap_or_else(|| NbtTag::String(word.to_string()))
}

/// `[-+]?(0|[1-9][0-9]*)`
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit),
    }
}

/// `[-+]?([0-9]+[.]?|[0-9]*[.][0-9]+)(e[-+]?[0-9]+)?`; an unsuffixed double
/// must contain a dot.
fn is_float(s: &str, require_dot: bool) -> bool {
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    if require_dot && frac_part.is_none() {
        return false;
    }
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match frac_part {
        None => !int_part.is_empty() && all_digits(int_part),
        Some("") => !int_part.is_empty() && all_digits(int_part),
        Some(frac) => all_digits(int_part) && all_digits(frac),
    };
    let exponent_ok = match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['-', '+']).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
    };
    mantissa_ok && exponent_ok
}
