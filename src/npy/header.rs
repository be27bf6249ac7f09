//! Array Header
//!
//! Encodes and decodes the preamble and the Python-dict descriptor.

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{GridError, Result};

use super::{DESCR, HEADER_ALIGNMENT, HEADER_SIZE, MAGIC, PREAMBLE_SIZE, VERSION};

/// dtype strings accepted for unsigned 8-bit elements
const ACCEPTED_DESCRS: [&str; 5] = ["|u1", "<u1", ">u1", "=u1", "u1"];

/// Parsed array header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Array dimensions, outermost first
    pub shape: Vec<usize>,
    /// Byte offset of the first payload byte
    pub payload_offset: usize,
}

impl ArrayHeader {
    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of payload bytes described by the shape
    pub fn element_count(&self) -> Result<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                GridError::Format(format!("shape {:?} overflows the address space", self.shape))
            })
    }

    /// Grid dimensions for a 1-D or 2-D array; `(n,)` is a single row
    pub fn grid_dims(&self) -> Result<(usize, usize)> {
        match self.shape.as_slice() {
            [cols] => Ok((1, *cols)),
            [rows, cols] => Ok((*rows, *cols)),
            other => Err(GridError::Format(format!(
                "expected a 1-D or 2-D grid, found {} dimensions",
                other.len()
            ))),
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Read and validate a header, leaving `source` positioned at the payload
pub fn read_header<R: Read>(source: &mut R) -> Result<ArrayHeader> {
    let mut preamble = [0u8; 8];
    read_exact_or_format(source, &mut preamble, "preamble")?;

    if &preamble[0..6] != MAGIC {
        return Err(GridError::Format(format!(
            "Invalid array magic: expected {:?}, got {:?}",
            MAGIC,
            &preamble[0..6]
        )));
    }

    let (major, minor) = (preamble[6], preamble[7]);
    let (text_len, preamble_len) = match major {
        1 => {
            let mut len = [0u8; 2];
            read_exact_or_format(source, &mut len, "header length")?;
            (len.as_slice().get_u16_le() as usize, PREAMBLE_SIZE)
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            read_exact_or_format(source, &mut len, "header length")?;
            (len.as_slice().get_u32_le() as usize, PREAMBLE_SIZE + 2)
        }
        _ => {
            return Err(GridError::Format(format!(
                "Unsupported array version: {}.{}",
                major, minor
            )))
        }
    };

    // Grows as bytes arrive, so a corrupt length cannot force a large allocation
    let mut text = Vec::new();
    source.by_ref().take(text_len as u64).read_to_end(&mut text)?;
    if text.len() != text_len {
        return Err(GridError::Format(format!(
            "truncated header: descriptor has {} of {} bytes",
            text.len(),
            text_len
        )));
    }

    if text.last() != Some(&b'\n') {
        return Err(GridError::Format(
            "descriptor is not newline-terminated".to_string(),
        ));
    }

    let text = std::str::from_utf8(&text)
        .map_err(|e| GridError::Format(format!("descriptor is not text: {}", e)))?;
    let descriptor = Descriptor::parse(text)?;

    if !ACCEPTED_DESCRS.contains(&descriptor.descr.as_str()) {
        return Err(GridError::Format(format!(
            "unsupported dtype '{}': only unsigned 8-bit arrays are supported",
            descriptor.descr
        )));
    }
    if descriptor.fortran_order && descriptor.shape.len() > 1 {
        return Err(GridError::Format(
            "Fortran-ordered arrays are not supported".to_string(),
        ));
    }

    Ok(ArrayHeader {
        shape: descriptor.shape,
        payload_offset: preamble_len + text_len,
    })
}

fn read_exact_or_format<R: Read>(source: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    source.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => GridError::Format(format!("truncated header: missing {}", what)),
        _ => GridError::Io(e),
    })
}

// =============================================================================
// Writing
// =============================================================================

/// Encode a version 1.0 header for a `u1` C-ordered array of `shape`
pub fn encode_header(shape: &[usize]) -> Result<BytesMut> {
    let text = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        DESCR,
        format_shape(shape)
    );

    // +1 for the trailing newline
    let unpadded = PREAMBLE_SIZE + text.len() + 1;
    let total = unpadded.div_ceil(HEADER_ALIGNMENT) * HEADER_ALIGNMENT;
    let total = total.max(HEADER_SIZE);

    let header_len = u16::try_from(total - PREAMBLE_SIZE).map_err(|_| {
        GridError::Format(format!("header for shape {:?} does not fit a u16 length", shape))
    })?;

    let mut buf = BytesMut::with_capacity(total);
    buf.put_slice(MAGIC);
    buf.put_u8(VERSION.0);
    buf.put_u8(VERSION.1);
    buf.put_u16_le(header_len);
    buf.put_slice(text.as_bytes());
    buf.put_bytes(b' ', total - unpadded);
    buf.put_u8(b'\n');

    Ok(buf)
}

/// Write a header for `shape`, returning the number of bytes written
pub fn write_header<W: Write>(destination: &mut W, shape: &[usize]) -> Result<usize> {
    let header = encode_header(shape)?;
    destination.write_all(&header)?;
    Ok(header.len())
}

/// Python tuple syntax: `(5,)`, `(3, 4)`, `(2, 3, 4)`
fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({},)", single),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

// =============================================================================
// Descriptor Parsing
// =============================================================================

/// The three keys every descriptor carries
#[derive(Debug)]
struct Descriptor {
    descr: String,
    fortran_order: bool,
    shape: Vec<usize>,
}

/// A value inside the descriptor dict
#[derive(Debug)]
enum Literal {
    Str(String),
    Bool(bool),
    Tuple(Vec<usize>),
}

impl Descriptor {
    fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser::new(text.trim_end());
        let mut descr = None;
        let mut fortran_order = None;
        let mut shape = None;

        parser.expect(b'{')?;
        loop {
            parser.skip_whitespace();
            if parser.eat(b'}') {
                break;
            }

            let key = parser.string()?;
            parser.skip_whitespace();
            parser.expect(b':')?;
            parser.skip_whitespace();
            let value = parser.literal()?;

            match (key.as_str(), value) {
                ("descr", Literal::Str(s)) => descr = Some(s),
                ("fortran_order", Literal::Bool(b)) => fortran_order = Some(b),
                ("shape", Literal::Tuple(t)) => shape = Some(t),
                (key, value) => {
                    return Err(GridError::Format(format!(
                        "unexpected descriptor entry '{}': {:?}",
                        key, value
                    )))
                }
            }

            parser.skip_whitespace();
            if !parser.eat(b',') {
                parser.skip_whitespace();
                parser.expect(b'}')?;
                break;
            }
        }

        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(GridError::Format(
                "trailing characters after descriptor".to_string(),
            ));
        }

        let missing = |key: &str| GridError::Format(format!("descriptor is missing '{}'", key));
        Ok(Self {
            descr: descr.ok_or_else(|| missing("descr"))?,
            fortran_order: fortran_order.ok_or_else(|| missing("fortran_order"))?,
            shape: shape.ok_or_else(|| missing("shape"))?,
        })
    }
}

/// Cursor over the descriptor bytes
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn error(&self, what: &str) -> GridError {
        GridError::Format(format!("unparseable descriptor at byte {}: {}", self.pos, what))
    }

    fn literal(&mut self) -> Result<Literal> {
        match self.peek() {
            Some(b'\'') | Some(b'"') => self.string().map(Literal::Str),
            Some(b'(') => self.tuple().map(Literal::Tuple),
            Some(b'T') | Some(b'F') => self.boolean().map(Literal::Bool),
            _ => Err(self.error("expected a string, boolean or tuple")),
        }
    }

    fn string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == quote {
                let s = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                self.pos += 1;
                return Ok(s);
            }
            self.pos += 1;
        }
        Err(self.error("unterminated string"))
    }

    fn boolean(&mut self) -> Result<bool> {
        let rest = &self.bytes[self.pos..];
        if rest.starts_with(b"True") {
            self.pos += 4;
            Ok(true)
        } else if rest.starts_with(b"False") {
            self.pos += 5;
            Ok(false)
        } else {
            Err(self.error("expected True or False"))
        }
    }

    fn tuple(&mut self) -> Result<Vec<usize>> {
        self.expect(b'(')?;
        let mut dims = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(b')') {
                return Ok(dims);
            }
            dims.push(self.integer()?);
            self.skip_whitespace();
            if !self.eat(b',') {
                self.skip_whitespace();
                self.expect(b')')?;
                return Ok(dims);
            }
        }
    }

    fn integer(&mut self) -> Result<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a dimension"));
        }
        let digits = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid dimension"))?;
        let value = digits
            .parse()
            .map_err(|_| self.error("dimension out of range"))?;
        // Python 2 long suffix
        self.eat(b'L');
        Ok(value)
    }
}
