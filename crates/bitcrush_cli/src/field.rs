use std::{fmt, str::FromStr};

use bitcrush::{
    BitReader, BitWriter, Word,
    foundation::{used_bits_u64, zigzag64},
    packed::header_bits,
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum FieldError {
    #[error("Unknown field kind in {0:?}")]
    #[diagnostic(
        code(bitcrush::cli::unknown_kind),
        help("Fields look like u12=5, s32=-129, p16=7, b=true or f=1.5")
    )]
    UnknownKind(String),

    #[error("Invalid bit width in {0:?}")]
    #[diagnostic(code(bitcrush::cli::invalid_width), help("Widths run from 1 to 64"))]
    InvalidWidth(String),

    #[error("Invalid value {value:?} for field {kind}")]
    #[diagnostic(
        code(bitcrush::cli::invalid_value),
        help("Integers must fit the declared width; hex integers take a 0x prefix")
    )]
    InvalidValue { kind: Kind, value: String },

    #[error("Field {0} needs a value")]
    #[diagnostic(code(bitcrush::cli::missing_value))]
    MissingValue(Kind),

    #[error("Field {0} takes no value when unpacking")]
    #[diagnostic(code(bitcrush::cli::unexpected_value))]
    UnexpectedValue(Kind),

    #[error("Invalid hex input {0:?}")]
    #[diagnostic(
        code(bitcrush::cli::invalid_hex),
        help("Pass an even number of hex digits, optionally prefixed with 0x")
    )]
    InvalidHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Unsigned(usize),
    Signed(usize),
    Packed(usize),
    Bool,
    Float,
}

impl Kind {
    /// Most bits a field of this kind can occupy.
    pub const fn max_bits(self) -> usize {
        match self {
            Self::Unsigned(n_bits) | Self::Signed(n_bits) => n_bits,
            Self::Packed(n_bits) => header_bits(n_bits) + n_bits,
            Self::Bool => 1,
            Self::Float => 32,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(n_bits) => write!(f, "u{n_bits}"),
            Self::Signed(n_bits) => write!(f, "s{n_bits}"),
            Self::Packed(n_bits) => write!(f, "p{n_bits}"),
            Self::Bool => f.write_str("b"),
            Self::Float => f.write_str("f"),
        }
    }
}

impl FromStr for Kind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let width = |digits: &str| match digits.parse::<usize>() {
            Ok(n_bits @ 1..=64) => Ok(n_bits),
            _ => Err(FieldError::InvalidWidth(s.to_string())),
        };

        match s.split_at_checked(1) {
            Some(("u", digits)) => width(digits).map(Self::Unsigned),
            Some(("s", digits)) => width(digits).map(Self::Signed),
            Some(("p", digits)) => width(digits).map(Self::Packed),
            Some(("b", "")) => Ok(Self::Bool),
            Some(("f", "")) => Ok(Self::Float),
            _ => Err(FieldError::UnknownKind(s.to_string())),
        }
    }
}

/// One `KIND[=VALUE]` command-line field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub kind: Kind,
    pub value: Option<String>,
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = match s.split_once('=') {
            Some((kind, value)) => (kind, Some(value.to_string())),
            None => (s, None),
        };

        Ok(Self {
            kind: kind.parse()?,
            value,
        })
    }
}

impl Field {
    fn invalid(&self, value: &str) -> FieldError {
        FieldError::InvalidValue {
            kind: self.kind,
            value: value.to_string(),
        }
    }

    fn parse_u64(&self, value: &str) -> Result<u64, FieldError> {
        let parsed = match value.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => value.parse(),
        };
        parsed.map_err(|_| self.invalid(value))
    }

    fn fits(&self, folded: u64, n_bits: usize, value: &str) -> Result<u64, FieldError> {
        if used_bits_u64(folded) > n_bits {
            return Err(self.invalid(value));
        }
        Ok(folded)
    }

    /// Writes this field's value.
    pub fn encode<W: Word>(&self, writer: &mut BitWriter<'_, W>) -> miette::Result<()> {
        let value = self
            .value
            .as_deref()
            .ok_or(FieldError::MissingValue(self.kind))?;

        match self.kind {
            Kind::Unsigned(n_bits) => {
                let parsed = self.fits(self.parse_u64(value)?, n_bits, value)?;
                writer.write(parsed, n_bits)?;
            }
            Kind::Signed(n_bits) => {
                let parsed: i64 = value.parse().map_err(|_| self.invalid(value))?;
                let folded = self.fits(zigzag64(parsed), n_bits, value)?;
                writer.write(folded, n_bits)?;
            }
            Kind::Packed(n_bits) => {
                let parsed = self.fits(self.parse_u64(value)?, n_bits, value)?;
                writer.write_packed(parsed, n_bits)?;
            }
            Kind::Bool => {
                let parsed = match value {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(self.invalid(value).into()),
                };
                writer.write_bool(parsed)?;
            }
            Kind::Float => {
                let parsed: f32 = value.parse().map_err(|_| self.invalid(value))?;
                writer.write_f32(parsed)?;
            }
        }

        Ok(())
    }

    /// Reads this field and renders the value.
    pub fn decode<W: Word>(&self, reader: &mut BitReader<'_, W>) -> miette::Result<String> {
        if self.value.is_some() {
            return Err(FieldError::UnexpectedValue(self.kind).into());
        }

        let rendered = match self.kind {
            Kind::Unsigned(n_bits) => reader.read(n_bits)?.to_string(),
            Kind::Signed(n_bits) => reader.read_signed_i64(n_bits)?.to_string(),
            Kind::Packed(n_bits) => reader.read_packed(n_bits)?.to_string(),
            Kind::Bool => reader.read_bool()?.to_string(),
            Kind::Float => reader.read_f32()?.to_string(),
        };

        Ok(rendered)
    }
}

pub fn parse_hex(input: &str) -> Result<Vec<u8>, FieldError> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) || digits.len() % 2 != 0 {
        return Err(FieldError::InvalidHex(input.to_string()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| FieldError::InvalidHex(input.to_string()))
        })
        .collect()
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Serializes words little-endian, so every word shape yields the same bytes
/// for the same bits.
pub fn words_to_bytes<W: Word>(words: &[W], len: usize) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| word.to_u64().to_le_bytes().into_iter().take(W::BITS / 8))
        .take(len)
        .collect()
}

pub fn bytes_to_words<W: Word>(bytes: &[u8]) -> Vec<W> {
    bytes
        .chunks(W::BITS / 8)
        .map(|chunk| {
            W::from_u64(
                chunk
                    .iter()
                    .rev()
                    .fold(0, |acc, &byte| (acc << 8) | byte as u64),
            )
        })
        .collect()
}
