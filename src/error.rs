//! The error type returned by every fallible operation in this crate.

use thiserror::Error;

/// Everything that can go wrong while loading or navigating a JSON value.
///
/// Every byte-position-carrying variant reports an absolute offset into the
/// byte source, so callers can point back at the exact location of the
/// failure without re-scanning from the start.
#[derive(Debug, Error)]
pub enum Error {
    /// The byte source was empty or could not be read from at all.
    #[error("source is not usable: {0}")]
    SourceUnusable(&'static str),

    /// End of input was reached where at least one more byte was required.
    #[error("unexpected end of input at position {0}")]
    UnexpectedEof(u64),

    /// A byte appeared that no grammar rule at the current state admits.
    #[error("unexpected byte {byte:#04x} at position {pos}")]
    UnexpectedByte {
        /// The offending byte.
        byte: u8,
        /// Its absolute offset in the source.
        pos: u64,
    },

    /// A `null`/`true`/`false` literal was partially matched, then diverged.
    #[error("invalid literal at position {0}")]
    InvalidLiteral(u64),

    /// A numeric escape sequence or digit run could not be decoded.
    #[error("invalid number at position {0}")]
    InvalidNumber(u64),

    /// An ASCII control byte (0x00-0x1F) appeared inside a JSON string.
    #[error("control byte in string at position {0}")]
    ControlByteInString(u64),

    /// A `\X` escape used a byte other than the ones JSON defines.
    #[error("invalid escape at position {0}")]
    InvalidEscape(u64),

    /// A `\uXXXX` escape did not contain four hex digits.
    #[error("invalid unicode escape at position {0}")]
    InvalidUnicodeEscape(u64),

    /// A lone or mismatched UTF-16 surrogate appeared in a `\uXXXX` escape.
    #[error("invalid high surrogate at position {0}")]
    InvalidSurrogate(u64),

    /// Neither `,` nor `]` followed an array element.
    #[error("expected ',' or ']' at position {0}")]
    ExpectedCommaOrArrayEnd(u64),

    /// Neither `,` nor `}}` followed an object property.
    #[error("expected ',' or '}}' at position {0}")]
    ExpectedCommaOrObjectEnd(u64),

    /// A `,` was immediately followed by the container's closing byte.
    #[error("trailing comma at position {0}")]
    TrailingComma(u64),

    /// An object key was not a JSON string.
    #[error("non-string key at position {0}")]
    NonStringKey(u64),

    /// A `:` was expected after an object key but not found.
    #[error("expected ':' at position {0}")]
    ExpectedColon(u64),

    /// An attempt was made to mutate a container produced by this reader.
    #[error("value is read-only")]
    ReadOnly,

    /// The underlying byte source failed a read or seek.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An internal invariant was violated. Should be unreachable on
    /// well-formed input; if you see this, it is a bug in this crate.
    #[error("internal error: {0}")]
    Logic(&'static str),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
