//! bytestruct encodes plain Rust structs as fixed binary layouts and decodes
//! them back.
//!
//! A record is an ordered list of fields. Scalars are written at their fixed
//! width in one caller-chosen byte order. Variable-length fields (strings,
//! byte sequences, sequences of records) carry no length of their own: a
//! sibling field holds it. On the encode side a field marked
//! `payload_of = other` is a length prefix, computed from the serialized size
//! of `other`. On the decode side a field marked `size_ref = other` takes its
//! byte count from the already decoded value of `other`.
//!
//! The wire format is the concatenation of the fields, in declaration order,
//! with no framing of any kind.
//!
//! # Examples
//!
//! ```
//! use bytestruct::{ByteOrder, ByteStruct, marshal, unmarshal};
//!
//! #[derive(Debug, PartialEq, ByteStruct)]
//! struct Message {
//!     #[bytestruct(payload_of = payload)]
//!     length: u16,
//!     #[bytestruct(size_ref = length)]
//!     payload: String,
//! }
//!
//! let message = Message { length: 0, payload: "Hello World".to_string() };
//! let bytes = marshal(ByteOrder::BigEndian, &message).unwrap();
//! assert_eq!(bytes, b"\x00\x0bHello World");
//!
//! let decoded: Message = unmarshal(&bytes[..], ByteOrder::BigEndian).unwrap();
//! assert_eq!(decoded.length, 11);
//! assert_eq!(decoded.payload, "Hello World");
//! ```

extern crate self as bytestruct;

mod config;
mod context;
mod error;
mod read;
mod scalar;
mod schema;
mod traits;
mod varlen;
mod write;

pub use crate::config::{ByteOrder, Config, LengthCast};
pub use crate::context::Scalar;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::read::{Reader, from_slice, unmarshal, unmarshal_verified, unmarshal_with};
pub use crate::schema::{Annotation, FieldDescriptor, FieldRef, Kind};
pub use crate::traits::{ByteStruct, Field};
pub use crate::write::{Writer, marshal, marshal_with};

/// Re-export of the derive macro for implementing [`ByteStruct`] and
/// [`Field`] on a struct with named fields.
///
/// # Attributes
///
/// - `#[bytestruct(payload_of = field)]`: this numeric field is the length
///   prefix of `field`, which must be declared right after it. Its value is
///   computed while encoding.
/// - `#[bytestruct(size_ref = field)]`: this field's byte count is the
///   decoded value of `field`, a sibling declared earlier or a field of an
///   enclosing record.
/// - `#[bytestruct(size = N)]`: this field always spans `N` bytes.
///
/// `size_ref` and `size` apply to strings, byte and record sequences, and
/// nested records. Fixed-width scalars reject them.
/// - `#[bytestruct(skip)]`: neither written nor read; decodes as
///   `Default::default()`.
///
/// # Example
///
/// ```
/// use bytestruct::ByteStruct;
///
/// #[derive(ByteStruct)]
/// struct UserData {
///     age: u8,
///     #[bytestruct(payload_of = country)]
///     country_length: u8,
///     #[bytestruct(size_ref = country_length)]
///     country: String,
/// }
/// ```
///
/// A prefix separated from its payload does not compile:
///
/// ```compile_fail
/// use bytestruct::ByteStruct;
///
/// #[derive(ByteStruct)]
/// struct Gap {
///     #[bytestruct(payload_of = name)]
///     length: u8,
///     flag: u8,
///     #[bytestruct(size_ref = length)]
///     name: String,
/// }
/// ```
///
/// Nor does a payload declared before its prefix:
///
/// ```compile_fail
/// use bytestruct::ByteStruct;
///
/// #[derive(ByteStruct)]
/// struct Before {
///     #[bytestruct(size = 2)]
///     name: String,
///     flag: u8,
///     #[bytestruct(payload_of = name)]
///     length: u8,
/// }
/// ```
///
/// Nor an explicit size on a fixed-width scalar:
///
/// ```compile_fail
/// use bytestruct::ByteStruct;
///
/// #[derive(ByteStruct)]
/// struct Word {
///     #[bytestruct(size = 2)]
///     value: u32,
/// }
/// ```
pub use bytestruct_derive::ByteStruct;
