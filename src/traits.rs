use std::io::Read;

use crate::config::LengthCast;
use crate::context::Scalar;
use crate::read::Reader;
use crate::schema::{FieldDescriptor, Kind};
use crate::write::Writer;

/// A record type: an ordered list of fields with a static descriptor table.
///
/// Implement this with `#[derive(ByteStruct)]`.
pub trait ByteStruct: Sized {
    /// Descriptors of the encoded fields, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Writes every field in declaration order.
    fn write_record(&self, writer: &mut Writer) -> crate::Result<()>;

    /// Reads every field in declaration order.
    ///
    /// Implementations must bracket the field reads with
    /// [`Reader::enter_record`] and [`Reader::exit_record`].
    fn read_record<R: Read>(reader: &mut Reader<'_, R>) -> crate::Result<Self>;
}

/// Codec for one field type.
pub trait Field: Sized {
    /// The wire kind of this type.
    const KIND: Kind;

    /// Writes the value without any length prefix.
    fn write_value(
        &self,
        writer: &mut Writer,
        field: &'static FieldDescriptor,
    ) -> crate::Result<()>;

    /// Reads a value. `size` is the resolved byte count for variable-length
    /// kinds and for sized records, and `None` otherwise.
    fn read_value<R: Read>(
        reader: &mut Reader<'_, R>,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> crate::Result<Self>;

    /// The value as seen by later size references, if it can be one.
    fn scalar(&self) -> Option<Scalar> {
        None
    }

    /// Builds a length-prefix value from a payload length. Returns `None`
    /// when this type cannot hold a length.
    fn from_length(length: usize, cast: LengthCast) -> Option<Self> {
        let _ = (length, cast);
        None
    }
}
