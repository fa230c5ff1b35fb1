use std::io::Read;

use crate::read::Reader;
use crate::schema::{FieldDescriptor, Kind};
use crate::traits::Field;
use crate::write::Writer;
use crate::{Error, ErrorKind};

fn required_size(field: &'static FieldDescriptor, size: Option<usize>) -> crate::Result<usize> {
    size.ok_or_else(|| Error::new(ErrorKind::MissingSizeAnnotation { field: field.name }))
}

impl Field for String {
    const KIND: Kind = Kind::String;

    fn write_value(
        &self,
        writer: &mut Writer,
        _field: &'static FieldDescriptor,
    ) -> crate::Result<()> {
        writer.put_slice(self.as_bytes());
        Ok(())
    }

    fn read_value<R: Read>(
        reader: &mut Reader<'_, R>,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> crate::Result<Self> {
        let bytes = reader.read_bytes(field, required_size(field, size)?)?;
        String::from_utf8(bytes)
            .map_err(|_| Error::new(ErrorKind::InvalidUtf8 { field: field.name }))
    }
}

impl Field for bytes::Bytes {
    const KIND: Kind = Kind::ByteSequence;

    fn write_value(
        &self,
        writer: &mut Writer,
        _field: &'static FieldDescriptor,
    ) -> crate::Result<()> {
        writer.put_slice(self);
        Ok(())
    }

    fn read_value<R: Read>(
        reader: &mut Reader<'_, R>,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> crate::Result<Self> {
        let bytes = reader.read_bytes(field, required_size(field, size)?)?;
        Ok(bytes::Bytes::from(bytes))
    }
}

impl<T: Field> Field for Vec<T> {
    const KIND: Kind = Kind::sequence_of(T::KIND);

    fn write_value(
        &self,
        writer: &mut Writer,
        field: &'static FieldDescriptor,
    ) -> crate::Result<()> {
        writer.write_sequence(field, self)
    }

    fn read_value<R: Read>(
        reader: &mut Reader<'_, R>,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> crate::Result<Self> {
        reader.read_sequence(field, size)
    }
}
