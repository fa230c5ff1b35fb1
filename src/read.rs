use std::io::Read;

use crate::config::{ByteOrder, Config};
use crate::context::Context;
use crate::schema::{Annotation, FieldDescriptor, Kind};
use crate::traits::{ByteStruct, Field};
use crate::{Error, ErrorKind, Result};

/// Decoding state for one unmarshal call: the byte source, the options, and
/// the scalar values decoded so far.
pub struct Reader<'c, R> {
    source: R,
    config: Config,
    context: &'c mut Context,
}

/// Runs `f` against a fresh reader over `source`. The decode context lives
/// exactly as long as the call.
pub(crate) fn with_reader<R: Read, T>(
    source: R,
    config: Config,
    f: impl FnOnce(&mut Reader<'_, R>) -> Result<T>,
) -> Result<T> {
    let mut context = Context::default();
    let mut reader = Reader {
        source,
        config,
        context: &mut context,
    };
    f(&mut reader)
}

impl<R: Read> Reader<'_, R> {
    /// Options this reader decodes with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Byte order of every multi-byte scalar.
    pub fn order(&self) -> ByteOrder {
        self.config.order()
    }

    #[doc(hidden)]
    pub fn enter_record(&mut self, fields: &'static [FieldDescriptor]) {
        self.context.enter(fields);
        tracing::trace!(
            depth = self.context.depth(),
            fields = fields.len(),
            "reading record"
        );
    }

    #[doc(hidden)]
    pub fn exit_record(&mut self) {
        self.context.exit();
    }

    /// Reads the field at `index` of the record currently being walked,
    /// resolving its size annotation first and recording its scalar value
    /// for the fields that follow.
    #[doc(hidden)]
    pub fn read_field<T: Field>(&mut self, index: usize) -> Result<T> {
        let field = self.context.field(index)?;
        let size = match field.annotation {
            Annotation::SizeRef(reference) => {
                Some(self.context.resolve_length(field, reference)?)
            }
            Annotation::FixedSize(size) => Some(size),
            Annotation::None | Annotation::PayloadOf(_) => None,
        };

        match (size, T::KIND.fixed_width()) {
            (None, _) if T::KIND.is_variable_length() => {
                return Err(Error::new(ErrorKind::MissingSizeAnnotation { field: field.name }));
            }
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(Error::new(ErrorKind::SizeMismatch {
                    field: field.name,
                    expected,
                    actual,
                }));
            }
            _ => {}
        }

        let value = T::read_value(self, field, size)?;
        if let Some(scalar) = value.scalar() {
            self.context.store(index, scalar)?;
        }
        Ok(value)
    }

    /// Reads exactly `N` bytes.
    pub fn read_array<const N: usize>(
        &mut self,
        field: &'static FieldDescriptor,
    ) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.source
            .read_exact(&mut bytes)
            .map_err(|err| Error::read_failure(field.name, N, err))?;
        Ok(bytes)
    }

    /// Reads exactly `size` bytes.
    pub fn read_bytes(&mut self, field: &'static FieldDescriptor, size: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let read = self
            .source
            .by_ref()
            .take(size as u64)
            .read_to_end(&mut buffer)
            .map_err(|err| Error::read_failure(field.name, size, err))?;

        if read < size {
            return Err(Error::new(ErrorKind::TruncatedInput {
                field: field.name,
                needed: size,
            }));
        }

        Ok(buffer)
    }

    /// Reads a nested record, either inline or from a region of exactly
    /// `size` bytes.
    pub fn read_nested<T: ByteStruct>(
        &mut self,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> Result<T> {
        let Some(size) = size else {
            return T::read_record(self);
        };

        let region = self.read_bytes(field, size)?;
        let mut sub = self.sub_reader(&region);
        let value = T::read_record(&mut sub)?;

        match sub.remaining() {
            0 => Ok(value),
            bytes_remaining => Err(Error::new(ErrorKind::ExtraData {
                field: field.name,
                bytes_remaining,
            })),
        }
    }

    /// Reads elements from a region of exactly `size` bytes until it is
    /// exhausted.
    pub fn read_sequence<T: Field>(
        &mut self,
        field: &'static FieldDescriptor,
        size: Option<usize>,
    ) -> Result<Vec<T>> {
        let kind = Kind::sequence_of(T::KIND);
        if kind == Kind::Sequence {
            return Err(Error::new(ErrorKind::UnsupportedType {
                field: field.name,
                kind,
            }));
        }
        let size = size
            .ok_or_else(|| Error::new(ErrorKind::MissingSizeAnnotation { field: field.name }))?;

        let region = self.read_bytes(field, size)?;
        let mut sub = self.sub_reader(&region);

        let mut elements = Vec::new();
        if let Some(width) = T::KIND.fixed_width() {
            elements.reserve(size / width);
        }

        while sub.remaining() > 0 {
            let bytes_remaining = sub.remaining();
            let malformed = || {
                Error::new(ErrorKind::MalformedSequence {
                    field: field.name,
                    bytes_remaining,
                })
            };

            let element = T::read_value(&mut sub, field, None).map_err(|err| {
                if matches!(err.kind(), ErrorKind::TruncatedInput { .. }) {
                    malformed()
                } else {
                    err
                }
            })?;

            if sub.remaining() == bytes_remaining {
                return Err(malformed());
            }
            elements.push(element);
        }

        Ok(elements)
    }

    fn sub_reader<'s>(&'s mut self, region: &'s [u8]) -> Reader<'s, &'s [u8]> {
        Reader {
            source: region,
            config: self.config,
            context: &mut *self.context,
        }
    }
}

impl Reader<'_, &[u8]> {
    /// Bytes left in an in-memory source.
    pub fn remaining(&self) -> usize {
        self.source.len()
    }
}

/// Decodes a record from `reader` using `order` for every scalar.
pub fn unmarshal<T: ByteStruct, R: Read>(reader: R, order: ByteOrder) -> Result<T> {
    unmarshal_with(reader, &Config::new(order))
}

/// Decodes a record from `reader` with explicit options.
pub fn unmarshal_with<T: ByteStruct, R: Read>(reader: R, config: &Config) -> Result<T> {
    with_reader(reader, *config, |reader| T::read_record(reader))
}

/// Decodes a record after handing the raw reader to `verify` once.
///
/// The verdict of `verify` is logged and does not change how decoding
/// proceeds.
pub fn unmarshal_verified<T, R, F>(mut reader: R, config: &Config, verify: F) -> Result<T>
where
    T: ByteStruct,
    R: Read,
    F: FnOnce(&mut R) -> bool,
{
    let verified = verify(&mut reader);
    tracing::debug!(verified, "pre-read verification finished");
    unmarshal_with(reader, config)
}

/// Decodes a record that must span all of `data`. Trailing bytes are
/// reported as `ExtraData` naming the record type.
pub fn from_slice<T: ByteStruct>(data: &[u8], order: ByteOrder) -> Result<T> {
    with_reader(data, Config::new(order), |reader| {
        let value = T::read_record(reader)?;
        match reader.remaining() {
            0 => Ok(value),
            bytes_remaining => Err(Error::new(ErrorKind::ExtraData {
                field: std::any::type_name::<T>(),
                bytes_remaining,
            })),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::with_reader;
    use crate::config::{ByteOrder, Config};
    use crate::schema::{Annotation, FieldDescriptor, Kind};
    use crate::{Error, ErrorKind};

    static WORDS: [FieldDescriptor; 2] = [
        FieldDescriptor::new("short", Kind::UInt32, Annotation::FixedSize(2)),
        FieldDescriptor::new("exact", Kind::UInt32, Annotation::FixedSize(4)),
    ];

    fn read_word(data: &[u8], index: usize) -> crate::Result<u32> {
        with_reader(data, Config::new(ByteOrder::BigEndian), |reader| {
            reader.enter_record(&WORDS);
            let value = reader.read_field::<u32>(index);
            reader.exit_record();
            value
        })
    }

    #[test]
    fn test_fixed_size_on_scalar() {
        assert_eq!(
            read_word(&[0, 0, 0, 7], 0),
            Err(Error::new(ErrorKind::SizeMismatch {
                field: "short",
                expected: 2,
                actual: 4
            }))
        );
        assert_eq!(read_word(&[0, 0, 0, 7], 1), Ok(7));
    }

    #[test]
    fn test_read_outside_record() {
        let result = with_reader(&[0u8; 4][..], Config::new(ByteOrder::BigEndian), |reader| {
            reader.read_field::<u32>(0)
        });
        assert_eq!(result, Err(Error::new(ErrorKind::UnknownField { index: 0 })));
        assert_eq!(
            read_word(&[0; 4], 9),
            Err(Error::new(ErrorKind::UnknownField { index: 9 }))
        );
    }
}
