use crate::config::{ByteOrder, Config};
use crate::schema::{Annotation, FieldDescriptor, Kind};
use crate::traits::{ByteStruct, Field};
use crate::{Error, ErrorKind, Result};

/// Output buffer for one marshal call.
pub struct Writer {
    buffer: Vec<u8>,
    config: Config,
}

impl Writer {
    pub(crate) fn new(config: Config) -> Self {
        Writer {
            buffer: Vec::new(),
            config,
        }
    }

    /// Options this writer encodes with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Byte order of every multi-byte scalar.
    pub fn order(&self) -> ByteOrder {
        self.config.order()
    }

    /// Appends raw bytes to the output.
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a field that is neither a length prefix nor the payload of one.
    #[doc(hidden)]
    pub fn write_field<T: Field>(
        &mut self,
        field: &'static FieldDescriptor,
        value: &T,
    ) -> Result<()> {
        if T::KIND.is_variable_length()
            && matches!(field.annotation, Annotation::None | Annotation::PayloadOf(_))
        {
            return Err(Error::new(ErrorKind::MissingSizeAnnotation { field: field.name }));
        }
        self.write_sized(field, value)
    }

    /// Writes `[length][payload]`, where payload is the encoding of `value`
    /// and length is its byte count cast into the prefix type `P`.
    #[doc(hidden)]
    pub fn write_length_prefixed<P: Field, T: Field>(
        &mut self,
        prefix: &'static FieldDescriptor,
        target: &'static FieldDescriptor,
        value: &T,
    ) -> Result<()> {
        let mut payload = Writer::new(self.config);
        payload.write_sized(target, value)?;

        let length = payload.len();
        let length_value = P::from_length(length, self.config.length_cast()).ok_or_else(|| {
            Error::new(ErrorKind::UnsupportedCast {
                field: prefix.name,
                kind: P::KIND,
                length,
            })
        })?;

        length_value.write_value(self, prefix)?;
        self.buffer.append(&mut payload.buffer);
        Ok(())
    }

    /// Writes every element in order, with nothing between them.
    pub fn write_sequence<T: Field>(
        &mut self,
        field: &'static FieldDescriptor,
        elements: &[T],
    ) -> Result<()> {
        let kind = Kind::sequence_of(T::KIND);
        if kind == Kind::Sequence {
            return Err(Error::new(ErrorKind::UnsupportedType {
                field: field.name,
                kind,
            }));
        }

        if let Some(width) = T::KIND.fixed_width() {
            self.buffer.reserve(width * elements.len());
        }
        for element in elements {
            element.write_value(self, field)?;
        }
        Ok(())
    }

    fn write_sized<T: Field>(&mut self, field: &'static FieldDescriptor, value: &T) -> Result<()> {
        let start = self.buffer.len();
        value.write_value(self, field)?;

        if let Annotation::FixedSize(expected) = field.annotation {
            let actual = self.buffer.len() - start;
            if actual != expected {
                return Err(Error::new(ErrorKind::SizeMismatch {
                    field: field.name,
                    expected,
                    actual,
                }));
            }
        }
        Ok(())
    }
}

/// Encodes a record using `order` for every scalar.
pub fn marshal<T: ByteStruct>(order: ByteOrder, value: &T) -> Result<Vec<u8>> {
    marshal_with(&Config::new(order), value)
}

/// Encodes a record with explicit options.
pub fn marshal_with<T: ByteStruct>(config: &Config, value: &T) -> Result<Vec<u8>> {
    let mut writer = Writer::new(*config);
    value.write_record(&mut writer)?;
    tracing::trace!(
        fields = T::FIELDS.len(),
        bytes = writer.len(),
        "marshalled record"
    );
    Ok(writer.into_inner())
}
