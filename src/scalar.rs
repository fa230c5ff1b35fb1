use std::io::Read;

use crate::config::{ByteOrder, LengthCast};
use crate::context::Scalar;
use crate::read::Reader;
use crate::schema::{FieldDescriptor, Kind};
use crate::traits::Field;
use crate::write::Writer;

macro_rules! impl_field_number {
    ($ty:ty, $kind:expr, $scalar:ident, $wide:ty) => {
        impl Field for $ty {
            const KIND: Kind = $kind;

            fn write_value(
                &self,
                writer: &mut Writer,
                _field: &'static FieldDescriptor,
            ) -> crate::Result<()> {
                match writer.order() {
                    ByteOrder::BigEndian => writer.put_slice(&self.to_be_bytes()),
                    ByteOrder::LittleEndian => writer.put_slice(&self.to_le_bytes()),
                }
                Ok(())
            }

            fn read_value<R: Read>(
                reader: &mut Reader<'_, R>,
                field: &'static FieldDescriptor,
                _size: Option<usize>,
            ) -> crate::Result<Self> {
                let bytes = reader.read_array(field)?;
                Ok(match reader.order() {
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(bytes),
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(bytes),
                })
            }

            fn scalar(&self) -> Option<Scalar> {
                Some(Scalar::$scalar(*self as $wide))
            }

            fn from_length(length: usize, cast: LengthCast) -> Option<Self> {
                match cast {
                    LengthCast::Checked => <$ty>::try_from(length).ok(),
                    LengthCast::Truncate => {
                        let value = length as $ty;
                        if value as usize != length {
                            tracing::debug!(length, kind = %Self::KIND, "length prefix truncated");
                        }
                        Some(value)
                    }
                }
            }
        }
    };
}

impl_field_number!(u8, Kind::UInt8, UInt, u64);
impl_field_number!(u16, Kind::UInt16, UInt, u64);
impl_field_number!(u32, Kind::UInt32, UInt, u64);
impl_field_number!(u64, Kind::UInt64, UInt, u64);
impl_field_number!(i8, Kind::Int8, Int, i64);
impl_field_number!(i16, Kind::Int16, Int, i64);
impl_field_number!(i32, Kind::Int32, Int, i64);
impl_field_number!(i64, Kind::Int64, Int, i64);

macro_rules! impl_field_float {
    ($ty:ty, $kind:expr) => {
        impl Field for $ty {
            const KIND: Kind = $kind;

            fn write_value(
                &self,
                writer: &mut Writer,
                _field: &'static FieldDescriptor,
            ) -> crate::Result<()> {
                match writer.order() {
                    ByteOrder::BigEndian => writer.put_slice(&self.to_be_bytes()),
                    ByteOrder::LittleEndian => writer.put_slice(&self.to_le_bytes()),
                }
                Ok(())
            }

            fn read_value<R: Read>(
                reader: &mut Reader<'_, R>,
                field: &'static FieldDescriptor,
                _size: Option<usize>,
            ) -> crate::Result<Self> {
                let bytes = reader.read_array(field)?;
                Ok(match reader.order() {
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(bytes),
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(bytes),
                })
            }

            fn scalar(&self) -> Option<Scalar> {
                Some(Scalar::Float(f64::from(*self)))
            }

            fn from_length(length: usize, cast: LengthCast) -> Option<Self> {
                let value = length as $ty;
                let exact = value as u128 == length as u128;
                match cast {
                    LengthCast::Checked => exact.then_some(value),
                    LengthCast::Truncate => {
                        if !exact {
                            tracing::debug!(length, kind = %Self::KIND, "length prefix rounded");
                        }
                        Some(value)
                    }
                }
            }
        }
    };
}

impl_field_float!(f32, Kind::Float32);
impl_field_float!(f64, Kind::Float64);

impl Field for bool {
    const KIND: Kind = Kind::Bool;

    fn write_value(
        &self,
        writer: &mut Writer,
        _field: &'static FieldDescriptor,
    ) -> crate::Result<()> {
        writer.put_slice(&[u8::from(*self)]);
        Ok(())
    }

    fn read_value<R: Read>(
        reader: &mut Reader<'_, R>,
        field: &'static FieldDescriptor,
        _size: Option<usize>,
    ) -> crate::Result<Self> {
        let [byte] = reader.read_array::<1>(field)?;
        Ok(byte != 0)
    }

    fn scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ByteOrder, Config, LengthCast};
    use crate::read::with_reader;
    use crate::schema::{Annotation, FieldDescriptor, Kind};
    use crate::traits::Field;
    use crate::write::Writer;
    use crate::{Error, ErrorKind};

    static FIELD: FieldDescriptor = FieldDescriptor::new("value", Kind::UInt32, Annotation::None);

    fn encode<T: Field>(order: ByteOrder, value: T) -> Vec<u8> {
        let mut writer = Writer::new(Config::new(order));
        value.write_value(&mut writer, &FIELD).unwrap();
        writer.into_inner()
    }

    fn decode<T: Field>(order: ByteOrder, data: &[u8]) -> crate::Result<T> {
        with_reader(data, Config::new(order), |reader| T::read_value(reader, &FIELD, None))
    }

    #[test]
    fn test_integers_both_orders() {
        assert_eq!(encode(ByteOrder::BigEndian, 0x0102u16), [0x01, 0x02]);
        assert_eq!(encode(ByteOrder::LittleEndian, 0x0102u16), [0x02, 0x01]);
        assert_eq!(encode(ByteOrder::BigEndian, -2i32), [0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(
            encode(ByteOrder::LittleEndian, 0x0102030405060708u64),
            [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(encode(ByteOrder::BigEndian, -1i8), [0xFF]);

        assert_eq!(decode::<u16>(ByteOrder::BigEndian, &[0x01, 0x02]), Ok(0x0102));
        assert_eq!(decode::<u16>(ByteOrder::LittleEndian, &[0x01, 0x02]), Ok(0x0201));
        assert_eq!(
            decode::<i64>(
                ByteOrder::LittleEndian,
                &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
            ),
            Ok(-2)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            encode(ByteOrder::LittleEndian, std::f32::consts::PI),
            [0xDB, 0x0F, 0x49, 0x40]
        );
        assert_eq!(
            encode(ByteOrder::BigEndian, std::f32::consts::PI),
            [0x40, 0x49, 0x0F, 0xDB]
        );
        assert_eq!(
            decode::<f64>(ByteOrder::BigEndian, &[0x3F, 0xF8, 0, 0, 0, 0, 0, 0]),
            Ok(1.5)
        );
    }

    #[test]
    fn test_bool() {
        assert_eq!(encode(ByteOrder::BigEndian, true), [0x01]);
        assert_eq!(encode(ByteOrder::BigEndian, false), [0x00]);
        assert_eq!(decode::<bool>(ByteOrder::BigEndian, &[0x00]), Ok(false));
        assert_eq!(decode::<bool>(ByteOrder::BigEndian, &[0x2A]), Ok(true));
    }

    #[test]
    fn test_short_read() {
        assert_eq!(
            decode::<u32>(ByteOrder::BigEndian, &[0x01, 0x02]),
            Err(Error::new(ErrorKind::TruncatedInput {
                field: "value",
                needed: 4
            }))
        );
    }

    #[test]
    fn test_from_length() {
        assert_eq!(u16::from_length(11, LengthCast::Truncate), Some(11));
        assert_eq!(u8::from_length(300, LengthCast::Truncate), Some(44));
        assert_eq!(i8::from_length(200, LengthCast::Truncate), Some(-56));
        assert_eq!(u8::from_length(300, LengthCast::Checked), None);
        assert_eq!(u8::from_length(255, LengthCast::Checked), Some(255));
        assert_eq!(bool::from_length(1, LengthCast::Truncate), None);
        assert_eq!(bool::from_length(1, LengthCast::Checked), None);
    }

    #[test]
    fn test_float_from_length() {
        assert_eq!(f32::from_length(4, LengthCast::Truncate), Some(4.0));
        assert_eq!(f64::from_length(300, LengthCast::Checked), Some(300.0));
        assert_eq!(f32::from_length(16_777_216, LengthCast::Checked), Some(16_777_216.0));
        assert_eq!(f32::from_length(16_777_217, LengthCast::Checked), None);
        assert_eq!(
            f32::from_length(16_777_217, LengthCast::Truncate),
            Some(16_777_216.0)
        );
    }
}
