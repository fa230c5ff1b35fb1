/// Byte order used for every multi-byte scalar of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

/// How a computed payload length is stored in a length-prefix field that is
/// too narrow to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthCast {
    /// Keep the low-order bits of the length. Choosing a wide enough prefix
    /// type is up to the caller.
    #[default]
    Truncate,
    /// Fail with `UnsupportedCast` instead of truncating, or, for float
    /// prefixes, instead of rounding.
    Checked,
}

/// Options for one marshal or unmarshal call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    order: ByteOrder,
    length_cast: LengthCast,
}

impl Config {
    /// Options for `order` with truncating length casts.
    pub const fn new(order: ByteOrder) -> Self {
        Config {
            order,
            length_cast: LengthCast::Truncate,
        }
    }

    /// Sets how computed lengths are cast into prefix fields.
    pub const fn with_length_cast(mut self, length_cast: LengthCast) -> Self {
        self.length_cast = length_cast;
        self
    }

    /// Byte order of every multi-byte scalar.
    pub const fn order(&self) -> ByteOrder {
        self.order
    }

    /// How computed lengths are cast into prefix fields.
    pub const fn length_cast(&self) -> LengthCast {
        self.length_cast
    }
}

impl From<ByteOrder> for Config {
    fn from(order: ByteOrder) -> Self {
        Config::new(order)
    }
}
