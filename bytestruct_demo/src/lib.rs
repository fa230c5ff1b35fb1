//! Sample messages for bytestruct, shared by the `marshal` and `unmarshal`
//! programs.
//!
//! `marshal` prints the wire bytes of each sample. `unmarshal` reads wire
//! bytes from a file or stdin and prints the decoded message.

use std::fmt::Debug;
use std::str::FromStr;

use bytestruct::{ByteOrder, ByteStruct, from_slice, marshal};

#[derive(Debug, Clone, PartialEq, ByteStruct)]
pub struct Message {
    #[bytestruct(payload_of = payload)]
    pub length: u16,
    #[bytestruct(size_ref = length)]
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, ByteStruct)]
pub struct MessageWithStruct {
    #[bytestruct(payload_of = payload)]
    pub length: u16,
    #[bytestruct(size_ref = length)]
    pub payload: Message,
}

#[derive(Debug, Clone, PartialEq, ByteStruct)]
pub struct MessageWithArrayStruct {
    #[bytestruct(payload_of = payload)]
    pub length: u16,
    #[bytestruct(size_ref = length)]
    pub payload: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, ByteStruct)]
pub struct UserData {
    pub age: u8,
    #[bytestruct(payload_of = country)]
    pub country_length: u8,
    #[bytestruct(size_ref = country_length)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, ByteStruct)]
pub struct MixedStruct {
    pub message_type: u8,
    #[bytestruct(payload_of = user_name)]
    pub user_name_length: u8,
    #[bytestruct(size_ref = user_name_length)]
    pub user_name: String,
    pub data: UserData,
}

/// The sample message shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Message,
    MessageWithStruct,
    MessageWithArrayStruct,
    Mixed,
}

impl Sample {
    pub const ALL: [Sample; 4] = [
        Sample::Message,
        Sample::MessageWithStruct,
        Sample::MessageWithArrayStruct,
        Sample::Mixed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sample::Message => "message",
            Sample::MessageWithStruct => "struct",
            Sample::MessageWithArrayStruct => "array",
            Sample::Mixed => "mixed",
        }
    }

    /// Marshals the sample value of this shape. Length prefixes are left at
    /// zero and filled in by the encoder.
    pub fn encode(self, order: ByteOrder) -> bytestruct::Result<Vec<u8>> {
        let message = |payload: &str| Message {
            length: 0,
            payload: payload.to_string(),
        };

        match self {
            Sample::Message => marshal(order, &message("Hello World")),
            Sample::MessageWithStruct => marshal(
                order,
                &MessageWithStruct {
                    length: 0,
                    payload: message("Hello World"),
                },
            ),
            Sample::MessageWithArrayStruct => marshal(
                order,
                &MessageWithArrayStruct {
                    length: 0,
                    payload: vec![message("Hello"), message("World")],
                },
            ),
            Sample::Mixed => marshal(
                order,
                &MixedStruct {
                    message_type: 2,
                    user_name_length: 0,
                    user_name: "Foo".to_string(),
                    data: UserData {
                        age: 30,
                        country_length: 0,
                        country: "Sweden".to_string(),
                    },
                },
            ),
        }
    }

    /// Decodes `data` as this shape and formats the result.
    pub fn describe(self, data: &[u8], order: ByteOrder) -> bytestruct::Result<String> {
        fn pretty<T>(data: &[u8], order: ByteOrder) -> bytestruct::Result<String>
        where
            T: ByteStruct + Debug,
        {
            Ok(format!("{:#?}", from_slice::<T>(data, order)?))
        }

        match self {
            Sample::Message => pretty::<Message>(data, order),
            Sample::MessageWithStruct => pretty::<MessageWithStruct>(data, order),
            Sample::MessageWithArrayStruct => pretty::<MessageWithArrayStruct>(data, order),
            Sample::Mixed => pretty::<MixedStruct>(data, order),
        }
    }
}

impl FromStr for Sample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sample::ALL
            .into_iter()
            .find(|sample| sample.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Sample::ALL.iter().map(|s| s.name()).collect();
                format!("unknown sample `{s}`, expected one of: {}", names.join(", "))
            })
    }
}

/// Parses a byte order argument: `big` or `little`.
pub fn parse_order(s: &str) -> Result<ByteOrder, String> {
    match s {
        "big" | "be" => Ok(ByteOrder::BigEndian),
        "little" | "le" => Ok(ByteOrder::LittleEndian),
        _ => Err(format!("unknown byte order `{s}`, expected `big` or `little`")),
    }
}

/// Installs a stderr log subscriber filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use bytestruct::{ByteOrder, unmarshal};

    use crate::{Message, MessageWithArrayStruct, MessageWithStruct, MixedStruct, Sample};

    #[test]
    fn test_message() {
        assert_eq!(
            Sample::Message.encode(ByteOrder::BigEndian).unwrap(),
            [0, 11, 72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]
        );

        let data: &[u8] = &[0, 11, 72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
        let message: Message = unmarshal(data, ByteOrder::BigEndian).unwrap();
        assert_eq!(message.payload, "Hello World");
    }

    #[test]
    fn test_message_with_struct() {
        assert_eq!(
            Sample::MessageWithStruct.encode(ByteOrder::BigEndian).unwrap(),
            [0, 13, 0, 11, 72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]
        );

        let data: &[u8] = &[0, 13, 0, 11, 72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
        let message: MessageWithStruct = unmarshal(data, ByteOrder::BigEndian).unwrap();
        assert_eq!(message.payload.payload, "Hello World");
    }

    #[test]
    fn test_message_with_array_struct() {
        assert_eq!(
            Sample::MessageWithArrayStruct.encode(ByteOrder::BigEndian).unwrap(),
            [0, 14, 0, 5, 72, 101, 108, 108, 111, 0, 5, 87, 111, 114, 108, 100]
        );

        let data: &[u8] = &[0, 14, 0, 5, 72, 101, 108, 108, 111, 0, 5, 87, 111, 114, 108, 100];
        let message: MessageWithArrayStruct = unmarshal(data, ByteOrder::BigEndian).unwrap();
        assert_eq!(message.payload.len(), 2);
        assert_eq!(message.payload[0].payload, "Hello");
        assert_eq!(message.payload[1].payload, "World");
    }

    #[test]
    fn test_mixed() {
        assert_eq!(
            Sample::Mixed.encode(ByteOrder::BigEndian).unwrap(),
            [2, 3, 70, 111, 111, 30, 6, 83, 119, 101, 100, 101, 110]
        );

        let data: &[u8] = &[2, 3, 70, 111, 111, 30, 6, 83, 119, 101, 100, 101, 110];
        let mixed: MixedStruct = unmarshal(data, ByteOrder::BigEndian).unwrap();
        assert_eq!(mixed.user_name, "Foo");
        assert_eq!(mixed.data.age, 30);
        assert_eq!(mixed.data.country, "Sweden");
    }

    #[test]
    fn test_describe_every_sample() {
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            for sample in Sample::ALL {
                let data = sample.encode(order).unwrap();
                let text = sample.describe(&data, order).unwrap();
                assert!(!text.is_empty());
            }
        }

        let text = Sample::Message
            .describe(&[0, 2, b'h', b'i'], ByteOrder::BigEndian)
            .unwrap();
        assert!(text.contains("\"hi\""));
    }

    #[test]
    fn test_sample_names() {
        for sample in Sample::ALL {
            assert_eq!(sample.name().parse::<Sample>(), Ok(sample));
        }
        assert!("nope".parse::<Sample>().is_err());
        assert_eq!(crate::parse_order("le"), Ok(ByteOrder::LittleEndian));
        assert!(crate::parse_order("middle").is_err());
    }
}
