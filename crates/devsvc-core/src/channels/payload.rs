use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the application consumes from or produces to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire format of message values on a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadKind {
    #[default]
    String,
    Bytes,
    Json,
    /// Avro with schemas held in a schema registry
    Avro,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Json => "json",
            Self::Avro => "avro",
        }
    }

    pub fn serializer(&self) -> &'static str {
        match self {
            Self::String => "org.apache.kafka.common.serialization.StringSerializer",
            Self::Bytes => "org.apache.kafka.common.serialization.ByteArraySerializer",
            Self::Json => "io.confluent.kafka.serializers.KafkaJsonSerializer",
            Self::Avro => "io.confluent.kafka.serializers.KafkaAvroSerializer",
        }
    }

    pub fn deserializer(&self) -> &'static str {
        match self {
            Self::String => "org.apache.kafka.common.serialization.StringDeserializer",
            Self::Bytes => "org.apache.kafka.common.serialization.ByteArrayDeserializer",
            Self::Json => "io.confluent.kafka.serializers.KafkaJsonDeserializer",
            Self::Avro => "io.confluent.kafka.serializers.KafkaAvroDeserializer",
        }
    }

    /// Serializer or deserializer, whichever `direction` needs.
    pub fn codec_for(&self, direction: Direction) -> &'static str {
        match direction {
            Direction::Incoming => self.deserializer(),
            Direction::Outgoing => self.serializer(),
        }
    }

    pub fn needs_schema_registry(&self) -> bool {
        matches!(self, Self::Avro)
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
