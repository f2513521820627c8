//! Declarative Kafka channel wiring
//!
//! Channels are declared in configuration (`[channels.<name>]`) rather than
//! discovered from code. Each declaration names a direction and a payload
//! kind; the topic defaults to the channel name. From that table the
//! registry derives the connector properties a messaging runtime needs:
//! topic, serializer or deserializer, bootstrap servers and, for Avro, the
//! schema registry.

mod payload;
mod registry;

pub use payload::{Direction, PayloadKind};
pub use registry::{ChannelRegistry, ChannelSpec, MAX_TOPIC_LEN};
