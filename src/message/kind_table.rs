use std::collections::HashMap;
use std::fmt;

use super::{Message, Variant};
use crate::codec::Codec;
use crate::error::CodecError;

/// Decodes a full payload of one known kind into the envelope.
pub type Decoder<M, C> = fn(&C, &[u8]) -> Result<M, CodecError>;

/// The single `kind -> decoder` table of a message family.
///
/// Built once and shared by every dispatcher of a registry. Registration
/// checks it so a handler can never exist for a kind the byte path cannot
/// decode; `send_to` uses it to turn bytes into the envelope.
///
/// ```
/// use routed_rust::{message_schema, JsonCodec, KindTable, Message};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// pub struct Ping { seq: u32 }
///
/// message_schema! {
///     pub enum Wire: WireKind {
///         Ping(Ping),
///     }
/// }
///
/// let table: KindTable<Wire, JsonCodec> = Wire::kind_table();
/// assert!(table.contains(WireKind::Ping));
/// assert_eq!(table.len(), 1);
/// ```
pub struct KindTable<M: Message, C> {
    decoders: HashMap<M::Kind, Decoder<M, C>>,
}

impl<M: Message, C: Codec> KindTable<M, C> {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Add the decoder for `V`. Builder form of [`insert`](Self::insert).
    pub fn with<V: Variant<M>>(mut self) -> Self {
        self.insert::<V>();
        self
    }

    /// Add the decoder for `V`, returning the decoder it replaced.
    pub fn insert<V: Variant<M>>(&mut self) -> Option<Decoder<M, C>> {
        self.decoders.insert(V::KIND, decode_variant::<M, C, V>)
    }

    pub fn contains(&self, kind: M::Kind) -> bool {
        self.decoders.contains_key(&kind)
    }

    /// Fully decode `bytes` as `kind`. `None` when the kind has no decoder.
    pub fn decode(
        &self,
        codec: &C,
        kind: M::Kind,
        bytes: &[u8],
    ) -> Option<Result<M, CodecError>> {
        self.decoders.get(&kind).map(|decoder| decoder(codec, bytes))
    }

    pub fn kinds(&self) -> impl Iterator<Item = M::Kind> + '_ {
        self.decoders.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl<M: Message, C: Codec> Default for KindTable<M, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message, C> fmt::Debug for KindTable<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

fn decode_variant<M, C, V>(codec: &C, bytes: &[u8]) -> Result<M, CodecError>
where
    M: Message,
    C: Codec,
    V: Variant<M>,
{
    codec.decode_body::<M::Kind, V>(bytes).map(V::into_message)
}
