use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Codec;
use crate::error::CodecError;

/// Binary wire format built on bitcode.
///
/// bitcode is not self-describing, so the variant body is encoded on its own
/// and carried as opaque bytes inside a frame next to the kind. Reading the
/// kind never touches the body.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitcodeCodec;

#[derive(Serialize)]
struct FrameRef<'a, K> {
    kind: &'a K,
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct Frame<K> {
    kind: K,
    body: Vec<u8>,
}

impl Codec for BitcodeCodec {
    fn name(&self) -> &'static str {
        "bitcode"
    }

    fn encode<K, V>(&self, kind: &K, body: &V) -> Result<Vec<u8>, CodecError>
    where
        K: Serialize,
        V: Serialize,
    {
        let body = bitcode::serialize(body)?;
        Ok(bitcode::serialize(&FrameRef { kind, body })?)
    }

    fn decode_kind<K>(&self, bytes: &[u8]) -> Result<K, CodecError>
    where
        K: DeserializeOwned,
    {
        let frame: Frame<K> = bitcode::deserialize(bytes)?;
        Ok(frame.kind)
    }

    fn decode_body<K, V>(&self, bytes: &[u8]) -> Result<V, CodecError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let frame: Frame<K> = bitcode::deserialize(bytes)?;
        Ok(bitcode::deserialize(&frame.body)?)
    }
}
