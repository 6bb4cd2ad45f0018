//! Wire formats for dispatched payloads.
//!
//! Every payload carries its message kind somewhere a codec can read without
//! knowing the rest of the schema. `decode_kind` is that shallow read;
//! `decode_body` is the full decode once the concrete variant is known.
//!
//! ```text
//! JsonCodec     {"kind":"Two","param2":"fufufu"}
//! BitcodeCodec  bitcode(Frame { kind, body: bitcode(variant) })
//! ```

#[cfg(feature = "bitcode")]
mod binary;
mod json;

#[cfg(feature = "bitcode")]
pub use binary::BitcodeCodec;
pub use json::JsonCodec;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// A wire format that supports shallow kind decoding.
///
/// Each `Dispatcher` holds one codec; both the upstream encoder and the
/// dispatcher must agree on it.
pub trait Codec: Send + Sync + 'static {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Encode a variant body together with its kind.
    fn encode<K, V>(&self, kind: &K, body: &V) -> Result<Vec<u8>, CodecError>
    where
        K: Serialize,
        V: Serialize;

    /// Read only the kind discriminant from a payload.
    fn decode_kind<K>(&self, bytes: &[u8]) -> Result<K, CodecError>
    where
        K: DeserializeOwned;

    /// Decode the full variant body from a payload.
    ///
    /// `K` is the kind type of the schema, needed by formats that are not
    /// self-describing to step over the discriminant.
    fn decode_body<K, V>(&self, bytes: &[u8]) -> Result<V, CodecError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned;
}
