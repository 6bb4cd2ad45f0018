use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Codec;
use crate::error::CodecError;

/// JSON wire format: a flat object with a `kind` field beside the variant's
/// own fields.
///
/// Variant bodies must serialize as JSON objects (named-field structs) and
/// must not declare a field called `kind`. [`encode`](Codec::encode) rejects
/// any other body with [`CodecError::Body`], so every payload it writes can
/// be decoded again.
///
/// ```
/// use routed_rust::{Codec, JsonCodec};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Greeting { text: String }
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&"Greeting", &Greeting { text: "hi".into() }).unwrap();
/// assert_eq!(bytes, br#"{"kind":"Greeting","text":"hi"}"#);
///
/// let kind: String = codec.decode_kind(&bytes).unwrap();
/// assert_eq!(kind, "Greeting");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

#[derive(Serialize)]
struct Tagged<'a, K, V> {
    kind: &'a K,
    #[serde(flatten)]
    body: &'a V,
}

/// Only the discriminant; serde_json skips every other field.
#[derive(Deserialize)]
struct KindProbe<K> {
    kind: K,
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<K, V>(&self, kind: &K, body: &V) -> Result<Vec<u8>, CodecError>
    where
        K: Serialize,
        V: Serialize,
    {
        match serde_json::to_value(body)? {
            Value::Object(fields) if fields.contains_key("kind") => {
                Err(CodecError::Body("must not carry a `kind` field"))
            }
            Value::Object(_) => Ok(serde_json::to_vec(&Tagged { kind, body })?),
            _ => Err(CodecError::Body("must serialize as an object")),
        }
    }

    fn decode_kind<K>(&self, bytes: &[u8]) -> Result<K, CodecError>
    where
        K: DeserializeOwned,
    {
        let probe: KindProbe<K> = serde_json::from_slice(bytes)?;
        Ok(probe.kind)
    }

    fn decode_body<K, V>(&self, bytes: &[u8]) -> Result<V, CodecError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}
