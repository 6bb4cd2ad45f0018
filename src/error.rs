use thiserror::Error;

/// Failure inside a wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// The variant body cannot sit beside the `kind` field.
    #[error("json body {0}")]
    Body(&'static str),
    #[cfg(feature = "bitcode")]
    #[error("bitcode: {0}")]
    Bitcode(#[from] bitcode::Error),
}

/// Errors returned by registry and dispatcher operations.
///
/// A target group with nothing registered, an unregistered kind, a duplicate
/// registration and removing an absent pair are all normal outcomes and never
/// show up here.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The handler could not be attributed to a consumer group.
    #[error("handler has no consumer group")]
    UnidentifiedGroup,
    /// The kind has no decoder in the kind table.
    #[error("kind {0} is not in the kind table")]
    UnknownKind(String),
    /// The payload's kind discriminant is missing or unreadable.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] CodecError),
    /// The kind was read but the full payload did not decode.
    #[error("failed to decode {kind} payload: {source}")]
    Decode {
        kind: String,
        #[source]
        source: CodecError,
    },
    /// An outgoing message could not be encoded.
    #[error("failed to encode message: {0}")]
    Encode(#[source] CodecError),
    #[error("dispatch lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
