//! Message schema traits.
//!
//! A schema is one envelope type (usually an enum) implementing [`Message`],
//! plus one struct per concrete variant implementing [`Variant`]. The
//! [`message_schema!`](crate::message_schema) macro declares all of it,
//! together with the kind enum and the [`KindTable`], from a single list.

mod kind_table;
mod schema;

pub use kind_table::{Decoder, KindTable};

use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::CodecError;

/// The envelope of a message family.
///
/// `kind()` is decided by which variant the value holds, so a message's
/// kind is fixed when it is constructed.
pub trait Message: fmt::Debug + Send + Sync + Sized + 'static {
    /// Closed discriminant set for this family.
    type Kind: Copy
        + Eq
        + Hash
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    fn kind(&self) -> Self::Kind;

    /// The statically declared decoder list for every variant.
    fn kind_table<C: Codec>() -> KindTable<Self, C>;

    /// Encode this message with its kind, in the given wire format.
    fn encode_with<C: Codec>(&self, codec: &C) -> Result<Vec<u8>, CodecError>;
}

/// One concrete message variant of the family `M`.
pub trait Variant<M: Message>:
    fmt::Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: M::Kind;

    fn into_message(self) -> M;

    /// Borrow this variant out of an envelope holding it.
    fn from_message(message: &M) -> Option<&Self>;
}
