/// Declare a message family: envelope enum, kind enum, variant impls and the
/// kind table, from one explicit list.
///
/// Each entry is `KindName(VariantType)`. The macro generates:
/// - `enum $kind { KindName, .. }` with serde support (the wire discriminant)
/// - `enum $name { KindName(VariantType), .. }`
/// - `impl Message for $name` and `impl Variant<$name> for VariantType`
/// - `From<VariantType> for $name`
///
/// Variant types must derive `Clone`, `Debug`, `Serialize` and `Deserialize`;
/// the calling crate needs `serde` as a dependency.
///
/// # Example
/// ```
/// use routed_rust::{message_schema, Message, Variant};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// pub struct Opened { pub door: u8 }
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// pub struct Closed { pub door: u8 }
///
/// message_schema! {
///     /// Door sensor messages.
///     pub enum DoorEvent: DoorKind {
///         Opened(Opened),
///         Closed(Closed),
///     }
/// }
///
/// let event = DoorEvent::from(Closed { door: 2 });
/// assert_eq!(event.kind(), DoorKind::Closed);
/// assert_eq!(<Opened as Variant<DoorEvent>>::KIND, DoorKind::Opened);
/// ```
#[macro_export]
macro_rules! message_schema {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis enum $kind {
            $( $variant ),+
        }

        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty) ),+
        }

        impl $crate::Message for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $( $name::$variant(_) => $kind::$variant ),+
                }
            }

            fn kind_table<C: $crate::Codec>() -> $crate::KindTable<Self, C> {
                $crate::KindTable::new()
                    $( .with::<$ty>() )+
            }

            fn encode_with<C: $crate::Codec>(
                &self,
                codec: &C,
            ) -> ::std::result::Result<::std::vec::Vec<u8>, $crate::CodecError> {
                match self {
                    $( $name::$variant(inner) => codec.encode(&$kind::$variant, inner) ),+
                }
            }
        }

        $(
            impl $crate::Variant<$name> for $ty {
                const KIND: $kind = $kind::$variant;

                fn into_message(self) -> $name {
                    $name::$variant(self)
                }

                fn from_message(message: &$name) -> ::std::option::Option<&Self> {
                    match message {
                        $name::$variant(inner) => ::std::option::Option::Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => ::std::option::Option::None,
                    }
                }
            }

            impl ::std::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    $name::$variant(value)
                }
            }
        )+
    };
}
