//! Typed in-process message dispatch.
//!
//! An upstream component hands encoded payloads to a [`Dispatcher`] together
//! with the consumer groups that should receive them. Downstream consumers
//! register one handler per message kind and receive decoded values. Neither
//! side holds a reference to the other.
//!
//! ```text
//! upstream ──bytes──▶ Dispatcher("emitter") ──decoded──▶ group "receiver"
//!                                                          │ relay
//!                                                          ▼
//!                     Dispatcher("receiver") ──decoded──▶ group "nested"
//! ```
//!
//! Bytes only exist between the upstream and the first dispatcher. Later
//! hops [`relay`](Dispatcher::relay) the decoded value without re-encoding.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use routed_rust::{message_schema, DispatchRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! pub struct Joined { pub player: String }
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! pub struct Left { pub player: String }
//!
//! message_schema! {
//!     pub enum Lobby: LobbyKind {
//!         Joined(Joined),
//!         Left(Left),
//!     }
//! }
//!
//! let registry = DispatchRegistry::<Lobby>::json();
//! let server = registry.dispatcher_for("server").unwrap();
//!
//! let names = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&names);
//! server
//!     .register("roster", move |joined: &Joined| {
//!         sink.lock().unwrap().push(joined.player.clone());
//!     })
//!     .unwrap();
//!
//! let bytes = server.encode_variant(&Joined { player: "kit".into() }).unwrap();
//! server.send_to(&bytes, ["roster"]).unwrap();
//!
//! // Nobody handles `Left` for "roster": dropped, not an error.
//! let bytes = server.encode_variant(&Left { player: "kit".into() }).unwrap();
//! assert!(server.send_to(&bytes, ["roster"]).unwrap().is_empty());
//!
//! assert_eq!(*names.lock().unwrap(), vec!["kit".to_string()]);
//! ```
//!
//! ## Features
//!
//! - `bitcode` (default): enables [`BitcodeCodec`], a binary wire format.

pub mod codec;
pub mod dispatch;
mod error;
mod ids;
pub mod message;

pub use codec::{Codec, JsonCodec};
pub use dispatch::{Consumer, Delivery, DispatchRegistry, Dispatcher};
pub use error::{CodecError, DispatchError};
pub use ids::{GroupId, Origin};
pub use message::{Decoder, KindTable, Message, Variant};

#[cfg(feature = "bitcode")]
pub use codec::BitcodeCodec;
