//! Routing of payloads to consumer groups.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 DispatchRegistry<M, C>                       │
//! │  Origin -> Arc<Dispatcher>   (lazy, lives with registry)     │
//! │  shared: Arc<C> codec, Arc<KindTable<M, C>>                  │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Dispatcher<M, C>                          │
//! │  (GroupId, Kind) -> handler      last write wins             │
//! │  send_to(bytes, groups)  peek kind, decode once, deliver     │
//! │  relay(&M, groups)       deliver, no decode                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers run in-line on the caller's thread. A dispatch copies the
//! matching handlers out of the table before calling any of them, so
//! handlers are free to register, unregister or relay reentrantly.

mod consumer;
mod delivery;
mod dispatcher;
mod registry;

pub use consumer::Consumer;
pub use delivery::Delivery;
pub use dispatcher::Dispatcher;
pub use registry::DispatchRegistry;
