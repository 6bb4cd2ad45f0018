use crate::ids::GroupId;

/// A downstream instance that receives messages under its own group.
///
/// Handlers bound with [`Dispatcher::bind`](super::Dispatcher::bind) keep
/// only a weak reference to the consumer. Dropping the last `Arc` to a
/// consumer silently retires its handlers.
///
/// ```
/// use routed_rust::{Consumer, GroupId};
///
/// struct Scoreboard;
///
/// impl Consumer for Scoreboard {
///     fn group(&self) -> GroupId {
///         GroupId::from_static("scoreboard")
///     }
/// }
/// ```
pub trait Consumer: Send + Sync + 'static {
    fn group(&self) -> GroupId;
}
