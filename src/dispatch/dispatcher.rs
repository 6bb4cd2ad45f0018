//! The `(group, kind) -> handler` table of one origin.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use super::consumer::Consumer;
use super::delivery::Delivery;
use crate::codec::{Codec, JsonCodec};
use crate::error::DispatchError;
use crate::ids::{GroupId, Origin};
use crate::message::{KindTable, Message, Variant};

/// A registered handler. Returns `false` when it could not run (its consumer
/// is gone, or the envelope held another variant).
type Handler<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

type Routes<M> = HashMap<GroupId, HashMap<<M as Message>::Kind, Handler<M>>>;

/// Routes payloads of one origin to the handlers of consumer groups.
///
/// There is one handler per `(group, kind)`: registering again replaces the
/// previous handler. Every handler receives decoded values; the byte path
/// decodes once through the shared [`KindTable`] and then takes the same
/// route as [`relay`](Self::relay), so both paths always behave alike.
///
/// Usually obtained from [`DispatchRegistry::dispatcher_for`](super::DispatchRegistry::dispatcher_for).
///
/// ## Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use routed_rust::{message_schema, DispatchRegistry};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// pub struct Chat { pub text: String }
///
/// message_schema! {
///     pub enum Wire: WireKind { Chat(Chat) }
/// }
///
/// let registry = DispatchRegistry::<Wire>::json();
/// let dispatcher = registry.dispatcher_for("server").unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// dispatcher
///     .register("chat-window", move |chat: &Chat| sink.lock().unwrap().push(chat.text.clone()))
///     .unwrap();
///
/// let delivery = dispatcher
///     .send_to(br#"{"kind":"Chat","text":"hello"}"#, ["chat-window"])
///     .unwrap();
/// assert_eq!(delivery.delivered, 1);
/// assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
/// ```
pub struct Dispatcher<M: Message, C: Codec = JsonCodec> {
    origin: Origin,
    codec: Arc<C>,
    kinds: Arc<KindTable<M, C>>,
    routes: RwLock<Routes<M>>,
}

impl<M: Message, C: Codec> Dispatcher<M, C> {
    /// Create an empty dispatcher sharing a codec and kind table.
    pub fn new(origin: impl Into<Origin>, codec: Arc<C>, kinds: Arc<KindTable<M, C>>) -> Self {
        Self {
            origin: origin.into(),
            codec,
            kinds,
            routes: RwLock::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a typed handler for `V` under `group`.
    ///
    /// Replaces any handler already registered for `(group, V::KIND)`.
    pub fn register<V, F>(&self, group: impl Into<GroupId>, handler: F) -> Result<(), DispatchError>
    where
        V: Variant<M>,
        F: Fn(&V) + Send + Sync + 'static,
    {
        self.insert(
            group.into(),
            V::KIND,
            Arc::new(move |message: &M| match V::from_message(message) {
                Some(value) => {
                    handler(value);
                    true
                }
                None => false,
            }),
        )
    }

    /// Register a handler that receives the whole envelope for `kind`.
    pub fn register_kind<F>(
        &self,
        group: impl Into<GroupId>,
        kind: M::Kind,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        self.insert(
            group.into(),
            kind,
            Arc::new(move |message: &M| {
                handler(message);
                true
            }),
        )
    }

    /// Register a consumer's method for `V` under the consumer's own group.
    ///
    /// The dispatcher holds the consumer weakly. Once the consumer is
    /// dropped the handler stops running, without an error.
    pub fn bind<V, T, F>(&self, consumer: &Arc<T>, method: F) -> Result<(), DispatchError>
    where
        V: Variant<M>,
        T: Consumer,
        F: Fn(&T, &V) + Send + Sync + 'static,
    {
        let group = consumer.group();
        let consumer = Arc::downgrade(consumer);
        self.insert(
            group,
            V::KIND,
            Arc::new(move |message: &M| {
                let (Some(consumer), Some(value)) = (consumer.upgrade(), V::from_message(message))
                else {
                    return false;
                };
                method(&*consumer, value);
                true
            }),
        )
    }

    fn insert(&self, group: GroupId, kind: M::Kind, handler: Handler<M>) -> Result<(), DispatchError> {
        if group.is_empty() {
            return Err(DispatchError::UnidentifiedGroup);
        }
        if !self.kinds.contains(kind) {
            return Err(DispatchError::UnknownKind(format!("{:?}", kind)));
        }

        // The replaced handler is dropped after the lock is released.
        let replaced = {
            let mut routes = self
                .routes
                .write()
                .map_err(|_| DispatchError::LockPoisoned("register"))?;
            routes.entry(group.clone()).or_default().insert(kind, handler)
        };

        debug!(
            origin = %self.origin,
            group = %group,
            kind = ?kind,
            replaced = replaced.is_some(),
            "handler registered"
        );
        Ok(())
    }

    /// Remove the handler for `(group, kind)`.
    ///
    /// Returns whether a handler was removed; an absent pair is not an error.
    pub fn unregister(&self, group: impl Into<GroupId>, kind: M::Kind) -> Result<bool, DispatchError> {
        let group = group.into();
        let removed = {
            let mut routes = self
                .routes
                .write()
                .map_err(|_| DispatchError::LockPoisoned("unregister"))?;
            let removed = routes.get_mut(&group).and_then(|kinds| kinds.remove(&kind));
            if routes.get(&group).is_some_and(HashMap::is_empty) {
                routes.remove(&group);
            }
            removed
        };

        debug!(
            origin = %self.origin,
            group = %group,
            kind = ?kind,
            removed = removed.is_some(),
            "handler unregistered"
        );
        Ok(removed.is_some())
    }

    /// Remove the handler for `(group, V::KIND)`.
    pub fn unregister_variant<V: Variant<M>>(
        &self,
        group: impl Into<GroupId>,
    ) -> Result<bool, DispatchError> {
        self.unregister(group, V::KIND)
    }

    /// Remove the handler for `V` registered under the consumer's group.
    pub fn unbind<V: Variant<M>, T: Consumer>(&self, consumer: &T) -> Result<bool, DispatchError> {
        self.unregister(consumer.group(), V::KIND)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver an encoded payload to each target group's handler for its kind.
    ///
    /// Only the kind is read up front. The full decode runs once, and only
    /// when at least one target has a handler; targets without one are
    /// skipped silently.
    pub fn send_to<I>(&self, bytes: &[u8], targets: I) -> Result<Delivery<M::Kind>, DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<GroupId>,
    {
        let kind: M::Kind = self.codec.decode_kind(bytes).map_err(|err| {
            warn!(origin = %self.origin, codec = self.codec.name(), error = %err, "unreadable message kind");
            DispatchError::MalformedPayload(err)
        })?;

        let handlers = self.snapshot(kind, targets, "send_to")?;
        if handlers.is_empty() {
            return Ok(Delivery::none(kind));
        }

        let message = match self.kinds.decode(&self.codec, kind, bytes) {
            Some(Ok(message)) => message,
            Some(Err(source)) => {
                warn!(origin = %self.origin, kind = ?kind, error = %source, "payload failed to decode");
                return Err(DispatchError::Decode {
                    kind: format!("{:?}", kind),
                    source,
                });
            }
            None => return Err(DispatchError::UnknownKind(format!("{:?}", kind))),
        };

        Ok(self.deliver(&message, kind, handlers))
    }

    /// Deliver an already decoded message to each target group's handler for
    /// its kind. Nothing is encoded or decoded.
    pub fn relay<I>(&self, message: &M, targets: I) -> Result<Delivery<M::Kind>, DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<GroupId>,
    {
        let kind = message.kind();
        let handlers = self.snapshot(kind, targets, "relay")?;
        Ok(self.deliver(message, kind, handlers))
    }

    /// Relay a variant value. The value is cloned into its envelope.
    pub fn relay_variant<V, I>(&self, value: &V, targets: I) -> Result<Delivery<M::Kind>, DispatchError>
    where
        V: Variant<M>,
        I: IntoIterator,
        I::Item: Into<GroupId>,
    {
        self.relay(&value.clone().into_message(), targets)
    }

    /// Handlers for `kind` among the distinct targets, in target order.
    fn snapshot<I>(
        &self,
        kind: M::Kind,
        targets: I,
        operation: &'static str,
    ) -> Result<Vec<(GroupId, Handler<M>)>, DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<GroupId>,
    {
        let mut groups: Vec<GroupId> = Vec::new();
        for target in targets {
            let group = target.into();
            if !groups.contains(&group) {
                groups.push(group);
            }
        }

        let routes = self
            .routes
            .read()
            .map_err(|_| DispatchError::LockPoisoned(operation))?;

        let mut matched = Vec::with_capacity(groups.len());
        for group in groups {
            match routes.get(&group).and_then(|kinds| kinds.get(&kind)) {
                Some(handler) => matched.push((group, Arc::clone(handler))),
                None => trace!(origin = %self.origin, group = %group, kind = ?kind, "no handler, dropped"),
            }
        }
        Ok(matched)
    }

    fn deliver(
        &self,
        message: &M,
        kind: M::Kind,
        handlers: Vec<(GroupId, Handler<M>)>,
    ) -> Delivery<M::Kind> {
        let mut delivery = Delivery::none(kind);
        delivery.matched = handlers.len();

        for (group, handler) in handlers {
            if handler(message) {
                delivery.delivered += 1;
                trace!(origin = %self.origin, group = %group, kind = ?kind, "delivered");
            } else {
                trace!(origin = %self.origin, group = %group, kind = ?kind, "consumer gone, dropped");
            }
        }
        trace!(
            origin = %self.origin,
            kind = ?kind,
            matched = delivery.matched,
            delivered = delivery.delivered,
            "dispatch finished"
        );
        delivery
    }

    // =========================================================================
    // Encoding helpers for upstream callers
    // =========================================================================

    /// Encode a message in this dispatcher's wire format.
    pub fn encode(&self, message: &M) -> Result<Vec<u8>, DispatchError> {
        message
            .encode_with(self.codec())
            .map_err(DispatchError::Encode)
    }

    /// Encode a variant value in this dispatcher's wire format.
    pub fn encode_variant<V: Variant<M>>(&self, value: &V) -> Result<Vec<u8>, DispatchError> {
        self.codec
            .encode(&V::KIND, value)
            .map_err(DispatchError::Encode)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn is_registered(&self, group: &str, kind: M::Kind) -> Result<bool, DispatchError> {
        let routes = self
            .routes
            .read()
            .map_err(|_| DispatchError::LockPoisoned("is_registered"))?;
        Ok(routes
            .get(group)
            .is_some_and(|kinds| kinds.contains_key(&kind)))
    }

    /// Kinds registered under `group`.
    pub fn kinds_for(&self, group: &str) -> Result<Vec<M::Kind>, DispatchError> {
        let routes = self
            .routes
            .read()
            .map_err(|_| DispatchError::LockPoisoned("kinds_for"))?;
        Ok(routes
            .get(group)
            .map(|kinds| kinds.keys().copied().collect())
            .unwrap_or_default())
    }

    /// Groups with at least one registration, sorted.
    pub fn groups(&self) -> Result<Vec<GroupId>, DispatchError> {
        let routes = self
            .routes
            .read()
            .map_err(|_| DispatchError::LockPoisoned("groups"))?;
        let mut groups: Vec<GroupId> = routes.keys().cloned().collect();
        groups.sort();
        Ok(groups)
    }

    /// Total number of registrations.
    pub fn len(&self) -> Result<usize, DispatchError> {
        let routes = self
            .routes
            .read()
            .map_err(|_| DispatchError::LockPoisoned("len"))?;
        Ok(routes.values().map(HashMap::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, DispatchError> {
        Ok(self.len()? == 0)
    }
}
