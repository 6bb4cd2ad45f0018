use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::dispatcher::Dispatcher;
use crate::codec::{Codec, JsonCodec};
use crate::error::DispatchError;
use crate::ids::Origin;
use crate::message::{KindTable, Message};

/// The dispatch context: one [`Dispatcher`] per origin.
///
/// Dispatchers are created on first lookup and live as long as the registry.
/// All of them share the registry's codec and kind table. Pass the registry
/// (usually in an `Arc`) to every collaborator that needs to dispatch; each
/// test can build its own.
///
/// ```
/// use std::sync::Arc;
/// use routed_rust::{message_schema, DispatchRegistry};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// pub struct Tick { pub frame: u64 }
///
/// message_schema! {
///     pub enum Sim: SimKind { Tick(Tick) }
/// }
///
/// let registry = DispatchRegistry::<Sim>::json();
/// let a = registry.dispatcher_for("physics").unwrap();
/// let b = registry.dispatcher_for("physics").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct DispatchRegistry<M: Message, C: Codec = JsonCodec> {
    codec: Arc<C>,
    kinds: Arc<KindTable<M, C>>,
    dispatchers: RwLock<HashMap<Origin, Arc<Dispatcher<M, C>>>>,
}

impl<M: Message> DispatchRegistry<M, JsonCodec> {
    /// Registry using the JSON wire format and the schema's kind table.
    pub fn json() -> Self {
        Self::new(JsonCodec)
    }
}

#[cfg(feature = "bitcode")]
impl<M: Message> DispatchRegistry<M, crate::codec::BitcodeCodec> {
    /// Registry using the bitcode wire format and the schema's kind table.
    pub fn bitcode() -> Self {
        Self::new(crate::codec::BitcodeCodec)
    }
}

impl<M: Message, C: Codec> DispatchRegistry<M, C> {
    /// Registry using `codec` and the kind table declared by the schema.
    pub fn new(codec: C) -> Self {
        Self::with_kinds(codec, M::kind_table())
    }

    /// Registry using `codec` and an explicit kind table.
    pub fn with_kinds(codec: C, kinds: KindTable<M, C>) -> Self {
        Self {
            codec: Arc::new(codec),
            kinds: Arc::new(kinds),
            dispatchers: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the dispatcher for `origin`, creating an empty one if needed.
    pub fn dispatcher_for(
        &self,
        origin: impl Into<Origin>,
    ) -> Result<Arc<Dispatcher<M, C>>, DispatchError> {
        let origin = origin.into();

        {
            let dispatchers = self
                .dispatchers
                .read()
                .map_err(|_| DispatchError::LockPoisoned("dispatcher_for"))?;
            if let Some(dispatcher) = dispatchers.get(&origin) {
                return Ok(Arc::clone(dispatcher));
            }
        }

        let mut dispatchers = self
            .dispatchers
            .write()
            .map_err(|_| DispatchError::LockPoisoned("dispatcher_for"))?;
        let dispatcher = dispatchers.entry(origin.clone()).or_insert_with(|| {
            debug!(origin = %origin, codec = self.codec.name(), "dispatcher created");
            Arc::new(Dispatcher::new(
                origin.clone(),
                Arc::clone(&self.codec),
                Arc::clone(&self.kinds),
            ))
        });
        Ok(Arc::clone(dispatcher))
    }

    /// Origins that have a dispatcher, sorted.
    pub fn origins(&self) -> Result<Vec<Origin>, DispatchError> {
        let dispatchers = self
            .dispatchers
            .read()
            .map_err(|_| DispatchError::LockPoisoned("origins"))?;
        let mut origins: Vec<Origin> = dispatchers.keys().cloned().collect();
        origins.sort();
        Ok(origins)
    }

    pub fn len(&self) -> Result<usize, DispatchError> {
        let dispatchers = self
            .dispatchers
            .read()
            .map_err(|_| DispatchError::LockPoisoned("len"))?;
        Ok(dispatchers.len())
    }

    pub fn is_empty(&self) -> Result<bool, DispatchError> {
        Ok(self.len()? == 0)
    }

    pub fn kinds(&self) -> &KindTable<M, C> {
        &self.kinds
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Tear the registry down, releasing every dispatcher it created.
    ///
    /// Returns how many dispatchers were released. Dispatchers still held
    /// elsewhere through an `Arc` stay usable but are no longer reachable
    /// from any registry.
    pub fn shutdown(self) -> usize {
        let dispatchers = match self.dispatchers.into_inner() {
            Ok(dispatchers) => dispatchers,
            Err(poisoned) => poisoned.into_inner(),
        };
        let released = dispatchers.len();
        debug!(released, "dispatch registry shut down");
        released
    }
}

impl<M: Message, C: Codec + Default> Default for DispatchRegistry<M, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<M: Message, C: Codec> fmt::Debug for DispatchRegistry<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origins = self.origins().unwrap_or_default();
        f.debug_struct("DispatchRegistry")
            .field("codec", &self.codec.name())
            .field("kinds", &self.kinds)
            .field("origins", &origins)
            .finish()
    }
}
