//! Shared schema and consumers for the dispatch suite.
//!
//! Mirrors a small game host: an emitter pushes encoded payloads to the
//! `receiver` group, which relays forwards on to the `nested` group.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use routed_rust::{
    message_schema, Codec, CodecError, Consumer, DispatchError, DispatchRegistry, GroupId,
    JsonCodec,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Announce {
    pub param: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Forward {
    pub param2: String,
}

/// Declared but never registered by any consumer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Unheard {
    pub note: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
}

message_schema! {
    pub enum Wire: WireKind {
        Announce(Announce),
        Forward(Forward),
        Unheard(Unheard),
        Reading(Reading),
    }
}

pub const EMITTER: &str = "emitter";
pub const RECEIVER: &str = "receiver";
pub const NESTED: &str = "nested";

/// Route library events to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// First hop. Registered on the emitter's dispatcher under `receiver`.
pub struct Receiver<C: Codec = JsonCodec> {
    registry: Arc<DispatchRegistry<Wire, C>>,
    pub log: Log,
}

impl<C: Codec> Consumer for Receiver<C> {
    fn group(&self) -> GroupId {
        GroupId::from_static(RECEIVER)
    }
}

impl<C: Codec> Receiver<C> {
    pub fn attach(registry: &Arc<DispatchRegistry<Wire, C>>) -> Result<Arc<Self>, DispatchError> {
        let receiver = Arc::new(Self {
            registry: Arc::clone(registry),
            log: Log::default(),
        });
        let upstream = registry.dispatcher_for(EMITTER)?;
        upstream.bind(&receiver, Self::on_announce)?;
        upstream.bind(&receiver, Self::on_forward)?;
        Ok(receiver)
    }

    fn on_announce(&self, message: &Announce) {
        self.log
            .lock()
            .unwrap()
            .push(format!("announce:{}", message.param));
    }

    fn on_forward(&self, message: &Forward) {
        self.log
            .lock()
            .unwrap()
            .push(format!("forward:{}", message.param2));
        let downstream = self.registry.dispatcher_for(RECEIVER).unwrap();
        downstream.relay_variant(message, [NESTED]).unwrap();
    }
}

/// Second hop. Registered on the receiver's dispatcher under `nested`.
pub struct Nested {
    pub log: Log,
    pub received: Mutex<Vec<Forward>>,
}

impl Consumer for Nested {
    fn group(&self) -> GroupId {
        GroupId::from_static(NESTED)
    }
}

impl Nested {
    pub fn attach<C: Codec>(
        registry: &Arc<DispatchRegistry<Wire, C>>,
    ) -> Result<Arc<Self>, DispatchError> {
        let nested = Arc::new(Self {
            log: Log::default(),
            received: Mutex::new(Vec::new()),
        });
        registry
            .dispatcher_for(RECEIVER)?
            .bind(&nested, |nested: &Nested, message: &Forward| {
                nested
                    .log
                    .lock()
                    .unwrap()
                    .push(format!("nested:{}", message.param2));
                nested.received.lock().unwrap().push(message.clone());
            })?;
        Ok(nested)
    }
}

/// JSON codec that counts how often each decode step runs.
#[derive(Default)]
pub struct CountingCodec {
    kind_reads: AtomicUsize,
    body_reads: AtomicUsize,
}

impl CountingCodec {
    pub fn kind_reads(&self) -> usize {
        self.kind_reads.load(Ordering::SeqCst)
    }

    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }
}

impl Codec for CountingCodec {
    fn name(&self) -> &'static str {
        "counting-json"
    }

    fn encode<K, V>(&self, kind: &K, body: &V) -> Result<Vec<u8>, CodecError>
    where
        K: Serialize,
        V: Serialize,
    {
        JsonCodec.encode(kind, body)
    }

    fn decode_kind<K>(&self, bytes: &[u8]) -> Result<K, CodecError>
    where
        K: DeserializeOwned,
    {
        self.kind_reads.fetch_add(1, Ordering::SeqCst);
        JsonCodec.decode_kind(bytes)
    }

    fn decode_body<K, V>(&self, bytes: &[u8]) -> Result<V, CodecError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        self.body_reads.fetch_add(1, Ordering::SeqCst);
        JsonCodec.decode_body::<K, V>(bytes)
    }
}
