//! A game host feeding encoded payloads through two hops.
//!
//! ```text
//! Emitter ──send_to──▶ "receiver" (ArenaLog) ──relay──▶ "nested" (Replay)
//! ```
//!
//! Run with `RUST_LOG=routed_rust=trace cargo run --example emitter` to see
//! every registration and delivery.

use std::sync::Arc;

use routed_rust::{message_schema, Consumer, DispatchError, DispatchRegistry, GroupId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Spawned {
    pub param: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scored {
    pub param2: String,
}

message_schema! {
    /// Everything the arena server can push.
    pub enum Arena: ArenaKind {
        Spawned(Spawned),
        Scored(Scored),
    }
}

const EMITTER: &str = "emitter";
const ARENA_LOG: &str = "arena-log";
const REPLAY: &str = "replay";

#[derive(Clone, Copy, Debug, PartialEq)]
enum BattleState {
    Idle,
    Running,
}

struct Emitter {
    state: BattleState,
    registry: Arc<DispatchRegistry<Arena>>,
}

impl Emitter {
    fn input(&self, payload: &[u8]) -> Result<(), DispatchError> {
        if self.state == BattleState::Idle {
            return Ok(());
        }
        let delivery = self
            .registry
            .dispatcher_for(EMITTER)?
            .send_to(payload, [ARENA_LOG])?;
        info!(kind = ?delivery.kind, delivered = delivery.delivered, "input dispatched");
        Ok(())
    }
}

struct ArenaLog {
    registry: Arc<DispatchRegistry<Arena>>,
}

impl Consumer for ArenaLog {
    fn group(&self) -> GroupId {
        GroupId::from_static(ARENA_LOG)
    }
}

impl ArenaLog {
    fn on_spawned(&self, message: &Spawned) {
        info!(param = %message.param, "arena log: spawned");
    }

    fn on_scored(&self, message: &Scored) {
        info!(param2 = %message.param2, "arena log: scored");
        let relayed = self
            .registry
            .dispatcher_for(ARENA_LOG)
            .and_then(|next| next.relay_variant(message, [REPLAY]));
        if let Err(err) = relayed {
            warn!(error = %err, "relay to replay failed");
        }
    }
}

struct Replay;

impl Consumer for Replay {
    fn group(&self) -> GroupId {
        GroupId::from_static(REPLAY)
    }
}

impl Replay {
    fn on_scored(&self, message: &Scored) {
        info!(param2 = %message.param2, "replay: scored");
    }
}

fn main() -> Result<(), DispatchError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = Arc::new(DispatchRegistry::<Arena>::json());

    let arena_log = Arc::new(ArenaLog {
        registry: Arc::clone(&registry),
    });
    let upstream = registry.dispatcher_for(EMITTER)?;
    upstream.bind(&arena_log, ArenaLog::on_spawned)?;
    upstream.bind(&arena_log, ArenaLog::on_scored)?;

    let replay = Arc::new(Replay);
    registry
        .dispatcher_for(ARENA_LOG)?
        .bind(&replay, Replay::on_scored)?;

    let mut emitter = Emitter {
        state: BattleState::Running,
        registry: Arc::clone(&registry),
    };

    let spawned = upstream.encode_variant(&Spawned { param: "a".into() })?;
    let scored = upstream.encode_variant(&Scored {
        param2: "fufufu".into(),
    })?;

    for i in 0..10 {
        let payload = if i % 2 == 1 { &scored } else { &spawned };
        emitter.input(payload)?;
    }

    // Ignored once the battle is over.
    emitter.state = BattleState::Idle;
    emitter.input(&spawned)?;

    info!(origins = registry.len()?, "done");
    Ok(())
}
