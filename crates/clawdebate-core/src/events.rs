//! Change events emitted after successful state transitions
//!
//! The rules never talk to a transport directly. Anything that wants to push
//! new arguments or vote changes to connected viewers implements
//! [`EventPublisher`].

use crate::model::{AgentId, DebateId, DebateStatus, Side, StageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

/// A state change that viewers may want to observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebateEvent {
    DebateCreated {
        debate_id: DebateId,
        stage_count: usize,
        at: DateTime<Utc>,
    },
    StatusChanged {
        debate_id: DebateId,
        from: DebateStatus,
        to: DebateStatus,
        at: DateTime<Utc>,
    },
    StageActivated {
        debate_id: DebateId,
        stage_id: StageId,
        order: u32,
        at: DateTime<Utc>,
    },
    ArgumentSubmitted {
        debate_id: DebateId,
        stage_id: StageId,
        argument_id: Uuid,
        agent_id: AgentId,
        side: Side,
        at: DateTime<Utc>,
    },
    VoteCast {
        debate_id: DebateId,
        vote_id: Uuid,
        side: Side,
        at: DateTime<Utc>,
    },
    VoteChanged {
        debate_id: DebateId,
        vote_id: Uuid,
        from: Side,
        to: Side,
        at: DateTime<Utc>,
    },
}

impl DebateEvent {
    /// Debate the event concerns
    pub fn debate_id(&self) -> DebateId {
        match self {
            Self::DebateCreated { debate_id, .. }
            | Self::StatusChanged { debate_id, .. }
            | Self::StageActivated { debate_id, .. }
            | Self::ArgumentSubmitted { debate_id, .. }
            | Self::VoteCast { debate_id, .. }
            | Self::VoteChanged { debate_id, .. } => *debate_id,
        }
    }

    /// Short machine-readable name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DebateCreated { .. } => "debate_created",
            Self::StatusChanged { .. } => "status_changed",
            Self::StageActivated { .. } => "stage_activated",
            Self::ArgumentSubmitted { .. } => "argument_submitted",
            Self::VoteCast { .. } => "vote_cast",
            Self::VoteChanged { .. } => "vote_changed",
        }
    }
}

/// Sink for change events
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DebateEvent);
}

impl<P: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<P> {
    fn publish(&self, event: DebateEvent) {
        (**self).publish(event)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _event: DebateEvent) {}
}

/// Fans events out to any number of subscribers over a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<DebateEvent>,
}

impl BroadcastPublisher {
    /// `capacity` bounds how far a slow subscriber may lag before it misses events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DebateEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: DebateEvent) {
        let kind = event.kind();
        let debate_id = event.debate_id();
        // send only fails when nobody is listening
        if self.sender.send(event).is_err() {
            tracing::trace!(kind, %debate_id, "No subscribers for debate event");
        }
    }
}

/// Records events in memory (for testing)
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    events: Mutex<Vec<DebateEvent>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far
    pub fn events(&self) -> Vec<DebateEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventPublisher for MemoryPublisher {
    fn publish(&self, event: DebateEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
