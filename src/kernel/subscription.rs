use super::event::SessionId;
use super::media::MediaSignal;

/// Media events a session can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    MetadataLoaded,
    DataLoaded,
    CanPlay,
    Seeked,
    /// Position monitor on time-advance.
    TimeUpdate,
    /// Pause recovery.
    Pause,
    Ended,
}

impl ListenerKind {
    pub fn of(signal: &MediaSignal) -> Option<Self> {
        match signal {
            MediaSignal::MetadataLoaded => Some(ListenerKind::MetadataLoaded),
            MediaSignal::DataLoaded => Some(ListenerKind::DataLoaded),
            MediaSignal::CanPlay => Some(ListenerKind::CanPlay),
            MediaSignal::Seeked => Some(ListenerKind::Seeked),
            MediaSignal::TimeUpdate => Some(ListenerKind::TimeUpdate),
            MediaSignal::Pause => Some(ListenerKind::Pause),
            MediaSignal::Ended => Some(ListenerKind::Ended),
            MediaSignal::Error(_) => None,
        }
    }
}

pub const READINESS: [ListenerKind; 3] = [
    ListenerKind::MetadataLoaded,
    ListenerKind::CanPlay,
    ListenerKind::DataLoaded,
];

/// One registered listener. Owned by a scope, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub session: SessionId,
    pub kind: ListenerKind,
    pub once: bool,
}

/// All listeners acquired by one tracking session.
///
/// Dropping or replacing the scope releases every listener it holds, so a
/// superseded session can never act on a later event.
#[derive(Debug)]
pub struct ListenerScope {
    session: SessionId,
    subscriptions: Vec<Subscription>,
}

impl ListenerScope {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            subscriptions: Vec::new(),
        }
    }

    /// Registers a persistent listener. Re-registering the same kind is a no-op.
    pub fn listen(&mut self, kind: ListenerKind) -> &Subscription {
        self.register(kind, false)
    }

    /// Registers a listener that is consumed by the first matching event.
    pub fn listen_once(&mut self, kind: ListenerKind) -> &Subscription {
        self.register(kind, true)
    }

    fn register(&mut self, kind: ListenerKind, once: bool) -> &Subscription {
        let idx = match self.subscriptions.iter().position(|s| s.kind == kind) {
            Some(idx) => idx,
            None => {
                self.subscriptions.push(Subscription {
                    session: self.session,
                    kind,
                    once,
                });
                self.subscriptions.len() - 1
            }
        };
        &self.subscriptions[idx]
    }

    /// Delivers an event to the scope. Returns whether a listener was armed
    /// for it; one-shot listeners are consumed.
    pub fn fire(&mut self, kind: ListenerKind) -> bool {
        match self.subscriptions.iter().position(|s| s.kind == kind) {
            Some(idx) => {
                if self.subscriptions[idx].once {
                    self.subscriptions.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Releases a group of listeners together. Returns how many were released.
    pub fn release(&mut self, kinds: &[ListenerKind]) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| !kinds.contains(&s.kind));
        before - self.subscriptions.len()
    }

    /// Releases everything. Returns how many listeners were held.
    pub fn release_all(&mut self) -> usize {
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
