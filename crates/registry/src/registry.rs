use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use events::{Event, EventBus};
use tracing::{debug, info};
use veto_core::{
    ActionKind, ChannelId, MapPool, Result, SessionSnapshot, TeamSide, UserId, VetoError,
    VetoFormat, VetoSession,
};

/// A registered session. `open` is cleared when the session leaves the
/// registry, so a caller still holding the slot sees it as gone.
struct Slot {
    session: VetoSession,
    open: bool,
}

type SharedSlot = Arc<Mutex<Slot>>;

/// Channel → active veto table.
///
/// Locks are always taken registry first, then slot. Actions only hold the
/// slot lock, so vetoes in different channels never wait on each other.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<ChannelId, SharedSlot>>>,
    event_bus: Option<EventBus>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Copy of the active veto in `channel`.
    pub fn get(&self, channel: ChannelId) -> Option<VetoSession> {
        let slot = self.slot(channel)?;
        let guard = slot.lock().unwrap();
        guard.open.then(|| guard.session.clone())
    }

    pub fn snapshot(&self, channel: ChannelId) -> Option<SessionSnapshot> {
        let slot = self.slot(channel)?;
        let guard = slot.lock().unwrap();
        guard.open.then(|| guard.session.snapshot())
    }

    pub fn is_active(&self, channel: ChannelId) -> bool {
        self.get(channel).is_some()
    }

    /// Starts a veto in `channel`.
    ///
    /// Fails without touching the registry if the format size is not 1, 3
    /// or 5, if the channel already has a veto, or if pool or rosters are
    /// invalid.
    pub fn start<I, S>(
        &self,
        channel: ChannelId,
        pool: I,
        team1: impl IntoIterator<Item = UserId>,
        team2: impl IntoIterator<Item = UserId>,
        format_size: u32,
    ) -> Result<VetoSession>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let format = VetoFormat::from_size(format_size)?;

        let mut sessions = self.sessions.write().unwrap();
        if let Some(existing) = sessions.get(&channel) {
            // A closed slot is a completed veto whose eviction is in flight.
            if existing.lock().unwrap().open {
                return Err(VetoError::SessionAlreadyActive(channel));
            }
        }

        let pool = MapPool::new(pool)?;
        let session = VetoSession::new(channel, pool, team1, team2, format)?;
        sessions.insert(
            channel,
            Arc::new(Mutex::new(Slot {
                session: session.clone(),
                open: true,
            })),
        );
        drop(sessions);

        info!(
            channel = %channel,
            format = format.size(),
            maps = session.maps_remaining().len(),
            "Veto started"
        );
        self.emit(Event::VetoStarted {
            channel,
            format: format.size(),
            maps: session.maps_remaining().to_vec(),
            team1: session.team(TeamSide::Team1).iter().copied().collect(),
            team2: session.team(TeamSide::Team2).iter().copied().collect(),
        });

        Ok(session)
    }

    pub fn ban(&self, channel: ChannelId, map: &str, actor: UserId) -> Result<SessionSnapshot> {
        self.act(channel, ActionKind::Ban, map, actor)
    }

    pub fn pick(&self, channel: ChannelId, map: &str, actor: UserId) -> Result<SessionSnapshot> {
        self.act(channel, ActionKind::Pick, map, actor)
    }

    /// Applies one ban or pick on behalf of `actor`.
    ///
    /// Turn check, validation, mutation and completion happen under the
    /// session lock, so of two racing actions the second one sees the state
    /// left by the first. A completed veto is evicted before returning.
    pub fn act(
        &self,
        channel: ChannelId,
        kind: ActionKind,
        map: &str,
        actor: UserId,
    ) -> Result<SessionSnapshot> {
        let slot = self
            .slot(channel)
            .ok_or(VetoError::NoActiveVeto(channel))?;

        let snapshot = {
            let mut guard = slot.lock().unwrap();
            if !guard.open {
                return Err(VetoError::NoActiveVeto(channel));
            }
            if !guard.session.can_act(actor) {
                return Err(VetoError::NotYourTurn { actor });
            }

            let team = guard.session.active_team();
            guard.session.apply(kind, map, actor)?;
            let snapshot = guard.session.snapshot();

            debug!(channel = %channel, kind = %kind, map = %map, actor = %actor, "Veto action applied");
            if let Some(action) = &snapshot.last_action {
                self.emit(Event::VetoAction {
                    channel,
                    kind,
                    map: action.map.clone(),
                    team,
                    actor,
                });
            }

            if snapshot.completed {
                guard.open = false;
                self.emit(Event::VetoCompleted {
                    channel,
                    maps: snapshot.picked_maps.clone(),
                });
            }
            snapshot
        };

        if snapshot.completed {
            self.evict(channel, &slot);
            info!(channel = %channel, maps = ?snapshot.picked_maps, "Veto completed");
        }

        Ok(snapshot)
    }

    /// Removes the veto in `channel`, returning it if there was one.
    pub fn cancel(&self, channel: ChannelId) -> Option<VetoSession> {
        let session = self.take(channel)?;
        info!(
            channel = %channel,
            selections = session.selections_made(),
            running_secs = (Utc::now() - session.started_at()).num_seconds(),
            "Veto cancelled"
        );
        self.emit(Event::VetoCancelled { channel });
        Some(session)
    }

    /// Unconditional removal, without a cancellation event.
    pub fn remove(&self, channel: ChannelId) -> Option<VetoSession> {
        let session = self.take(channel);
        if session.is_some() {
            debug!(channel = %channel, "Veto removed");
        }
        session
    }

    /// Drops every veto whose last action is older than `max_idle` and
    /// returns the affected channels.
    pub fn evict_idle(&self, max_idle: Duration) -> Vec<ChannelId> {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return Vec::new();
        };
        let mut expired = Vec::new();

        self.sessions.write().unwrap().retain(|channel, slot| {
            let mut guard = slot.lock().unwrap();
            if !guard.open {
                return false;
            }
            if guard.session.last_action_at() > cutoff {
                return true;
            }
            guard.open = false;
            expired.push(*channel);
            false
        });

        expired.sort_unstable();
        for channel in &expired {
            info!(channel = %channel, "Idle veto expired");
            self.emit(Event::VetoExpired { channel: *channel });
        }
        expired
    }

    pub fn channels(&self) -> Vec<ChannelId> {
        let mut channels: Vec<ChannelId> = self
            .sessions
            .read()
            .unwrap()
            .iter()
            .filter(|(_, slot)| slot.lock().unwrap().open)
            .map(|(channel, _)| *channel)
            .collect();
        channels.sort_unstable();
        channels
    }

    pub fn len(&self) -> usize {
        self.channels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, channel: ChannelId) -> Option<SharedSlot> {
        self.sessions.read().unwrap().get(&channel).cloned()
    }

    fn take(&self, channel: ChannelId) -> Option<VetoSession> {
        let slot = self.sessions.write().unwrap().remove(&channel)?;
        let mut guard = slot.lock().unwrap();
        if !guard.open {
            return None;
        }
        guard.open = false;
        Some(guard.session.clone())
    }

    /// Removes `slot` only if it is still the one registered for `channel`.
    fn evict(&self, channel: ChannelId, slot: &SharedSlot) {
        let mut sessions = self.sessions.write().unwrap();
        if sessions
            .get(&channel)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            sessions.remove(&channel);
        }
    }

    fn emit(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("channels", &self.channels())
            .field("event_bus", &self.event_bus)
            .finish()
    }
}
