//! Tick gating shared by every bar builder.

use barsmith_calendar::{ActualTradingSession, SessionIterator, TradingSessionIterator};
use barsmith_series::BarsInfo;
use barsmith_types::{InstrumentId, Tick};
use tracing::{debug, trace};

/// Outcome of offering a tick to a [`SessionGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// The tick belongs to another instrument.
    ForeignInstrument,
    /// The tick is outside every session.
    OutOfSession,
    /// The tick is the first one of a new session; builder state must reset.
    SessionStart,
    /// The tick continues the current session.
    InSession,
}

impl Admission {
    pub(crate) const fn is_admitted(self) -> bool {
        matches!(self, Self::SessionStart | Self::InSession)
    }
}

/// Drops ticks of other instruments and ticks outside trading sessions.
#[derive(Debug, Clone)]
pub(crate) struct SessionGate {
    instrument: InstrumentId,
    sessions: TradingSessionIterator,
}

impl SessionGate {
    pub(crate) fn new(info: &BarsInfo) -> Self {
        Self {
            instrument: info.instrument.id().clone(),
            sessions: TradingSessionIterator::new(info.sessions.clone(), info.first_session_date),
        }
    }

    /// Advances the session iterator to the tick and classifies it.
    pub(crate) fn admit(&mut self, tick: &Tick) -> Admission {
        if tick.instrument != self.instrument {
            trace!(instrument = %tick.instrument, expected = %self.instrument, "Dropped tick of another instrument");
            return Admission::ForeignInstrument;
        }

        self.sessions.move_until(tick.timestamp);
        if !self.sessions.is_in_session() {
            trace!(timestamp = %tick.timestamp, "Dropped out-of-session tick");
            return Admission::OutOfSession;
        }

        if self.sessions.is_first_tick_of_session() {
            let session = self.sessions.current();
            debug!(
                session_date = %session.session_date,
                start = %session.start,
                end = %session.end,
                "Session start; resetting bar state"
            );
            Admission::SessionStart
        } else {
            Admission::InSession
        }
    }

    /// The session of the last admitted tick.
    pub(crate) const fn session(&self) -> &ActualTradingSession {
        self.sessions.current()
    }
}
