// web_app/state/guard.rs - In-flight guard with request sequence numbers
//
// Each request gets a ticket from a monotonically increasing counter.
// Only the ticket issued last may write its response into state; anything
// older is stale and gets discarded when it resolves.

/// Ticket for one dispatched request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a ticket must be handed back to `RequestGuard::finish`"]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: u64,
    in_flight: Option<u64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard for a new request
    ///
    /// Returns `None` while another request is in flight, unless `force`
    /// is set, in which case the outstanding request becomes stale.
    pub fn begin(&mut self, force: bool) -> Option<Ticket> {
        if self.in_flight.is_some() && !force {
            return None;
        }
        self.latest += 1;
        self.in_flight = Some(self.latest);
        Some(Ticket(self.latest))
    }

    /// Hand a ticket back once its response arrived
    ///
    /// Returns true when the response is current and should be applied.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        if self.in_flight == Some(ticket.0) {
            self.in_flight = None;
        }
        true
    }

    /// Make the outstanding request stale without issuing a new one
    pub fn supersede(&mut self) {
        self.latest += 1;
        self.in_flight = None;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Sequence of the newest ticket or supersede; moves on every claim
    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// What happened to a manager action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The response was applied to state
    Applied,
    /// The request failed; the error is recorded in state
    Failed,
    /// Nothing was sent: guard busy, out-of-range page, or blank input
    Dropped,
    /// A newer action took over before the response arrived
    Superseded,
}

impl RequestOutcome {
    pub fn is_applied(self) -> bool {
        self == RequestOutcome::Applied
    }
}
