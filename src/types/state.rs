/// Lifecycle state of an `AtomicFile` session.
///
/// Transitions are one-way: `Open -> Committed` or `Open -> Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Committed,
    Closed,
}

impl SessionState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Open)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionState::Open => "open",
            SessionState::Committed => "committed",
            SessionState::Closed => "closed",
        }
    }
}
