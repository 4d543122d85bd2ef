use std::fmt;

/// Caller-supplied numeric client identifier taken from the connection path.
///
/// Not unique: two sessions may present the same id.
pub type ClientId = u64;

/// Registry identity of one accepted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(pub u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
