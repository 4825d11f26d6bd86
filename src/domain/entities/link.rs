//! Link entity representing a shortened URL mapping.

/// A stored short link.
///
/// `id` is the decoded value of the link's token. `expiry` is a Unix timestamp
/// in seconds; `None` means the link never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub target: String,
    pub expiry: Option<i64>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, target: String, expiry: Option<i64>) -> Self {
        Self { id, target, expiry }
    }

    /// Returns true if the link's expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiry.is_some_and(|expiry| expiry < now)
    }

    /// Returns true if the link can be redirected to at `now`.
    pub fn is_live_at(&self, now: i64) -> bool {
        self.status_at(now) == LinkStatus::Live
    }

    /// Classifies the link at `now`. An empty target wins over expiry.
    pub fn status_at(&self, now: i64) -> LinkStatus {
        if self.target.is_empty() {
            LinkStatus::Empty
        } else if self.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Live
        }
    }
}

/// Why a stored link does or does not redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Live,
    Expired,
    Empty,
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub id: i64,
    pub target: String,
    pub expiry: Option<i64>,
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Link::new(new_link.id, new_link.target, new_link.expiry)
    }
}
