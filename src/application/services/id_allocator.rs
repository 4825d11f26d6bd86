//! Identifier allocation by rejection sampling.
//!
//! A random token of fixed length is drawn uniformly from the base62 alphabet,
//! decoded to an id, and checked against the Link Store. Draws repeat until an
//! id with no stored row is found. With the default length of 6 the space holds
//! 62^6 (about 5.68e10) ids, so collisions are rare and the loop has no cap.
//!
//! Nothing is reserved: a concurrent request may draw the same id between the
//! check and the insert. The store's primary key rejects the second insert.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;
use crate::utils::base62::{self, SYMBOLS};

/// Default token length in symbols.
pub const DEFAULT_TOKEN_LENGTH: usize = 6;

/// Longest token whose every value fits in a signed 64-bit id (62^10 < 2^63).
pub const MAX_TOKEN_LENGTH: usize = 10;

/// An id that had no stored row when it was checked, with the token it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub id: i64,
    pub token: String,
}

/// Draws unused ids from a pluggable random source.
pub struct IdAllocator {
    rng: Mutex<Box<dyn RngCore + Send>>,
    token_length: usize,
}

impl IdAllocator {
    /// Creates an allocator seeded from the operating system.
    ///
    /// `token_length` is clamped to `1..=MAX_TOKEN_LENGTH`.
    pub fn new(token_length: usize) -> Self {
        Self::with_rng(token_length, StdRng::from_os_rng())
    }

    /// Creates an allocator drawing from `rng`. Tests pass a seeded generator.
    pub fn with_rng(token_length: usize, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
            token_length: token_length.clamp(1, MAX_TOKEN_LENGTH),
        }
    }

    /// Draws a random token of `token_length` symbols.
    pub fn random_token(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        (0..self.token_length)
            .map(|_| char::from(SYMBOLS[rng.random_range(0..SYMBOLS.len())]))
            .collect()
    }

    /// Draws tokens until one decodes to an id with no stored row.
    ///
    /// A row with an empty target still occupies its id.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the occupancy check.
    pub async fn allocate<L>(&self, repository: &L) -> Result<Allocation, StoreError>
    where
        L: LinkRepository + ?Sized,
    {
        let mut collisions = 0u64;

        loop {
            let token = self.random_token();
            let id = token_to_id(&token);

            match repository.find_by_id(id).await? {
                None => {
                    if collisions > 0 {
                        tracing::debug!(collisions, id, "allocated id after collisions");
                    }
                    return Ok(Allocation { id, token });
                }
                Some(_) => {
                    collisions += 1;
                    tracing::debug!(id, collisions, "id already taken, drawing again");
                }
            }
        }
    }
}

/// Decodes a token produced by [`IdAllocator::random_token`].
///
/// Such tokens hold only alphabet symbols and at most `MAX_TOKEN_LENGTH` of
/// them, so the value always fits.
fn token_to_id(token: &str) -> i64 {
    base62::decode(token)
        .ok()
        .and_then(|v| i64::try_from(v).ok())
        .unwrap_or_default()
}
