// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Dispatching an index should leave a record of the method behind it, the
same way a paper cites the index it uses. This registry is the
append-only, idempotent side channel for that: the dispatcher only knows
it through the [`CitationRegistry`] trait, so a caller can inject whatever
backing store their pipeline already uses instead of being forced to
accept ours.
 */

use std::collections::HashSet;
use std::sync::Mutex;

/// Side-channel emitting one citation token per dispatched index family.
/// Implementations must be idempotent: citing the same token twice has the
/// same observable effect as citing it once.
pub trait CitationRegistry: Send + Sync {
    fn cite(&self, token: &str);
}

/// A minimal in-memory [`CitationRegistry`] that simply deduplicates
/// tokens. Good enough for tests and for callers that don't otherwise
/// need a registry.
#[derive(Default)]
pub struct InMemoryCitationRegistry {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryCitationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tokens cited so far, in no particular order.
    pub fn cited(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().cloned().collect()
    }
}

impl CitationRegistry for InMemoryCitationRegistry {
    fn cite(&self, token: &str) {
        self.seen.lock().unwrap().insert(token.to_string());
    }
}

/// A registry that does nothing; useful when a caller has no interest in
/// citations at all.
#[derive(Default)]
pub struct NullCitationRegistry;

impl CitationRegistry for NullCitationRegistry {
    fn cite(&self, _token: &str) {}
}
