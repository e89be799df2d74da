//! Menu browser view-model.
//!
//! Owns what the Home screen shows: it fills the local cache from the remote
//! feed the first time, then answers every search and filter change from the
//! cache.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::debounce::{debounce, Debouncer};
use crate::error::Result;
use crate::feed::MenuFeed;
use crate::menu::{FilterSelection, MenuItem};
use crate::storage::SharedMenuStore;

/// Banner shown when there is nothing to list.
pub const EMPTY_STATE_MESSAGE: &str = "No menu items available. Please try again later.";

/// Whether a freshly fetched catalog made it into the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStatus {
    /// Every fetched item was stored.
    Persisted,
    /// The write failed; the list is shown but the cache is still empty.
    Failed,
}

/// Where the initial list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The local cache already held items.
    Local {
        /// Number of items shown.
        count: usize,
    },
    /// The cache was empty and the remote feed filled it.
    Remote {
        /// Number of items shown.
        count: usize,
        /// Outcome of writing them to the cache.
        persist: PersistStatus,
    },
    /// Storage or the feed failed; nothing is shown.
    Unavailable,
}

/// What a search/filter refresh did to the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was replaced with this many items.
    Applied(usize),
    /// A newer result had already been applied; this one was dropped.
    Stale,
    /// The query failed; the previous list is still shown.
    Failed,
    /// Bootstrap has not finished; nothing was queried.
    Skipped,
}

#[derive(Debug, Default)]
struct ViewState {
    items: Vec<MenuItem>,
    search_input: String,
    search_query: String,
    filters: FilterSelection,
    mounted: bool,
    latest_applied: u64,
}

/// State and behavior of the menu list.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct MenuViewModel {
    store: SharedMenuStore,
    feed: Arc<dyn MenuFeed>,
    state: Arc<Mutex<ViewState>>,
    issued: Arc<AtomicU64>,
}

impl fmt::Debug for MenuViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuViewModel")
            .field("state", &self.state)
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}

impl MenuViewModel {
    /// Create a view-model over an open store and a catalog source.
    #[must_use]
    pub fn new(store: SharedMenuStore, feed: Arc<dyn MenuFeed>) -> Self {
        Self {
            store,
            feed,
            state: Arc::new(Mutex::new(ViewState::default())),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the initial list.
    ///
    /// Uses the local cache when it holds anything; otherwise fetches the
    /// catalog, shows it and writes it to the cache before returning. Errors
    /// are logged and leave an empty list.
    ///
    /// Search text or filters set while bootstrap was running are applied
    /// once it finishes.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let outcome = match self.load_or_backfill().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Error fetching menu data: {err}");
                self.state().items.clear();
                BootstrapOutcome::Unavailable
            }
        };

        let narrowed = {
            let mut state = self.state();
            state.mounted = true;
            !state.search_query.is_empty() || !state.filters.is_empty()
        };
        if narrowed {
            debug!("Applying search and filters set before the list loaded");
            self.refresh().await;
        }
        outcome
    }

    async fn load_or_backfill(&self) -> Result<BootstrapOutcome> {
        let local = {
            let store = self.store.lock().await;
            store.ensure_schema()?;
            store.read_all()?
        };

        if !local.is_empty() {
            let count = local.len();
            info!("Showing {count} cached menu items");
            self.state().items = local;
            return Ok(BootstrapOutcome::Local { count });
        }

        let fetched = self.feed.fetch_menu().await?;
        let count = fetched.len();
        self.state().items.clone_from(&fetched);

        let persist = match self.store.lock().await.write_many(&fetched) {
            Ok(_) => PersistStatus::Persisted,
            Err(err) => {
                warn!("Fetched menu could not be cached: {err}");
                PersistStatus::Failed
            }
        };
        info!("Showing {count} menu items from the feed ({persist:?})");
        Ok(BootstrapOutcome::Remote { count, persist })
    }

    /// Re-query the cache with the current search text and filters.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (seq, query, categories) = {
            let state = self.state();
            if !state.mounted {
                return RefreshOutcome::Skipped;
            }
            (
                self.issued.fetch_add(1, Ordering::SeqCst) + 1,
                state.search_query.clone(),
                state.filters.active_categories(),
            )
        };

        let result = self
            .store
            .lock()
            .await
            .query_by_text_and_categories(&query, &categories);

        match result {
            Ok(items) => self.apply(seq, items),
            Err(err) => {
                warn!("Menu query failed, keeping current list: {err}");
                RefreshOutcome::Failed
            }
        }
    }

    fn apply(&self, seq: u64, items: Vec<MenuItem>) -> RefreshOutcome {
        let mut state = self.state();
        if seq < state.latest_applied {
            debug!(
                "Dropping result of query {seq}, query {} already applied",
                state.latest_applied
            );
            return RefreshOutcome::Stale;
        }
        state.latest_applied = seq;
        let count = items.len();
        state.items = items;
        RefreshOutcome::Applied(count)
    }

    /// Flip the category filter at `index` and refresh.
    ///
    /// An out-of-range index changes nothing and returns `None`.
    pub async fn toggle_filter(&self, index: usize) -> Option<RefreshOutcome> {
        if !self.state().filters.toggle(index) {
            return None;
        }
        Some(self.refresh().await)
    }

    /// Replace the whole filter selection and refresh.
    pub async fn set_filters(&self, filters: FilterSelection) -> RefreshOutcome {
        self.state().filters = filters;
        self.refresh().await
    }

    /// Set the settled search text and refresh.
    pub async fn set_search_query(&self, query: impl Into<String>) -> RefreshOutcome {
        self.state().search_query = query.into();
        self.refresh().await
    }

    /// Update the text shown in the search field without querying.
    pub fn set_search_input(&self, text: impl Into<String>) {
        self.state().search_input = text.into();
    }

    /// Attach a debounced search field to this view.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn search_box(&self, quiet: Duration) -> SearchBox {
        let (debouncer, mut settled) = debounce::<String>(quiet);
        let view = self.clone();
        let driver = tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                view.set_search_query(query).await;
            }
        });
        SearchBox {
            view: self.clone(),
            debouncer,
            driver,
        }
    }

    /// The items currently shown.
    #[must_use]
    pub fn items(&self) -> Vec<MenuItem> {
        self.state().items.clone()
    }

    /// The empty-state banner, when there is nothing to show.
    #[must_use]
    pub fn empty_state_message(&self) -> Option<&'static str> {
        self.state().items.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }

    /// Text currently in the search field.
    #[must_use]
    pub fn search_input(&self) -> String {
        self.state().search_input.clone()
    }

    /// Search text the list is filtered by.
    #[must_use]
    pub fn search_query(&self) -> String {
        self.state().search_query.clone()
    }

    /// Current filter selection.
    #[must_use]
    pub fn filters(&self) -> FilterSelection {
        self.state().filters.clone()
    }

    /// Whether bootstrap has finished.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state().mounted
    }

    /// Number of cache queries issued by search/filter changes.
    #[must_use]
    pub fn queries_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// A search field whose keystrokes drive the list after a quiet period.
#[derive(Debug)]
pub struct SearchBox {
    view: MenuViewModel,
    debouncer: Debouncer<String>,
    driver: JoinHandle<()>,
}

impl SearchBox {
    /// Handle one edit of the field's text.
    pub fn type_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.view.set_search_input(text.clone());
        if !self.debouncer.push(text) {
            warn!("Search debouncer has stopped, input ignored");
        }
    }
}

impl Drop for SearchBox {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
