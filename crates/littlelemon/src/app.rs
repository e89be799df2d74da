//! Application bootstrap.
//!
//! Opens the store handles once, decides where a launch lands, and wraps the
//! onboarding and profile flows that sit on top of the session store.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::feed::{HttpMenuFeed, MenuFeed};
use crate::profile::ProfileData;
use crate::session::SessionStore;
use crate::storage::{MenuStore, SharedMenuStore};
use crate::viewmodel::{MenuViewModel, SearchBox};

/// Top-level destination after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Nobody is logged in yet.
    Onboarding,
    /// The main tabs.
    Main,
}

/// Tab the main screen opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Menu browser.
    Home,
    /// Profile editor.
    Profile,
}

/// Where a launch lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launch {
    /// Top-level destination.
    pub route: Route,
    /// Initial tab within the main screen.
    pub tab: Tab,
    /// Whether this launch recorded the first-login follow-up.
    pub first_time: bool,
}

/// Decide where this launch lands.
///
/// The first launch that finds a logged-in session records the first-run
/// flag and opens on Home; later launches open on Profile. Read failures are
/// logged and treated as logged out.
pub fn resolve_launch(session: &SessionStore) -> Launch {
    let mut launch = Launch {
        route: Route::Onboarding,
        tab: Tab::Profile,
        first_time: false,
    };

    let logged_in = match session.is_logged_in() {
        Ok(logged_in) => logged_in,
        Err(err) => {
            error!("Could not read login state: {err}");
            return launch;
        }
    };
    if !logged_in {
        return launch;
    }
    launch.route = Route::Main;

    match session.is_first_time_marked() {
        Ok(true) => {}
        Ok(false) => {
            launch.first_time = true;
            launch.tab = Tab::Home;
            if let Err(err) = session.mark_first_time() {
                error!("Could not record first launch: {err}");
            }
        }
        Err(err) => error!("Could not read first-launch flag: {err}"),
    }

    launch
}

/// Complete onboarding with a first name and email.
///
/// Surrounding whitespace is trimmed from both values before they are
/// validated and stored, so `" Ana "` is accepted as `"Ana"`.
///
/// # Errors
///
/// Returns [`Error::InvalidProfile`] if either value fails validation, or a
/// storage error if the session cannot be written.
pub fn onboard(session: &SessionStore, first_name: &str, email: &str) -> Result<ProfileData> {
    let profile = ProfileData::from_onboarding(first_name.trim(), email.trim());
    let fields = profile.invalid_onboarding_fields();
    if !fields.is_empty() {
        return Err(Error::InvalidProfile { fields });
    }
    session.complete_onboarding(&profile)?;
    Ok(profile)
}

/// Replace the stored profile after validating every field.
///
/// # Errors
///
/// Returns [`Error::InvalidProfile`] listing the failing fields, or a
/// storage error if the session cannot be written.
pub fn update_profile(session: &SessionStore, profile: &ProfileData) -> Result<()> {
    let fields = profile.invalid_fields();
    if !fields.is_empty() {
        return Err(Error::InvalidProfile { fields });
    }
    session.save_profile(profile)
}

/// The store handles an app instance runs on.
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    menu: SharedMenuStore,
    session: SessionStore,
}

impl AppContext {
    /// Open both stores at the configured paths.
    ///
    /// # Errors
    ///
    /// Returns an error if either database cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let menu = MenuStore::open(config.database_path())?.into_shared();
        let session = SessionStore::open(config.session_path())?;
        info!("App context opened");
        Ok(Self {
            config,
            menu,
            session,
        })
    }

    /// Open both stores in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory databases cannot be created.
    pub fn open_in_memory(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            menu: MenuStore::open_in_memory()?.into_shared(),
            session: SessionStore::open_in_memory()?,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The shared menu store handle.
    #[must_use]
    pub fn menu_store(&self) -> SharedMenuStore {
        Arc::clone(&self.menu)
    }

    /// Decide where this launch lands.
    #[must_use]
    pub fn launch(&self) -> Launch {
        resolve_launch(&self.session)
    }

    /// A menu view backed by the configured HTTP feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn menu_view(&self) -> Result<MenuViewModel> {
        let feed = HttpMenuFeed::new(self.config.feed.url.clone(), self.config.feed_timeout())?;
        Ok(self.menu_view_with_feed(Arc::new(feed)))
    }

    /// A menu view backed by the given feed.
    #[must_use]
    pub fn menu_view_with_feed(&self, feed: Arc<dyn MenuFeed>) -> MenuViewModel {
        MenuViewModel::new(self.menu_store(), feed)
    }

    /// A search field for `view` that settles after the configured quiet
    /// period.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn search_box(&self, view: &MenuViewModel) -> SearchBox {
        view.search_box(self.config.debounce())
    }

    /// Close both stores.
    ///
    /// Every menu view must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a menu view still holds the store or a database
    /// refuses to close.
    pub fn close(self) -> Result<()> {
        let menu = Arc::try_unwrap(self.menu)
            .map_err(|_| Error::internal("menu store is still in use"))?
            .into_inner();
        menu.close()?;
        self.session.close()?;
        info!("App context closed");
        Ok(())
    }
}
