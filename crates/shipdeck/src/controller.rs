//! View controller.
//!
//! [`ViewController`] turns user intents into store calls and feeds each
//! call's outcome back into the [`ViewState`] reducer. It is the only
//! place the local collection is reconciled with store results, and it
//! refuses to reach the store without an authenticated session.
//!
//! Store calls run as tasks. The `issue_*` methods start a call and return
//! at once, so the view keeps taking input while requests are in flight;
//! [`ViewController::complete_next`] reduces whichever call finishes first.
//! Completions are applied in arrival order, so the last response wins.
//! The `async` convenience methods issue a call and wait for every pending
//! call to settle.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::{Session, SessionState};
use crate::store::ShipStore;
use crate::view::{Action, FormEdit, Submission, ViewState};

/// Drives the catalog view against a store and a session.
#[derive(Debug)]
pub struct ViewController {
    store: Arc<dyn ShipStore>,
    session: Arc<dyn Session>,
    state: ViewState,
    in_flight: JoinSet<Action>,
}

impl ViewController {
    /// Create a controller with a freshly mounted view.
    #[must_use]
    pub fn new(
        store: Arc<dyn ShipStore>,
        session: Arc<dyn Session>,
        notification_ttl: chrono::Duration,
    ) -> Self {
        Self {
            store,
            session,
            state: ViewState::new(notification_ttl),
            in_flight: JoinSet::new(),
        }
    }

    /// The current view state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The session the controller is gated on.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Current session state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Number of store calls issued but not yet reduced.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Feed one action through the reducer.
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);
    }

    /// Start fetching the ship list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] without calling the store when no
    /// session exists.
    pub fn issue_load(&mut self) -> Result<()> {
        self.require_session()?;
        let store = Arc::clone(&self.store);
        self.in_flight.spawn(async move {
            let result = store.list().await;
            if let Ok(ships) = &result {
                info!(count = ships.len(), store = store.name(), "ships loaded");
            }
            Action::Loaded(result)
        });
        Ok(())
    }

    /// Tear the view down, dropping calls issued by the old view, and start
    /// loading again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists.
    pub fn issue_remount(&mut self) -> Result<()> {
        self.in_flight.abort_all();
        self.dispatch(Action::Remounted);
        self.issue_load()
    }

    /// Start submitting the open form.
    ///
    /// The form stays open until the call completes; it may be edited,
    /// cancelled, or submitted again in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists, or an
    /// invalid input error when no form is open.
    pub fn issue_submit(&mut self) -> Result<()> {
        self.require_session()?;
        let submission = self
            .state
            .submission()
            .ok_or_else(|| Error::invalid_input("no form is open"))?;

        let store = Arc::clone(&self.store);
        match submission {
            Submission::Create(draft) => {
                debug!(name = %draft.name, "submitting new ship");
                self.in_flight.spawn(async move {
                    let result = store.create(draft).await;
                    Action::Created {
                        result,
                        at: Utc::now(),
                    }
                });
            }
            Submission::Update { id, draft } => {
                debug!(%id, "submitting ship update");
                self.in_flight.spawn(async move {
                    let result = store.update(&id, draft).await;
                    Action::Updated {
                        id,
                        result,
                        at: Utc::now(),
                    }
                });
            }
        }
        Ok(())
    }

    /// Start deleting the ship with `id`.
    ///
    /// The store is called even if the view does not know the id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists.
    pub fn issue_delete(&mut self, id: impl Into<String>) -> Result<()> {
        self.require_session()?;
        let id = id.into();
        let store = Arc::clone(&self.store);
        self.in_flight.spawn(async move {
            let result = store.delete(&id).await;
            Action::Deleted {
                id,
                result,
                at: Utc::now(),
            }
        });
        Ok(())
    }

    /// Wait for the next store call to finish and return its completion
    /// without reducing it. Returns `None` when nothing is in flight.
    ///
    /// Cancel safe: dropping the future loses no completion.
    pub async fn next_completion(&mut self) -> Option<Action> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(action) => return Some(action),
                Err(err) if err.is_cancelled() => debug!("dropped call from a torn-down view"),
                Err(err) => warn!(error = %err, "store call task failed"),
            }
        }
    }

    /// Reduce the next completion; returns `false` when nothing is in flight.
    pub async fn complete_next(&mut self) -> bool {
        match self.next_completion().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Reduce completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.complete_next().await {}
    }

    /// Fetch the ship list into the view.
    ///
    /// A store failure is recorded in the view state, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] without calling the store when no
    /// session exists.
    pub async fn load(&mut self) -> Result<()> {
        self.issue_load()?;
        self.settle().await;
        Ok(())
    }

    /// Tear the view down and load it again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists.
    pub async fn remount(&mut self) -> Result<()> {
        self.issue_remount()?;
        self.settle().await;
        Ok(())
    }

    /// Submit the open form and wait for the result.
    ///
    /// Store failures become an error notification and leave the collection
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists, or an
    /// invalid input error when no form is open.
    pub async fn submit(&mut self) -> Result<()> {
        self.issue_submit()?;
        self.settle().await;
        Ok(())
    }

    /// Delete the ship with `id` and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session exists.
    pub async fn delete(&mut self, id: impl Into<String>) -> Result<()> {
        self.issue_delete(id)?;
        self.settle().await;
        Ok(())
    }

    /// Change the search term.
    pub fn search(&mut self, term: impl Into<String>) {
        self.dispatch(Action::SearchChanged(term.into()));
    }

    /// Open a blank form.
    pub fn begin_create(&mut self) {
        self.dispatch(Action::AddRequested);
    }

    /// Open the form for the ship with `id`.
    pub fn begin_edit(&mut self, id: impl Into<String>) {
        self.dispatch(Action::EditRequested(id.into()));
    }

    /// Edit the open form.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error, leaving the form as it was, when no
    /// form is open or the edit names an event slot the form does not have.
    pub fn edit_form(&mut self, edit: FormEdit) -> Result<()> {
        let Some(form) = self.state.form() else {
            return Err(Error::invalid_input("no form is open"));
        };
        if !form.accepts(&edit) {
            return Err(Error::invalid_input(format!(
                "no such event; the form has {} event slot(s)",
                form.events().len()
            )));
        }
        self.dispatch(Action::Edit(edit));
        Ok(())
    }

    /// Close the form without submitting.
    pub fn cancel(&mut self) {
        self.dispatch(Action::Cancelled);
    }

    /// Drop the notification if it has expired.
    pub fn tick(&mut self) {
        self.dispatch(Action::Tick(Utc::now()));
    }

    /// End the session through the provider.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::Unauthenticated)
        }
    }
}
