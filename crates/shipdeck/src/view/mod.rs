//! View model for the ship catalog.
//!
//! [`ViewState`] holds everything the screen shows: the mode, the local ship
//! collection, the search term, and the current notification. It changes
//! only through [`ViewState::apply`], a pure transition over [`Action`]s.
//! Time enters as data (`at` / [`Action::Tick`]), never from a clock.
//!
//! Modes:
//!
//! ```text
//! Loading --list ok--> Viewing <--> Creating / Editing
//!    \
//!     --list failed--> Failed (until remount)
//! ```

mod form;

pub use form::{FormEdit, FormField, ShipForm};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::collection::ShipCollection;
use crate::error::Result;
use crate::ship::{Ship, ShipDraft};

/// How long notifications stay visible unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TTL_MS: i64 = 3_000;

/// Message shown after a successful create.
pub const CREATED_MESSAGE: &str = "Ship created successfully";
/// Message shown after a successful update.
pub const UPDATED_MESSAGE: &str = "Ship updated successfully";
/// Message shown after a successful delete.
pub const DELETED_MESSAGE: &str = "Ship deleted successfully";

/// What the screen is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the first list call.
    Loading,
    /// Browsing and searching.
    Viewing,
    /// Blank form open for a new ship.
    Creating {
        /// The form being filled in.
        form: ShipForm,
    },
    /// Form open for an existing ship.
    Editing {
        /// Id of the ship being edited.
        id: String,
        /// The form being filled in.
        form: ShipForm,
    },
    /// The first list call failed; nothing useful to show.
    Failed {
        /// The persistent error message.
        message: String,
    },
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A mutation succeeded.
    Success,
    /// A mutation failed.
    Error,
}

/// A transient message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text to show.
    pub message: String,
    /// Severity.
    pub kind: NotificationKind,
    /// When the message stops being shown.
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still visible at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A pending submission built from the open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Create a new ship.
    Create(ShipDraft),
    /// Replace the fields of an existing ship.
    Update {
        /// Id of the ship.
        id: String,
        /// New field values.
        draft: ShipDraft,
    },
}

/// Inputs to the view state machine.
#[derive(Debug)]
pub enum Action {
    /// The list call completed.
    Loaded(Result<Vec<Ship>>),
    /// The search box changed.
    SearchChanged(String),
    /// The user asked to add a ship.
    AddRequested,
    /// The user asked to edit the ship with this id.
    EditRequested(String),
    /// The user edited the open form.
    Edit(FormEdit),
    /// The user closed the form without submitting.
    Cancelled,
    /// A create call completed.
    Created {
        /// Store result.
        result: Result<Ship>,
        /// Completion time.
        at: DateTime<Utc>,
    },
    /// An update call completed.
    Updated {
        /// Id the update targeted.
        id: String,
        /// Store result.
        result: Result<Ship>,
        /// Completion time.
        at: DateTime<Utc>,
    },
    /// A delete call completed.
    Deleted {
        /// Id the delete targeted.
        id: String,
        /// Store result.
        result: Result<()>,
        /// Completion time.
        at: DateTime<Utc>,
    },
    /// Time passed; expired notifications are dropped.
    Tick(DateTime<Utc>),
    /// The view was torn down and mounted again.
    Remounted,
}

/// Complete state of the catalog screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    mode: Mode,
    ships: ShipCollection,
    search: String,
    notification: Option<Notification>,
    notification_ttl: chrono::Duration,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(chrono::Duration::milliseconds(DEFAULT_NOTIFICATION_TTL_MS))
    }
}

impl ViewState {
    /// A freshly mounted view in [`Mode::Loading`].
    #[must_use]
    pub fn new(notification_ttl: chrono::Duration) -> Self {
        Self {
            mode: Mode::Loading,
            ships: ShipCollection::new(),
            search: String::new(),
            notification: None,
            notification_ttl,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The local collection.
    #[must_use]
    pub fn ships(&self) -> &ShipCollection {
        &self.ships
    }

    /// Current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Ships matching the current search term, in collection order.
    #[must_use]
    pub fn visible_ships(&self) -> Vec<&Ship> {
        self.ships.filter(&self.search)
    }

    /// The current notification, regardless of expiry.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// The notification if it is still visible at `now`.
    #[must_use]
    pub fn notification_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_visible_at(now))
    }

    /// The open form, if any.
    #[must_use]
    pub fn form(&self) -> Option<&ShipForm> {
        match &self.mode {
            Mode::Creating { form } | Mode::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// The persistent load error, if the view is in [`Mode::Failed`].
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        match &self.mode {
            Mode::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// What submitting the open form would send, if a form is open.
    #[must_use]
    pub fn submission(&self) -> Option<Submission> {
        match &self.mode {
            Mode::Creating { form } => Some(Submission::Create(form.to_draft())),
            Mode::Editing { id, form } => Some(Submission::Update {
                id: id.clone(),
                draft: form.to_draft(),
            }),
            _ => None,
        }
    }

    /// Apply one action and return the next state.
    #[must_use]
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::Loaded(result) => self.on_loaded(result),
            Action::SearchChanged(term) => self.search = term,
            Action::AddRequested => {
                if self.accepts_input() {
                    self.mode = Mode::Creating {
                        form: ShipForm::blank(),
                    };
                }
            }
            Action::EditRequested(id) => {
                if self.accepts_input() {
                    match self.ships.get(&id) {
                        Some(ship) => {
                            let form = ShipForm::from_ship(ship);
                            self.mode = Mode::Editing { id, form };
                        }
                        None => debug!(%id, "edit requested for unknown ship"),
                    }
                }
            }
            Action::Edit(edit) => match &mut self.mode {
                Mode::Creating { form } | Mode::Editing { form, .. } => {
                    if !form.apply(edit) {
                        debug!("form edit ignored");
                    }
                }
                _ => {}
            },
            Action::Cancelled => {
                if self.form().is_some() {
                    self.mode = Mode::Viewing;
                }
            }
            Action::Created { result, at } => {
                match result {
                    Ok(ship) => {
                        self.ships.append(ship);
                        self.notify(CREATED_MESSAGE.to_string(), NotificationKind::Success, at);
                    }
                    Err(err) => self.notify_error(&err, at),
                }
                if matches!(self.mode, Mode::Creating { .. }) {
                    self.mode = Mode::Viewing;
                }
            }
            Action::Updated { id, result, at } => {
                match result {
                    Ok(ship) => {
                        if !self.ships.replace_by_id(&id, ship) {
                            debug!(%id, "updated ship no longer in collection");
                        }
                        self.notify(UPDATED_MESSAGE.to_string(), NotificationKind::Success, at);
                    }
                    Err(err) => self.notify_error(&err, at),
                }
                if matches!(&self.mode, Mode::Editing { id: editing, .. } if *editing == id) {
                    self.mode = Mode::Viewing;
                }
            }
            Action::Deleted { id, result, at } => match result {
                Ok(()) => {
                    self.ships.remove_by_id(&id);
                    self.notify(DELETED_MESSAGE.to_string(), NotificationKind::Success, at);
                }
                Err(err) => self.notify_error(&err, at),
            },
            Action::Tick(now) => {
                if self.notification.as_ref().is_some_and(|n| !n.is_visible_at(now)) {
                    self.notification = None;
                }
            }
            Action::Remounted => return Self::new(self.notification_ttl),
        }
        self
    }

    fn on_loaded(&mut self, result: Result<Vec<Ship>>) {
        match (result, &self.mode) {
            (Ok(ships), Mode::Loading) => {
                self.ships.replace_all(ships);
                self.mode = Mode::Viewing;
            }
            (Ok(ships), _) => self.ships.replace_all(ships),
            (Err(err), Mode::Loading) => {
                warn!(error = %err, "initial ship list failed");
                self.mode = Mode::Failed {
                    message: err.to_string(),
                };
            }
            (Err(err), _) => warn!(error = %err, "ship list failed after load"),
        }
    }

    fn accepts_input(&self) -> bool {
        !matches!(self.mode, Mode::Loading | Mode::Failed { .. })
    }

    fn notify(&mut self, message: String, kind: NotificationKind, at: DateTime<Utc>) {
        self.notification = Some(Notification {
            message,
            kind,
            expires_at: at + self.notification_ttl,
        });
    }

    fn notify_error(&mut self, err: &crate::Error, at: DateTime<Utc>) {
        self.notify(format!("Error: {err}"), NotificationKind::Error, at);
    }
}
