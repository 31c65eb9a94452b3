//! Create/edit form state.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ship::{LaunchYear, Ship, ShipDraft};

/// A single-line field of the ship form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Ship name.
    Name,
    /// Ship type.
    Type,
    /// Launch year.
    LaunchYear,
    /// Country.
    Country,
    /// Length.
    Length,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Type,
        Self::LaunchYear,
        Self::Country,
        Self::Length,
    ];

    /// Placeholder label shown next to the field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Ship Name",
            Self::Type => "Ship Type",
            Self::LaunchYear => "Launch Year",
            Self::Country => "Country",
            Self::Length => "Length",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Type => write!(f, "type"),
            Self::LaunchYear => write!(f, "launch_year"),
            Self::Country => write!(f, "country"),
            Self::Length => write!(f, "length"),
        }
    }
}

impl FromStr for FormField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "launch_year" | "launch-year" | "year" => Ok(Self::LaunchYear),
            "country" => Ok(Self::Country),
            "length" => Ok(Self::Length),
            other => Err(Error::invalid_input(format!("unknown form field '{other}'"))),
        }
    }
}

/// One user edit to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    /// Replace a field's text.
    Set(FormField, String),
    /// Append an empty event slot.
    AddEvent,
    /// Remove the event at an index.
    RemoveEvent(usize),
    /// Replace the event text at an index.
    SetEvent(usize, String),
}

/// Field values of the create/edit form, held as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipForm {
    name: String,
    ship_type: String,
    launch_year: String,
    country: String,
    length: String,
    notable_events: Vec<String>,
}

impl ShipForm {
    /// A blank form with one empty event slot.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            ship_type: String::new(),
            launch_year: String::new(),
            country: String::new(),
            length: String::new(),
            notable_events: vec![String::new()],
        }
    }

    /// A form pre-populated from an existing ship.
    #[must_use]
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            ship_type: ship.ship_type.clone(),
            launch_year: ship.launch_year.to_string(),
            country: ship.country.clone(),
            length: ship.length.clone(),
            notable_events: ship.notable_events.clone(),
        }
    }

    /// Current text of a field.
    #[must_use]
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Type => &self.ship_type,
            FormField::LaunchYear => &self.launch_year,
            FormField::Country => &self.country,
            FormField::Length => &self.length,
        }
    }

    /// Event slots in order.
    #[must_use]
    pub fn events(&self) -> &[String] {
        &self.notable_events
    }

    /// Check that `edit` only refers to event slots that exist.
    #[must_use]
    pub fn accepts(&self, edit: &FormEdit) -> bool {
        match edit {
            FormEdit::RemoveEvent(index) | FormEdit::SetEvent(index, _) => {
                *index < self.notable_events.len()
            }
            FormEdit::Set(..) | FormEdit::AddEvent => true,
        }
    }

    /// Apply an edit; returns `false` if it referred to a missing event slot.
    pub fn apply(&mut self, edit: FormEdit) -> bool {
        match edit {
            FormEdit::Set(field, value) => {
                let slot = match field {
                    FormField::Name => &mut self.name,
                    FormField::Type => &mut self.ship_type,
                    FormField::LaunchYear => &mut self.launch_year,
                    FormField::Country => &mut self.country,
                    FormField::Length => &mut self.length,
                };
                *slot = value;
                true
            }
            FormEdit::AddEvent => {
                self.notable_events.push(String::new());
                true
            }
            FormEdit::RemoveEvent(index) => {
                if index < self.notable_events.len() {
                    self.notable_events.remove(index);
                    true
                } else {
                    false
                }
            }
            FormEdit::SetEvent(index, value) => match self.notable_events.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
        }
    }

    /// The draft this form would submit.
    #[must_use]
    pub fn to_draft(&self) -> ShipDraft {
        ShipDraft {
            name: self.name.clone(),
            ship_type: self.ship_type.clone(),
            launch_year: LaunchYear::parse(&self.launch_year),
            country: self.country.clone(),
            length: self.length.clone(),
            notable_events: self.notable_events.clone(),
        }
    }
}

impl Default for ShipForm {
    fn default() -> Self {
        Self::blank()
    }
}
