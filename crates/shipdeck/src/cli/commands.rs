//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::ship::{LaunchYear, ShipDraft, ShipQuery};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show ships whose name, type, or country contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Ship id
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Server-side search arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Name contains
    #[arg(long)]
    pub name: Option<String>,

    /// Type contains
    #[arg(long = "type")]
    pub ship_type: Option<String>,

    /// Country contains
    #[arg(long)]
    pub country: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl SearchCommand {
    /// The store query these arguments describe.
    #[must_use]
    pub fn query(&self) -> ShipQuery {
        ShipQuery {
            name: self.name.clone(),
            ship_type: self.ship_type.clone(),
            country: self.country.clone(),
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Ship name
    #[arg(long)]
    pub name: String,

    /// Ship type
    #[arg(long = "type")]
    pub ship_type: String,

    /// Launch year
    #[arg(long, default_value = "")]
    pub launch_year: String,

    /// Country of origin
    #[arg(long, default_value = "")]
    pub country: String,

    /// Length
    #[arg(long, default_value = "")]
    pub length: String,

    /// Notable event (repeatable)
    #[arg(short, long = "event")]
    pub events: Vec<String>,
}

impl AddCommand {
    /// The draft these arguments describe.
    #[must_use]
    pub fn draft(&self) -> ShipDraft {
        ShipDraft {
            name: self.name.clone(),
            ship_type: self.ship_type.clone(),
            launch_year: LaunchYear::parse(&self.launch_year),
            country: self.country.clone(),
            length: self.length.clone(),
            notable_events: self.events.clone(),
        }
    }
}

/// Edit command arguments; omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Ship id
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New type
    #[arg(long = "type")]
    pub ship_type: Option<String>,

    /// New launch year
    #[arg(long)]
    pub launch_year: Option<String>,

    /// New country
    #[arg(long)]
    pub country: Option<String>,

    /// New length
    #[arg(long)]
    pub length: Option<String>,

    /// Notable event to append (repeatable)
    #[arg(short, long = "event")]
    pub events: Vec<String>,

    /// Drop existing events before appending
    #[arg(long)]
    pub clear_events: bool,
}

impl EditCommand {
    /// Apply these arguments on top of the current fields.
    #[must_use]
    pub fn apply_to(&self, mut draft: ShipDraft) -> ShipDraft {
        if let Some(name) = &self.name {
            draft.name.clone_from(name);
        }
        if let Some(ship_type) = &self.ship_type {
            draft.ship_type.clone_from(ship_type);
        }
        if let Some(year) = &self.launch_year {
            draft.launch_year = LaunchYear::parse(year);
        }
        if let Some(country) = &self.country {
            draft.country.clone_from(country);
        }
        if let Some(length) = &self.length {
            draft.length.clone_from(length);
        }
        if self.clear_events {
            draft.notable_events.clear();
        }
        draft.notable_events.extend(self.events.iter().cloned());
        draft
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Ship id
    pub id: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Cards
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::fixtures::victory;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_add_command_draft() {
        let cmd = AddCommand {
            name: "Endeavour".to_string(),
            ship_type: "Bark".to_string(),
            launch_year: "1764".to_string(),
            country: "UK".to_string(),
            length: String::new(),
            events: vec!["Transit of Venus".to_string()],
        };
        let draft = cmd.draft();
        assert_eq!(draft.launch_year, LaunchYear::Year(1764));
        assert_eq!(draft.notable_events, ["Transit of Venus".to_string()]);
    }

    #[test]
    fn test_edit_command_keeps_unset_fields() {
        let cmd = EditCommand {
            id: "1".to_string(),
            name: Some("HMS Victory".to_string()),
            ship_type: None,
            launch_year: None,
            country: None,
            length: None,
            events: vec!["Restored".to_string()],
            clear_events: false,
        };
        let draft = cmd.apply_to(victory().to_draft());
        assert_eq!(draft.name, "HMS Victory");
        assert_eq!(draft.ship_type, "Frigate");
        assert_eq!(
            draft.notable_events,
            ["Battle of Trafalgar".to_string(), "Restored".to_string()]
        );
    }

    #[test]
    fn test_edit_command_clear_events() {
        let cmd = EditCommand {
            id: "1".to_string(),
            name: None,
            ship_type: None,
            launch_year: Some("1778".to_string()),
            country: None,
            length: None,
            events: vec![],
            clear_events: true,
        };
        let draft = cmd.apply_to(victory().to_draft());
        assert!(draft.notable_events.is_empty());
        assert_eq!(draft.launch_year, LaunchYear::Year(1778));
    }

    #[test]
    fn test_search_command_query() {
        let cmd = SearchCommand {
            name: None,
            ship_type: Some("frigate".to_string()),
            country: None,
            format: OutputFormat::Table,
        };
        let query = cmd.query();
        assert_eq!(query.ship_type.as_deref(), Some("frigate"));
        assert!(query.name.is_none());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
