//! Core ship record types for shipdeck.
//!
//! A [`Ship`] is one catalog entry as the ship service stores it. A
//! [`ShipDraft`] carries the same descriptive fields without an identifier;
//! it is what the form produces and what the store turns into a `Ship`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The year a ship was launched.
///
/// The service accepts either a JSON number or a string; form input arrives
/// as text and is kept as text when it does not parse as a year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LaunchYear {
    /// A numeric year.
    Year(i32),
    /// Free text, including the empty string.
    Text(String),
}

impl LaunchYear {
    /// Interpret form input, preferring a numeric year.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i32>() {
            Ok(year) => Self::Year(year),
            Err(_) => Self::Text(input.to_string()),
        }
    }

    /// The numeric year, if there is one.
    #[must_use]
    pub fn as_year(&self) -> Option<i32> {
        match self {
            Self::Year(year) => Some(*year),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl Default for LaunchYear {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for LaunchYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A catalog entry for one historical ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Opaque identifier, unique within the catalog and never changed.
    pub id: String,
    /// Ship name.
    pub name: String,
    /// Ship type, e.g. "Frigate".
    #[serde(rename = "type")]
    pub ship_type: String,
    /// Launch year.
    #[serde(default)]
    pub launch_year: LaunchYear,
    /// Country of origin.
    pub country: String,
    /// Length, free text with units.
    pub length: String,
    /// Notable events in order.
    #[serde(default)]
    pub notable_events: Vec<String>,
}

impl Ship {
    /// Mint a fresh identifier for a ship created on this side.
    #[must_use]
    pub fn mint_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Build a ship from an identifier and draft fields.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: ShipDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            ship_type: draft.ship_type,
            launch_year: draft.launch_year,
            country: draft.country,
            length: draft.length,
            notable_events: draft.notable_events,
        }
    }

    /// The descriptive fields of this ship, without its identifier.
    #[must_use]
    pub fn to_draft(&self) -> ShipDraft {
        ShipDraft {
            name: self.name.clone(),
            ship_type: self.ship_type.clone(),
            launch_year: self.launch_year.clone(),
            country: self.country.clone(),
            length: self.length.clone(),
            notable_events: self.notable_events.clone(),
        }
    }

    /// Check whether `term` occurs in the name, type, or country, ignoring case.
    ///
    /// An empty term matches every ship.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [&self.name, &self.ship_type, &self.country]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Check whether the descriptive fields equal those of `draft`.
    #[must_use]
    pub fn reflects(&self, draft: &ShipDraft) -> bool {
        self.to_draft() == *draft
    }
}

/// Ship fields as entered in a form, before an identifier is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipDraft {
    /// Ship name.
    pub name: String,
    /// Ship type.
    #[serde(rename = "type")]
    pub ship_type: String,
    /// Launch year.
    #[serde(default)]
    pub launch_year: LaunchYear,
    /// Country of origin.
    pub country: String,
    /// Length.
    pub length: String,
    /// Notable events in order.
    #[serde(default)]
    pub notable_events: Vec<String>,
}

/// Field filters for a server-side ship search.
///
/// Every supplied filter must match, each as a case-insensitive substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipQuery {
    /// Substring of the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    /// Substring of the country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ShipQuery {
    /// Check whether `ship` passes every supplied filter.
    #[must_use]
    pub fn accepts(&self, ship: &Ship) -> bool {
        fn field_matches(filter: Option<&String>, value: &str) -> bool {
            filter.map_or(true, |f| value.to_lowercase().contains(&f.to_lowercase()))
        }

        field_matches(self.name.as_ref(), &ship.name)
            && field_matches(self.ship_type.as_ref(), &ship.ship_type)
            && field_matches(self.country.as_ref(), &ship.country)
    }

    /// Check whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.ship_type.is_none() && self.country.is_none()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn victory() -> Ship {
        Ship {
            id: "1".to_string(),
            name: "Victory".to_string(),
            ship_type: "Frigate".to_string(),
            launch_year: LaunchYear::Year(1765),
            country: "UK".to_string(),
            length: "69 m".to_string(),
            notable_events: vec!["Battle of Trafalgar".to_string()],
        }
    }

    pub fn vasa() -> Ship {
        Ship {
            id: "2".to_string(),
            name: "Vasa".to_string(),
            ship_type: "Galleon".to_string(),
            launch_year: LaunchYear::Year(1627),
            country: "Sweden".to_string(),
            length: "69 m".to_string(),
            notable_events: vec!["Sank on maiden voyage".to_string()],
        }
    }

    pub fn endeavour_draft() -> ShipDraft {
        ShipDraft {
            name: "Endeavour".to_string(),
            ship_type: "Bark".to_string(),
            launch_year: LaunchYear::Year(1764),
            country: "UK".to_string(),
            length: "32 m".to_string(),
            notable_events: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let ship = victory();
        assert!(ship.matches("vict"));
        assert!(ship.matches("FRIG"));
        assert!(ship.matches("uk"));
        assert!(!ship.matches("xyz"));
    }

    #[test]
    fn test_matches_empty_term() {
        assert!(victory().matches(""));
    }

    #[test]
    fn test_matches_ignores_other_fields() {
        let ship = victory();
        assert!(!ship.matches("Trafalgar"));
        assert!(!ship.matches("1765"));
    }

    #[test]
    fn test_launch_year_parse() {
        assert_eq!(LaunchYear::parse("1765"), LaunchYear::Year(1765));
        assert_eq!(LaunchYear::parse(" 1627 "), LaunchYear::Year(1627));
        assert_eq!(LaunchYear::parse(""), LaunchYear::Text(String::new()));
        assert_eq!(
            LaunchYear::parse("c. 1500"),
            LaunchYear::Text("c. 1500".to_string())
        );
    }

    #[test]
    fn test_launch_year_as_year() {
        assert_eq!(LaunchYear::Year(1765).as_year(), Some(1765));
        assert_eq!(LaunchYear::Text("1765".to_string()).as_year(), Some(1765));
        assert_eq!(LaunchYear::Text("unknown".to_string()).as_year(), None);
    }

    #[test]
    fn test_ship_deserializes_numeric_string_year() {
        let json = r#"{"id":"9","name":"Mary Rose","type":"Carrack","launch_year":"1511",
            "country":"England","length":"45 m","notable_events":[]}"#;
        let ship: Ship = serde_json::from_str(json).unwrap();
        assert_eq!(ship.launch_year, LaunchYear::Text("1511".to_string()));
        assert_eq!(ship.launch_year.as_year(), Some(1511));
        assert_eq!(ship.ship_type, "Carrack");
    }

    #[test]
    fn test_ship_missing_events_defaults_to_empty() {
        let json = r#"{"id":"9","name":"Mary Rose","type":"Carrack","launch_year":1511,
            "country":"England","length":"45 m"}"#;
        let ship: Ship = serde_json::from_str(json).unwrap();
        assert!(ship.notable_events.is_empty());
    }

    #[test]
    fn test_ship_serializes_type_key() {
        let json = serde_json::to_value(victory()).unwrap();
        assert_eq!(json["type"], "Frigate");
        assert_eq!(json["launch_year"], 1765);
        assert!(json.get("ship_type").is_none());
    }

    #[test]
    fn test_from_draft_and_reflects() {
        let draft = endeavour_draft();
        let ship = Ship::from_draft("abc", draft.clone());
        assert_eq!(ship.id, "abc");
        assert!(ship.reflects(&draft));
        assert_eq!(ship.to_draft(), draft);
    }

    #[test]
    fn test_mint_id_is_unique() {
        let a = Ship::mint_id();
        let b = Ship::mint_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_query_accepts_all_filters() {
        let query = ShipQuery {
            name: Some("vic".to_string()),
            ship_type: None,
            country: Some("uk".to_string()),
        };
        assert!(query.accepts(&victory()));
        assert!(!query.accepts(&vasa()));
    }

    #[test]
    fn test_query_requires_every_filter() {
        let query = ShipQuery {
            name: Some("vic".to_string()),
            ship_type: Some("galleon".to_string()),
            country: None,
        };
        assert!(!query.accepts(&victory()));
    }

    #[test]
    fn test_empty_query_accepts_everything() {
        let query = ShipQuery::default();
        assert!(query.is_empty());
        assert!(query.accepts(&victory()));
        assert!(query.accepts(&vasa()));
    }

    #[test]
    fn test_query_serializes_only_set_filters() {
        let query = ShipQuery {
            ship_type: Some("Frigate".to_string()),
            ..ShipQuery::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Frigate"}));
    }
}
