//! Plain-text rendering of ships, the form, and the whole view.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::session::greeting_name;
use crate::ship::Ship;
use crate::view::{FormField, Mode, NotificationKind, ShipForm, ViewState};

/// Render one ship as a card.
#[must_use]
pub fn render_card(ship: &Ship) -> String {
    let mut lines = vec![
        format!("{}  [{}]", ship.name, ship.id),
        format!("  Type: {}", ship.ship_type),
        format!("  Launch Year: {}", ship.launch_year),
        format!("  Country: {}", ship.country),
        format!("  Length: {}", ship.length),
        "  Notable Events:".to_string(),
    ];
    lines.extend(ship.notable_events.iter().map(|event| format!("    - {event}")));
    join_lines(&lines)
}

/// Join lines, ending each with a newline.
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render ships as cards separated by blank lines.
#[must_use]
pub fn render_cards(ships: &[&Ship]) -> String {
    ships
        .iter()
        .map(|s| render_card(s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render ships as an aligned table.
#[must_use]
pub fn render_table(ships: &[&Ship]) -> String {
    const HEADERS: [&str; 6] = ["ID", "NAME", "TYPE", "YEAR", "COUNTRY", "LENGTH"];

    let rows: Vec<[String; 6]> = ships
        .iter()
        .map(|s| {
            [
                s.id.clone(),
                s.name.clone(),
                s.ship_type.clone(),
                s.launch_year.to_string(),
                s.country.clone(),
                s.length.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(ToString::to_string).collect();
    push_row(&mut out, &header, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Render ships as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(ships: &[&Ship]) -> Result<String> {
    Ok(serde_json::to_string_pretty(ships)?)
}

/// Render the create/edit form.
#[must_use]
pub fn render_form(form: &ShipForm, updating: bool) -> String {
    let verb = if updating { "Update" } else { "Create" };
    let mut lines = vec![format!("--- {verb} Ship ---")];
    lines.extend(
        FormField::ALL
            .iter()
            .map(|&field| format!("  {:<12} ({field}): {}", field.label(), form.field(field))),
    );
    lines.push("  Notable Events:".to_string());
    lines.extend(
        form.events()
            .iter()
            .enumerate()
            .map(|(index, event)| format!("    Event {}: {event}", index + 1)),
    );
    lines.push(format!("  [submit] {verb} Ship   [cancel]"));
    join_lines(&lines)
}

/// Render the screen shown while the session is unresolved.
#[must_use]
pub fn render_loading() -> String {
    "Loading...\n".to_string()
}

/// Render the screen shown when no session exists.
#[must_use]
pub fn render_sign_in() -> String {
    concat!(
        "Sign in to continue.\n",
        "Set `auth.token` in the config file or SHIPDECK_AUTH__TOKEN in the environment,\n",
        "or enter `login <token>` in the shell.\n",
    )
    .to_string()
}

/// Render the whole catalog screen as of `now`.
#[must_use]
pub fn render_view(state: &ViewState, user_name: Option<&str>, now: DateTime<Utc>) -> String {
    let mut out = match user_name {
        Some(name) => format!("Ships  |  Welcome, {}\n", greeting_name(name)),
        None => "Ships\n".to_string(),
    };

    match state.mode() {
        Mode::Loading => {
            out.push_str(&render_loading());
            return out;
        }
        Mode::Failed { message } => {
            out.push_str(&format!("Error: {message}\n"));
            return out;
        }
        Mode::Viewing | Mode::Creating { .. } | Mode::Editing { .. } => {}
    }

    if !state.search().is_empty() {
        out.push_str(&format!("Search: {}\n", state.search()));
    }
    if let Some(note) = state.notification_at(now) {
        let marker = match note.kind {
            NotificationKind::Success => "*",
            NotificationKind::Error => "!",
        };
        out.push_str(&format!("{marker} {}\n", note.message));
    }
    if let Some(form) = state.form() {
        let updating = matches!(state.mode(), Mode::Editing { .. });
        out.push('\n');
        out.push_str(&render_form(form, updating));
    }

    let visible = state.visible_ships();
    out.push('\n');
    if visible.is_empty() {
        out.push_str("No ships found.\n");
    } else {
        out.push_str(&render_cards(&visible));
    }
    out
}
