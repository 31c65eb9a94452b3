//! Interactive catalog session.
//!
//! Reads one command per line, drives the [`ViewController`], and redraws
//! the view after every command and every store response. Store calls do
//! not block input: a command that reaches the store returns at once and
//! its result is drawn when it arrives. Event slots are numbered from 1 as
//! on screen.

use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::controller::ViewController;
use crate::error::{Error, Result};
use crate::render::{render_loading, render_sign_in, render_view};
use crate::session::{Session, SessionState, TokenSession};
use crate::view::{FormEdit, FormField};

const HELP: &str = "\
commands:
  list                     redraw the catalog
  search [TEXT]            filter by name, type, or country (empty clears)
  add                      open a blank form
  edit ID                  open the form for a ship
  set FIELD VALUE          set name, type, year, country, or length
  event add                add an event slot
  event rm N               remove event N
  event set N TEXT         set event N
  submit                   save the open form
  cancel                   close the form
  delete ID                delete a ship
  reload                   reload the catalog
  login TOKEN              sign in with a session token
  logout                   end the session
  help                     show this help
  quit                     leave the shell
";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Redraw.
    List,
    /// Change the search term.
    Search(String),
    /// Open a blank form.
    Add,
    /// Open the form for a ship.
    Edit(String),
    /// Edit the open form.
    Form(FormEdit),
    /// Submit the open form.
    Submit,
    /// Close the form.
    Cancel,
    /// Delete a ship.
    Delete(String),
    /// Reload the catalog.
    Reload,
    /// Sign in with a token.
    Login(String),
    /// End the session.
    Logout,
    /// Show help.
    Help,
    /// Leave the shell.
    Quit,
}

impl ShellCommand {
    /// Parse one input line; blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns a usage message when the line is not a valid command.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = split_word(line);

        let command = match word {
            "list" | "ls" => Self::List,
            "search" => Self::Search(rest.to_string()),
            "add" => Self::Add,
            "edit" => Self::Edit(required(rest, "edit ID")?),
            "set" => {
                let (field, value) = split_word(rest);
                let field = field
                    .parse::<FormField>()
                    .map_err(|_| format!("unknown field '{field}'; usage: set FIELD VALUE"))?;
                Self::Form(FormEdit::Set(field, value.to_string()))
            }
            "event" => Self::Form(parse_event(rest)?),
            "submit" => Self::Submit,
            "cancel" => Self::Cancel,
            "delete" | "rm" => Self::Delete(required(rest, "delete ID")?),
            "reload" => Self::Reload,
            "login" => Self::Login(required(rest, "login TOKEN")?),
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; type `help`")),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required(rest: &str, usage: &str) -> std::result::Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_slot(text: &str) -> std::result::Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("event number must be 1 or more, got '{text}'")),
    }
}

fn parse_event(rest: &str) -> std::result::Result<FormEdit, String> {
    let (action, args) = split_word(rest);
    match action {
        "add" => Ok(FormEdit::AddEvent),
        "rm" | "remove" => Ok(FormEdit::RemoveEvent(parse_slot(args)?)),
        "set" => {
            let (slot, text) = split_word(args);
            Ok(FormEdit::SetEvent(parse_slot(slot)?, text.to_string()))
        }
        _ => Err("usage: event add | event rm N | event set N TEXT".to_string()),
    }
}

/// Interactive session over a controller.
#[derive(Debug)]
pub struct Shell {
    controller: ViewController,
    session: Arc<TokenSession>,
}

impl Shell {
    /// Create a shell; `session` must be the session the controller uses.
    #[must_use]
    pub fn new(controller: ViewController, session: Arc<TokenSession>) -> Self {
        Self {
            controller,
            session,
        }
    }

    /// The controller being driven.
    #[must_use]
    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Render the current screen.
    #[must_use]
    pub fn screen(&self) -> String {
        let mut screen = match self.session.state() {
            SessionState::Loading => render_loading(),
            SessionState::Unauthenticated => render_sign_in(),
            SessionState::Authenticated => render_view(
                self.controller.state(),
                self.session.user_name().as_deref(),
                Utc::now(),
            ),
        };
        match self.controller.pending() {
            0 => {}
            n => screen.push_str(&format!("(waiting on {n} request(s))\n")),
        }
        screen
    }

    /// Load the catalog if signed in.
    ///
    /// # Errors
    ///
    /// Propagates controller errors other than a missing session.
    pub async fn start(&mut self) -> Result<()> {
        match self.controller.load().await {
            Err(Error::Unauthenticated) => Ok(()),
            other => other,
        }
    }

    /// Wait for every in-flight store call and apply its result.
    pub async fn settle(&mut self) {
        self.controller.settle().await;
    }

    /// Execute one command; returns `false` when the shell should exit.
    ///
    /// Commands that reach the store only issue the call.
    ///
    /// # Errors
    ///
    /// Returns an error for commands that need a session when none exists,
    /// for form edits with no open form or a missing event slot, and for
    /// submit without an open form.
    pub fn execute(&mut self, command: ShellCommand) -> Result<bool> {
        debug!(?command, "shell command");
        self.controller.tick();
        match command {
            ShellCommand::List | ShellCommand::Help => {}
            ShellCommand::Search(term) => self.controller.search(term),
            ShellCommand::Add => self.controller.begin_create(),
            ShellCommand::Edit(id) => self.controller.begin_edit(id),
            ShellCommand::Form(edit) => self.controller.edit_form(edit)?,
            ShellCommand::Submit => self.controller.issue_submit()?,
            ShellCommand::Cancel => self.controller.cancel(),
            ShellCommand::Delete(id) => self.controller.issue_delete(id)?,
            ShellCommand::Reload => self.controller.issue_remount()?,
            ShellCommand::Login(token) => {
                self.session.sign_in(token);
                self.controller.issue_remount()?;
            }
            ShellCommand::Logout => self.controller.logout(),
            ShellCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Run the read-eval-draw loop until `quit` or end of input.
    ///
    /// Input lines and store responses are handled as they arrive. Calls
    /// still in flight when the loop ends are awaited and drawn once.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.start().await?;
        output.write_all(self.screen().as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await?;

        let mut lines = BufReader::new(input).lines();
        loop {
            tokio::select! {
                biased;
                Some(action) = self.controller.next_completion(), if self.controller.pending() > 0 => {
                    self.controller.dispatch(action);
                    output.write_all(b"\n").await?;
                    output.write_all(self.screen().as_bytes()).await?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.respond(&line, &mut output).await? {
                        break;
                    }
                }
            }
            output.write_all(b"> ").await?;
            output.flush().await?;
        }

        if self.controller.pending() > 0 {
            self.settle().await;
            output.write_all(self.screen().as_bytes()).await?;
        }
        output.flush().await?;
        Ok(())
    }

    async fn respond<W>(&mut self, line: &str, output: &mut W) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        match ShellCommand::parse(line) {
            Ok(None) => Ok(true),
            Ok(Some(ShellCommand::Help)) => {
                output.write_all(HELP.as_bytes()).await?;
                Ok(true)
            }
            Ok(Some(command)) => match self.execute(command) {
                Ok(true) => {
                    output.write_all(self.screen().as_bytes()).await?;
                    Ok(true)
                }
                Ok(false) => Ok(false),
                Err(err) => {
                    output.write_all(format!("{err}\n").as_bytes()).await?;
                    if err.is_unauthenticated() {
                        output.write_all(render_sign_in().as_bytes()).await?;
                    }
                    Ok(true)
                }
            },
            Err(usage) => {
                output.write_all(format!("{usage}\n").as_bytes()).await?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::fixtures::victory;
    use crate::store::MemoryShipStore;

    fn shell(token: Option<&str>) -> Shell {
        let session = Arc::new(TokenSession::new(token.map(str::to_string), None));
        let store = Arc::new(MemoryShipStore::with_ships(vec![victory()]));
        let controller =
            ViewController::new(store, session.clone(), chrono::Duration::seconds(3));
        Shell::new(controller, session)
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(ShellCommand::parse("  "), Ok(None));
        assert_eq!(ShellCommand::parse("ls"), Ok(Some(ShellCommand::List)));
        assert_eq!(
            ShellCommand::parse("search  Royal Navy "),
            Ok(Some(ShellCommand::Search("Royal Navy".to_string())))
        );
        assert_eq!(
            ShellCommand::parse("search"),
            Ok(Some(ShellCommand::Search(String::new())))
        );
        assert_eq!(
            ShellCommand::parse("edit 1"),
            Ok(Some(ShellCommand::Edit("1".to_string())))
        );
        assert_eq!(ShellCommand::parse("quit"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            ShellCommand::parse("set name HMS Victory"),
            Ok(Some(ShellCommand::Form(FormEdit::Set(
                FormField::Name,
                "HMS Victory".to_string()
            ))))
        );
        assert!(ShellCommand::parse("set tonnage 3500").is_err());
    }

    #[test]
    fn test_parse_event_commands() {
        assert_eq!(
            ShellCommand::parse("event add"),
            Ok(Some(ShellCommand::Form(FormEdit::AddEvent)))
        );
        assert_eq!(
            ShellCommand::parse("event rm 2"),
            Ok(Some(ShellCommand::Form(FormEdit::RemoveEvent(1))))
        );
        assert_eq!(
            ShellCommand::parse("event set 1 Battle of Trafalgar"),
            Ok(Some(ShellCommand::Form(FormEdit::SetEvent(
                0,
                "Battle of Trafalgar".to_string()
            ))))
        );
        assert!(ShellCommand::parse("event rm 0").is_err());
        assert!(ShellCommand::parse("event rm").is_err());
        assert!(ShellCommand::parse("event jump").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("edit").is_err());
        assert!(ShellCommand::parse("delete").is_err());
        assert!(ShellCommand::parse("sail away").is_err());
    }

    #[tokio::test]
    async fn test_signed_out_shell_shows_sign_in() {
        let mut shell = shell(None);
        shell.start().await.unwrap();
        assert!(shell.screen().contains("Sign in"));

        let err = shell.execute(ShellCommand::Delete("1".to_string())).unwrap_err();
        assert!(err.is_unauthenticated());
        assert_eq!(shell.controller().pending(), 0);
    }

    #[tokio::test]
    async fn test_login_loads_catalog() {
        let mut shell = shell(None);
        shell.start().await.unwrap();
        shell
            .execute(ShellCommand::Login("opaque".to_string()))
            .unwrap();
        assert!(shell.screen().contains("(waiting on 1 request(s))"));
        shell.settle().await;
        assert!(shell.screen().contains("Victory"));
        assert!(!shell.screen().contains("waiting on"));
    }

    #[tokio::test]
    async fn test_logout_hides_catalog() {
        let mut shell = shell(Some("opaque"));
        shell.start().await.unwrap();
        assert!(shell.screen().contains("Victory"));
        shell.execute(ShellCommand::Logout).unwrap();
        assert!(shell.screen().contains("Sign in"));
    }

    #[tokio::test]
    async fn test_run_script() {
        let mut shell = shell(Some("opaque"));
        let script = "\
add
set name Endeavour
set type Bark
set year 1764
event set 1 Transit of Venus
submit
search bark
bogus
quit
list
";
        let mut output = Vec::new();
        shell.run(script.as_bytes(), &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("--- Create Ship ---"));
        assert!(output.contains("* Ship created successfully"));
        assert!(output.contains("unknown command 'bogus'"));
        let ships = shell.controller().state().ships();
        assert_eq!(ships.len(), 2);
        let endeavour = ships.iter().find(|s| s.name == "Endeavour").unwrap();
        assert_eq!(endeavour.notable_events, ["Transit of Venus".to_string()]);
        assert_eq!(shell.controller().state().visible_ships().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_event_slot_is_reported() {
        let mut shell = shell(Some("opaque"));
        let script = "\
add
event rm 5
event set 2 Sunk
set name Endeavour
quit
";
        let mut output = Vec::new();
        shell.run(script.as_bytes(), &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(
            output
                .matches("invalid input: no such event; the form has 1 event slot(s)")
                .count(),
            2
        );
        let form = shell.controller().state().form().unwrap();
        assert_eq!(form.events().len(), 1);
        assert_eq!(form.field(FormField::Name), "Endeavour");
    }

    #[tokio::test]
    async fn test_form_edit_without_form_is_reported() {
        let mut shell = shell(Some("opaque"));
        shell.start().await.unwrap();
        let err = shell
            .execute(ShellCommand::Form(FormEdit::AddEvent))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: no form is open");
    }

    #[tokio::test]
    async fn test_input_is_read_while_delete_is_in_flight() {
        let mut shell = shell(Some("opaque"));
        shell.start().await.unwrap();
        shell.execute(ShellCommand::Delete("1".to_string())).unwrap();
        shell.execute(ShellCommand::Search("vict".to_string())).unwrap();
        assert_eq!(shell.controller().state().visible_ships().len(), 1);

        shell.settle().await;
        assert!(shell.controller().state().ships().is_empty());
        assert!(shell.screen().contains("* Ship deleted successfully"));
    }
}
