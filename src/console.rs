//! The terminal stand-in for the guild report page.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use simbot_report::{DisplayContainer, ErrorDisplay, ReportError, ReportForm, TextInput};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Region,
    Weeks,
    Difficulty,
    Guild,
    Realm,
}

impl FromStr for Field {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "region" => Ok(Field::Region),
            "weeks" => Ok(Field::Weeks),
            "difficulty" => Ok(Field::Difficulty),
            "guild" | "guildname" => Ok(Field::Guild),
            "realm" => Ok(Field::Realm),
            _ => Err(CommandError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Submit,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty line")]
    Empty,
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "submit" | "submitguild" => Ok(Command::Submit),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Ok(Command::Set(word.parse()?, rest.to_string())),
    }
}

pub const HELP: &str = "\
Commands:
  region <US|EU|KR|TW|CN>
  weeks <n>
  difficulty <lfr|normal|heroic|mythic>
  guild <name>
  realm <name>
  submit        fetch the guild report
  show          print the current form
  quit";

/// The five text boxes of the page.
#[derive(Debug, Clone, Default)]
pub struct ConsoleForm {
    pub region: TextInput,
    pub weeks: TextInput,
    pub difficulty: TextInput,
    pub guild: TextInput,
    pub realm: TextInput,
}

impl ConsoleForm {
    pub fn input(&self, field: Field) -> &TextInput {
        match field {
            Field::Region => &self.region,
            Field::Weeks => &self.weeks,
            Field::Difficulty => &self.difficulty,
            Field::Guild => &self.guild,
            Field::Realm => &self.realm,
        }
    }

    pub fn set(&self, field: Field, value: impl Into<String>) {
        self.input(field).set(value);
    }

    /// A form for the handler, sharing these inputs.
    pub fn report_form(&self) -> ReportForm {
        ReportForm::new(
            self.region.clone(),
            self.weeks.clone(),
            self.difficulty.clone(),
            self.guild.clone(),
            self.realm.clone(),
        )
    }

    pub fn describe(&self) -> String {
        format!("{:?}", self.report_form().snapshot())
    }
}

/// Where the report fragment is printed.
#[derive(Debug, Clone)]
pub enum Printout {
    Stdout,
    /// Overwritten on every report. Failed writes count as errors.
    File { path: PathBuf, errors: ConsoleErrors },
}

impl DisplayContainer for Printout {
    fn set_html(&self, html: String) {
        match self {
            Printout::Stdout => println!("{}", html),
            Printout::File { path, errors } => {
                if let Err(err) = std::fs::write(path, html) {
                    errors.show_write_error(path, &err);
                } else {
                    info!("Report written to {}", path.display());
                }
            }
        }
    }
}

/// Shows errors on stderr and counts them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleErrors {
    count: Arc<AtomicUsize>,
}

impl ConsoleErrors {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn show_write_error(&self, path: &Path, err: &std::io::Error) {
        self.count.fetch_add(1, Ordering::SeqCst);
        error!("Could not write report to {}: {}", path.display(), err);
        eprintln!("Could not write the report to {}: {}", path.display(), err);
    }
}

impl ErrorDisplay for ConsoleErrors {
    fn show_error(&self, err: &ReportError) {
        self.count.fetch_add(1, Ordering::SeqCst);
        error!("Guild report request failed: {}", err);
        match err {
            ReportError::Network(_) => eprintln!("Could not reach the SimBot site: {}", err),
            ReportError::Server { status, .. } => eprintln!("The SimBot site answered with {}", status),
            ReportError::InvalidUrl(_) => eprintln!("{}", err),
        }
    }
}

#[cfg(test)]
mod test {
    use simbot_report::InputField;

    use super::*;

    #[test]
    fn parses_field_assignments() {
        assert_eq!(Ok(Command::Set(Field::Guild, "Test Guild".into())), parse_command("guild   Test Guild "));
        assert_eq!(Ok(Command::Set(Field::Guild, "Clutch".into())), parse_command("guildname Clutch"));
        assert_eq!(Ok(Command::Set(Field::Realm, "Area-52".into())), parse_command("Realm Area-52"));
        assert_eq!(Ok(Command::Set(Field::Weeks, "".into())), parse_command("weeks"));
    }

    #[test]
    fn parses_actions() {
        assert_eq!(Ok(Command::Submit), parse_command("submit"));
        assert_eq!(Ok(Command::Show), parse_command(" SHOW"));
        assert_eq!(Ok(Command::Quit), parse_command("exit"));
        assert_eq!(Ok(Command::Help), parse_command("?"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Err(CommandError::Empty), parse_command("   "));
        assert_eq!(Err(CommandError::Unknown("dance".into())), parse_command("dance now"));
    }

    #[test]
    fn form_shares_inputs() {
        let console = ConsoleForm::default();
        let form = console.report_form();
        console.set(Field::Region, "EU");
        console.set(Field::Guild, "Clutch");
        let snapshot = form.snapshot();
        assert_eq!("EU", snapshot.region);
        assert_eq!("Clutch", snapshot.guild);
        assert_eq!("Clutch", console.input(Field::Guild).value());
    }

    #[test]
    fn file_printout_overwrites() {
        let path = std::env::temp_dir().join(format!("simbot-printout-{}.html", std::process::id()));
        let errors = ConsoleErrors::default();
        let printout = Printout::File {
            path: path.clone(),
            errors: errors.clone(),
        };
        printout.set_html("<p>one</p>".into());
        printout.set_html("<p>two</p>".into());
        assert_eq!("<p>two</p>", std::fs::read_to_string(&path).unwrap());
        assert_eq!(0, errors.count());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn failed_file_write_is_counted() {
        let path = std::env::temp_dir()
            .join(format!("simbot-missing-dir-{}", std::process::id()))
            .join("report.html");
        let errors = ConsoleErrors::default();
        let printout = Printout::File {
            path,
            errors: errors.clone(),
        };
        printout.set_html("<p>lost</p>".into());
        assert_eq!(1, errors.count());
    }
}
