use jobsearch_core::{DaysWindow, Msg, SortMode};

pub const HELP: &str = "\
commands:
  text <words>       free-text search (debounced)
  skill <name>       skill filter; empty clears it
  city <name>|all    city filter
  days <n>           posted within n days (7, 14, 30, 60, 90, 180, 365)
  sort newest|title|company
  page <n> | next | prev
  show | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("invalid value `{value}` for `{command}`")]
    InvalidValue { command: &'static str, value: String },
}

/// Parse one line typed at the prompt. A blank line redraws the screen.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line.trim_end(), ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "text" | "q" => Msg::TextInput(rest.to_string()),
        "skill" => Msg::SkillInput(rest.to_string()),
        "city" => match rest {
            "" | "all" => Msg::CitySelected(None),
            name => Msg::CitySelected(Some(name.to_string())),
        },
        "days" => {
            let days = rest
                .parse::<u32>()
                .ok()
                .and_then(DaysWindow::new)
                .ok_or_else(|| invalid("days", rest))?;
            Msg::DaysSelected(days)
        }
        "sort" => Msg::SortSelected(SortMode::from_param(rest).ok_or_else(|| invalid("sort", rest))?),
        "page" => {
            let page = rest
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| invalid("page", rest))?;
            Msg::PageRequested(page)
        }
        "next" => Msg::NextPage,
        "prev" => Msg::PrevPage,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidValue {
        command,
        value: value.to_string(),
    }
}
