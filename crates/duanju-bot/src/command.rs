//! Text command parsing
//!
//! `<command> <keyword>` starts a search and `<command># <index>` looks up
//! an entry of the requester's last search.

/// A recognized user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Detail(usize),
}

/// Malformed command; answered with a corrective message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    EmptyKeyword,
    InvalidIndex(String),
}

/// Parse a message against the trigger word
///
/// # Returns
/// `None` if the text does not start with `command`, otherwise the parsed
/// command or the reason it was rejected
pub fn parse_command(text: &str, command: &str) -> Option<Result<Command, CommandError>> {
    let rest = text.trim().strip_prefix(command)?;

    if let Some(index) = rest.strip_prefix('#').or_else(|| rest.strip_prefix('＃')) {
        let index = index.trim();
        return Some(
            index
                .parse::<usize>()
                .map(Command::Detail)
                .map_err(|_| CommandError::InvalidIndex(index.to_string())),
        );
    }

    let keyword = rest.trim();
    if keyword.is_empty() {
        return Some(Err(CommandError::EmptyKeyword));
    }
    Some(Ok(Command::Search(keyword.to_string())))
}
