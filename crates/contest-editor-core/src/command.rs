//! Terminal command protocol.
//!
//! Typed input is trimmed and echoed as a `command` entry. The host's [`CommandHandler`] then
//! answers with zero, one or several output lines. A handler that needs to do slow work returns
//! [`CommandResponse::None`] and delivers its lines later through
//! [`crate::ContestEditor::deliver_command_response`].

/// Output produced by a terminal command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandResponse {
    /// Nothing to print (or the answer comes later).
    #[default]
    None,
    /// One output line.
    Line(String),
    /// Several output lines, appended in order.
    Lines(Vec<String>),
}

impl CommandResponse {
    /// Output lines in append order.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            CommandResponse::None => Vec::new(),
            CommandResponse::Line(line) => vec![line],
            CommandResponse::Lines(lines) => lines,
        }
    }
}

impl From<()> for CommandResponse {
    fn from(_: ()) -> Self {
        CommandResponse::None
    }
}

impl From<String> for CommandResponse {
    fn from(line: String) -> Self {
        CommandResponse::Line(line)
    }
}

impl From<&str> for CommandResponse {
    fn from(line: &str) -> Self {
        CommandResponse::Line(line.to_string())
    }
}

impl From<Vec<String>> for CommandResponse {
    fn from(lines: Vec<String>) -> Self {
        CommandResponse::Lines(lines)
    }
}

impl<T: Into<CommandResponse>> From<Option<T>> for CommandResponse {
    fn from(value: Option<T>) -> Self {
        value.map_or(CommandResponse::None, Into::into)
    }
}

/// Host callback for terminal commands.
pub trait CommandHandler: Send {
    /// Handle one trimmed, non-empty command.
    fn handle(&mut self, command: &str) -> CommandResponse;
}

impl<F> CommandHandler for F
where
    F: FnMut(&str) -> CommandResponse + Send,
{
    fn handle(&mut self, command: &str) -> CommandResponse {
        self(command)
    }
}

/// Normalize raw terminal input; `None` for blank input.
pub fn normalize_command(input: &str) -> Option<&str> {
    let command = input.trim();
    (!command.is_empty()).then_some(command)
}
