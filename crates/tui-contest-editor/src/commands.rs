//! Terminal commands understood by the demo.

use contest_editor_core::CommandResponse;

/// Commands handled by [`crate::app::App`] before the handler sees them.
pub const SUBMIT_COMMAND: &str = "submit";
/// Empties the transcript without echoing.
pub const CLEAR_COMMAND: &str = "clear";

/// Build the handler for everything that is not `submit` or `clear`.
pub fn demo_commands(filenames: Vec<String>) -> impl FnMut(&str) -> CommandResponse + Send {
    let mut executed = 0usize;
    move |command: &str| {
        executed += 1;
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));
        match name {
            "help" => CommandResponse::Lines(vec![
                "help          show this list".to_string(),
                "files         list the contest files".to_string(),
                "echo <text>   print text".to_string(),
                "history       number of commands run".to_string(),
                "submit        submit the current files".to_string(),
                "clear         clear the terminal".to_string(),
            ]),
            "files" => CommandResponse::Lines(filenames.clone()),
            "echo" => CommandResponse::Line(rest.to_string()),
            "history" => CommandResponse::Line(format!("{executed} commands")),
            SUBMIT_COMMAND => CommandResponse::None,
            other => CommandResponse::Line(format!("command not found: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contest_editor_core::CommandHandler;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_commands() {
        let mut handler = demo_commands(vec!["main.cpp".into(), "solution.h".into()]);
        assert_eq!(
            handler.handle("files"),
            CommandResponse::Lines(vec!["main.cpp".into(), "solution.h".into()])
        );
        assert_eq!(
            handler.handle("echo  hello world"),
            CommandResponse::Line("hello world".into())
        );
        assert_eq!(handler.handle("submit"), CommandResponse::None);
        assert_eq!(
            handler.handle("make"),
            CommandResponse::Line("command not found: make".into())
        );
        assert_eq!(handler.handle("history"), CommandResponse::Line("5 commands".into()));
    }
}
