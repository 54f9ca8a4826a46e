/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    /// Delete the current thread's history and summary
    Reset,
    /// List known thread ids
    Threads,
    /// Continue on another thread
    Switch(String),
    /// Show the current thread's summary and messages
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("reset", _) => Self::Reset,
            ("threads", _) => Self::Threads,
            ("show", _) => Self::Show,
            ("help", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            ("thread", id) if !id.is_empty() => Self::Switch(id.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type a question to ask it on the current thread.
  /thread <id>  switch to another thread
  /threads      list threads
  /show         print the current thread
  /reset        forget the current thread
  /quit         exit
Ctrl-C cancels a running answer.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions() {
        assert_eq!(
            Command::parse("  Who is the mayor?  "),
            Command::Ask("Who is the mayor?".to_string())
        );
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/reset"), Command::Reset);
        assert_eq!(Command::parse("/threads"), Command::Threads);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/thread  kato "), Command::Switch("kato".to_string()));
        assert_eq!(Command::parse("/thread"), Command::Unknown("/thread".to_string()));
        assert_eq!(Command::parse("/frobnicate"), Command::Unknown("/frobnicate".to_string()));
    }
}
