//! Line commands typed by the user.

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cursor toward the root
    Up,
    /// Cursor toward the leaf
    Down,
    /// Previous sibling
    Left,
    /// Next sibling
    Right,
    /// Start a reply to the cursor message
    Reply,
    /// Abandon the reply being composed
    Cancel,
    /// Forget outstanding queries and ask again
    Sync,
    Help,
    Quit,
    /// Reply body (only while composing)
    Text(String),
    Unknown(String),
}

impl Command {
    /// Parse `line`. While `replying`, anything that is not a `:` command is
    /// the reply body.
    pub fn parse(line: &str, replying: bool) -> Self {
        let line = line.trim();
        match line {
            ":q" | ":quit" => return Command::Quit,
            ":cancel" => return Command::Cancel,
            ":sync" => return Command::Sync,
            ":help" | ":h" => return Command::Help,
            _ => {}
        }
        if replying {
            return Command::Text(line.to_string());
        }
        match line {
            "k" | "up" => Command::Up,
            "j" | "down" => Command::Down,
            "h" | "left" => Command::Left,
            "l" | "right" => Command::Right,
            "r" | "reply" => Command::Reply,
            "q" | "quit" => Command::Quit,
            "?" | "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }
}
