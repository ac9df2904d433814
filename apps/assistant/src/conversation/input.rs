/// The confirm key, with or without a modifier held (Shift+Enter vs Enter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKey {
    Plain,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Submit the draft as it stands. The draft is cleared only if the
    /// submission is accepted.
    Submit(String),
    LineBreak,
}

/// Text being composed but not yet sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    /// Set once the current text was offered for submission. Text typed
    /// after that starts on a new line.
    offered: bool,
}

impl Draft {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.offered && !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.offered = false;
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.offered = false;
    }

    pub fn confirm(&mut self, key: ConfirmKey) -> ConfirmAction {
        match key {
            ConfirmKey::Plain => {
                self.offered = true;
                ConfirmAction::Submit(self.text.clone())
            }
            ConfirmKey::Modified => {
                self.text.push('\n');
                ConfirmAction::LineBreak
            }
        }
    }
}

/// Slash commands understood by the terminal view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Retry,
    /// `/N`, one-based.
    Shortcut(usize),
    Unknown(String),
}

/// Recognises a command line. Any line whose first non-blank character is
/// `/` is a command, whatever is already in the draft.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let name = line.strip_prefix('/')?;
    Some(match name {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "retry" => Command::Retry,
        _ => match name.parse::<usize>() {
            Ok(number) => Command::Shortcut(number),
            Err(_) => Command::Unknown(line.to_string()),
        },
    })
}

/// Maps one terminal line to its text and confirm key. A trailing backslash
/// stands in for the modified confirm key.
pub fn split_terminal_line(line: &str) -> (&str, ConfirmKey) {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    match line.strip_suffix('\\') {
        Some(text) => (text, ConfirmKey::Modified),
        None => (line, ConfirmKey::Plain),
    }
}
