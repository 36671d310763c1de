//! Keyboard navigation over the result list

/// Navigation commands, produced from key presses while the dropdown is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    MoveDown,
    MoveUp,
    Commit,
    Dismiss,
}

/// Keys the component cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

impl NavCommand {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowDown => Some(NavCommand::MoveDown),
            Key::ArrowUp => Some(NavCommand::MoveUp),
            Key::Enter => Some(NavCommand::Commit),
            Key::Escape => Some(NavCommand::Dismiss),
            Key::Other => None,
        }
    }
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Navigation is closed; the command had no effect
    Ignored,
    /// The highlight moved (or stayed at a boundary)
    Moved,
    /// The result at this index was committed; navigation is now closed
    Commit(usize),
    /// Enter without a highlighted result
    NothingToCommit,
    /// Escape closed the dropdown
    Dismissed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Closed,
    Open,
}

/// Highlight tracking for the dropdown
///
/// While closed, the last highlight is kept in memory but never reported:
/// reopening always starts with no highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    phase: Phase,
    highlight: Option<usize>,
}

impl Navigation {
    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    /// Highlighted result, `None` when closed or nothing is highlighted
    pub fn highlighted(&self) -> Option<usize> {
        match self.phase {
            Phase::Open => self.highlight,
            Phase::Closed => None,
        }
    }

    pub fn open(&mut self) {
        if self.phase == Phase::Closed {
            self.highlight = None;
        }
        self.phase = Phase::Open;
    }

    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    /// Forget the highlight; called whenever the result set is recomputed
    pub fn reset(&mut self) {
        self.highlight = None;
    }

    pub fn apply(&mut self, command: NavCommand, result_count: usize) -> Transition {
        if self.phase == Phase::Closed {
            return Transition::Ignored;
        }

        match command {
            NavCommand::MoveDown => {
                if result_count > 0 {
                    let next = self.highlight.map_or(0, |i| i + 1);
                    self.highlight = Some(next.min(result_count - 1));
                }
                Transition::Moved
            }
            NavCommand::MoveUp => {
                if result_count > 0 {
                    let prev = self.highlight.map_or(0, |i| i.saturating_sub(1));
                    self.highlight = Some(prev.min(result_count - 1));
                }
                Transition::Moved
            }
            NavCommand::Commit => match self.highlight {
                Some(index) if index < result_count => {
                    self.phase = Phase::Closed;
                    self.highlight = None;
                    Transition::Commit(index)
                }
                _ => Transition::NothingToCommit,
            },
            NavCommand::Dismiss => {
                self.phase = Phase::Closed;
                Transition::Dismissed
            }
        }
    }
}
