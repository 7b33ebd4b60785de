//! Navigation history: a bounded stack of [`ScreenCreator`]s.
//!
//! The top of the stack is the current screen. Opening a screen pushes
//! immediately; closing is only requested here and carried out by the
//! screen loop on its next tick, after the current body had a chance to
//! veto it.

use heapless::Vec;

use crate::{config::SCREEN_STACK_DEPTH, error::GuiError, screen_factory::ScreenCreator};

// Current screen plus the history below it.
const STACK_CAPACITY: usize = SCREEN_STACK_DEPTH + 1;

/// A close request waiting for the next loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingClose {
    /// Back to the previous screen.
    One,
    /// Back to the bottom of the history.
    All,
}

/// Navigation stack bounded at [`SCREEN_STACK_DEPTH`] previous screens.
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<ScreenCreator, STACK_CAPACITY>,
    pending: Option<PendingClose>,
}

impl Navigator {
    /// Navigator whose only entry is `home`.
    pub fn new(home: ScreenCreator) -> Self {
        let mut stack = Vec::new();
        // This push always succeeds: the stack starts empty.
        stack.push(home).ok();
        Navigator { stack, pending: None }
    }

    /// Return the screen currently at the top of the stack.
    #[must_use]
    pub fn current(&self) -> Option<ScreenCreator> {
        self.stack.last().copied()
    }

    /// Make `creator` the current screen, remembering the old one.
    ///
    /// A full history is a fatal configuration error rather than a silent
    /// no-op: dropping a screen here would desynchronise FSM-driven screens.
    pub fn open(&mut self, creator: ScreenCreator) -> Result<(), GuiError> {
        self.stack.push(creator).map_err(|_| {
            gui_error!("screen stack overflow opening {}", creator.name());
            GuiError::StackOverflow
        })
    }

    /// Insert `creator` just below the current screen, so closing the
    /// current one lands on it.
    pub fn push_before_current(&mut self, creator: ScreenCreator) -> Result<(), GuiError> {
        let at = self.stack.len().saturating_sub(1);
        self.stack.insert(at, creator).map_err(|_| GuiError::StackOverflow)
    }

    /// Remove the topmost entry equal to `creator`, wherever it is.
    ///
    /// Used when the printer ends the operation a screen was opened for.
    /// The bottom entry is never removed.
    pub fn remove(&mut self, creator: ScreenCreator) -> bool {
        match self.stack.iter().rposition(|c| *c == creator) {
            Some(pos) if pos > 0 => {
                self.stack.remove(pos);
                true
            }
            _ => false,
        }
    }

    /// Request going back one screen.
    pub fn close(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(PendingClose::One);
        }
    }

    /// Request going back to the first screen.
    pub fn close_all(&mut self) {
        self.pending = Some(PendingClose::All);
    }

    /// Drop a pending close request. Returns whether there was one.
    pub fn consume_close(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending_close(&self) -> Option<PendingClose> {
        self.pending
    }

    /// `true` when there is a screen to go back to.
    pub fn can_close(&self) -> bool {
        self.stack.len() > 1
    }

    /// Carry out the pending close. The bottom screen is never removed.
    pub(crate) fn apply_pending_close(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let keep = match pending {
            PendingClose::One => self.stack.len().saturating_sub(1).max(1),
            PendingClose::All => 1,
        };
        let changed = self.stack.len() > keep;
        self.stack.truncate(keep);
        changed
    }

    /// Return the number of entries currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Entries bottom to top; the last one is current.
    pub fn history(&self) -> &[ScreenCreator] {
        &self.stack
    }
}
