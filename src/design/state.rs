//! Live design state and its undo engine.

use tracing::debug;

use super::history::UndoHistory;
use super::options::{DesignOptions, DesignSnapshot};

/// Live design options plus the undo history over their style fields.
///
/// Style edits go through [`DesignState::options_mut`]. Before any
/// destructive or outward action the caller takes a [`snapshot`]; [`undo`]
/// restores the latest one. The logo is never captured or restored, so undo
/// only rolls back style experiments.
///
/// [`snapshot`]: DesignState::snapshot
/// [`undo`]: DesignState::undo
#[derive(Debug, Clone, Default)]
pub struct DesignState {
    options: DesignOptions,
    history: UndoHistory,
}

impl DesignState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options with empty history.
    pub fn with_options(options: DesignOptions) -> Self {
        Self {
            options,
            history: UndoHistory::new(),
        }
    }

    pub fn options(&self) -> &DesignOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DesignOptions {
        &mut self.options
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn set_logo(&mut self, logo: impl Into<String>) {
        self.options.logo = Some(logo.into());
    }

    pub fn clear_logo(&mut self) {
        self.options.logo = None;
    }

    /// Push a copy of the current style fields onto the history.
    pub fn snapshot(&mut self) {
        let evicted = self.history.push(DesignSnapshot::capture(&self.options));
        debug!(
            depth = self.history.len(),
            evicted = evicted.is_some(),
            "design snapshot taken"
        );
    }

    /// Restore the most recent snapshot.
    ///
    /// Returns `false` (and changes nothing) when the history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                snapshot.apply_to(&mut self.options);
                debug!(depth = self.history.len(), "design undo applied");
                true
            }
            None => false,
        }
    }

    /// Reset every option to its default, drop the logo and the history.
    pub fn reset(&mut self) {
        self.options = DesignOptions::default();
        self.history.clear();
        debug!("design state reset");
    }
}
