//! # Design State
//!
//! Visual options for the rendered symbol and the undo engine over them.
//!
//! | Type | Role |
//! |------|------|
//! | [`DesignOptions`] | live options (colors, gradient, shapes, size, logo, label) |
//! | [`DesignSnapshot`] | style-only copy used for undo and persistence |
//! | [`UndoHistory`] | bounded snapshot stack (20 entries) |
//! | [`DesignState`] | options + history with `snapshot` / `undo` / `reset` |

pub mod history;
pub mod options;
pub mod state;

pub use history::{UNDO_LIMIT, UndoHistory};
pub use options::{
    CornerDotStyle, CornerSquareStyle, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_SIZE,
    DesignOptions, DesignSnapshot, DotStyle, ErrorCorrection,
};
pub use state::DesignState;
