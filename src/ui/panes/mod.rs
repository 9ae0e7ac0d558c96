//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI.
//!
//! # Pane Modules
//!
//! - [`source`]: Lua source with syntax highlighting, current line and error markers
//! - [`tree`]: Outline of the syntax tree
//! - [`tokens`]: The token stream with kinds and positions
//! - [`diagnostics`]: Everything the parser recorded, in order
//! - [`status`]: Status bar with keybindings and a parse summary
//! - `utils`: Shared pane block and selection helpers
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*` function. List panes take a
//! [`ListScroll`] owned by the app and adjust its offset so the selection
//! stays in view.

mod utils;

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod tokens;
pub mod tree;

// Re-export render functions for convenience
pub use diagnostics::render_diagnostics_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::render_tokens_pane;
pub use tree::render_tree_pane;
pub use utils::ListScroll;
