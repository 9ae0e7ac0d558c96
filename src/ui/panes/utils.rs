//! Shared helpers for pane rendering
//!
//! - **Pane Blocks**: Bordered block with focus-dependent border style
//! - **Selection**: [`ListScroll`] tracks a selected row and keeps it in view

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block titled `title`, highlighted when focused
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least 1
pub(super) fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Selected row and scroll offset of a list pane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListScroll {
    pub selected: usize,
    pub offset: usize,
}

impl ListScroll {
    pub fn up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn down(&mut self, n: usize, len: usize) {
        self.selected = self.selected.saturating_add(n).min(len.saturating_sub(1));
    }

    pub fn home(&mut self) {
        self.selected = 0;
    }

    pub fn end(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Clamp the selection to `len` and move the offset so the selection
    /// lies within `height` visible rows.
    pub fn fit(&mut self, height: usize, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));

        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }

        if len > height {
            self.offset = self.offset.min(len - height);
        } else {
            self.offset = 0;
        }
    }
}
