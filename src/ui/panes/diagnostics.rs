//! Diagnostics pane rendering

use super::utils::{pane_block, visible_height, ListScroll};
use crate::parser::errors::Diagnostic;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render recorded diagnostics in the order they were found
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[Diagnostic],
    is_focused: bool,
    scroll: &mut ListScroll,
) {
    let title = format!(" Diagnostics ({}) ", diagnostics.len());
    let block = pane_block(&title, is_focused);

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("(no diagnostics)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let height = visible_height(area);
    scroll.fit(height, diagnostics.len());

    let items: Vec<ListItem> = diagnostics
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(height)
        .map(|(idx, diagnostic)| {
            let mut line = Line::from(vec![
                Span::styled(
                    format!("{:>6}  ", diagnostic.location.to_string()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    diagnostic.message.clone(),
                    Style::default().fg(DEFAULT_THEME.error),
                ),
            ]);
            if idx == scroll.selected {
                line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
