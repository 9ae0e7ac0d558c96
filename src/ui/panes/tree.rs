//! Syntax tree outline pane

use super::utils::{pane_block, visible_height, ListScroll};
use crate::parser::outline::OutlineRow;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Labels of rows that group children rather than name a node
const GROUP_LABELS: [&str; 14] = [
    "Condition",
    "Then",
    "ElseIf",
    "Else",
    "Body",
    "Until",
    "Init",
    "Limit",
    "Step",
    "In",
    "Args",
    "Key",
    "Value",
    "Program",
];

fn label_spans(label: &str) -> Vec<Span<'static>> {
    let (kind, rest) = label.split_once(' ').unwrap_or((label, ""));

    let kind_style = if kind.starts_with("Error") {
        Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD)
    } else if GROUP_LABELS.contains(&kind) {
        Style::default().fg(DEFAULT_THEME.group)
    } else {
        Style::default().fg(DEFAULT_THEME.node_kind)
    };

    let mut spans = vec![Span::styled(kind.to_string(), kind_style)];
    if !rest.is_empty() {
        spans.push(Span::styled(
            format!(" {}", rest),
            Style::default().fg(DEFAULT_THEME.fg),
        ));
    }
    spans
}

/// Render the outline of the parsed program
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[OutlineRow],
    is_focused: bool,
    scroll: &mut ListScroll,
) {
    let block = pane_block(" Syntax Tree ", is_focused);
    let height = visible_height(area);
    scroll.fit(height, rows.len());

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(height)
        .map(|(idx, row)| {
            let mut spans = vec![Span::styled(
                row.prefix.clone(),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            spans.extend(label_spans(&row.label));
            spans.push(Span::styled(
                format!("  {}", row.location),
                Style::default().fg(DEFAULT_THEME.comment),
            ));

            let mut line = Line::from(spans);
            if idx == scroll.selected {
                line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
