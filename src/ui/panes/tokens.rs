//! Token stream pane rendering

use super::utils::{pane_block, visible_height, ListScroll};
use crate::parser::lexer::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

fn text_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Illegal => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
        TokenKind::String => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::Int | TokenKind::Float => Style::default().fg(DEFAULT_THEME.number),
        k if k.is_keyword() => Style::default().fg(DEFAULT_THEME.keyword),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the token list, one token per row: `line:col  KIND  text`
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll: &mut ListScroll,
) {
    let block = pane_block(" Tokens ", is_focused);
    let height = visible_height(area);
    scroll.fit(height, tokens.len());

    let items: Vec<ListItem> = tokens
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(height)
        .map(|(idx, token)| {
            let text = match token.kind {
                TokenKind::String => format!("{:?}", token.text),
                _ => token.text.clone(),
            };
            let mut line = Line::from(vec![
                Span::styled(
                    format!("{:>8}  ", token.location.to_string()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("{:<8} ", token.kind.as_str()),
                    Style::default().fg(DEFAULT_THEME.node_kind),
                ),
                Span::styled(text, text_style(token.kind)),
            ]);
            if idx == scroll.selected {
                line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
