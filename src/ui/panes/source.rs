//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the Lua script
//! with basic syntax highlighting and diagnostic markers.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, constants, strings, numbers, and comments
//! - Current line highlighting, following the selection of the focused pane
//! - Line numbers marked in the error color where diagnostics were recorded
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character scan to apply syntax
//! highlighting styles instead of re-running the lexer per line.

use super::utils::{pane_block, visible_height};
use crate::parser::lexer::TokenKind;
use crate::parser::token::lookup_keyword;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rustc_hash::FxHashMap;

/// Simple syntax highlighting for one line of Lua
fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Handle comments
        if c == '-' && chars.get(i + 1) == Some(&'-') {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings
        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        let is_decimal_point =
            c == '.' && starts_number(&current_word) && !current_word.contains('.');
        if !c.is_alphanumeric() && c != '_' && !is_decimal_point {
            flush_word(&mut spans, &mut current_word, c == '(' || c == '"' || c == '{');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn starts_number(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit())
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_call: bool) {
    if word.is_empty() {
        return;
    }
    let style = get_word_style(word, is_call);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn get_word_style(word: &str, is_call: bool) -> Style {
    match lookup_keyword(word) {
        Some(TokenKind::True | TokenKind::False | TokenKind::Nil) => {
            Style::default().fg(DEFAULT_THEME.number) // Constants
        }
        Some(_) => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        None if starts_number(word) => Style::default().fg(DEFAULT_THEME.number),
        None if is_call => Style::default().fg(DEFAULT_THEME.function),
        None => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source code pane
///
/// `current_line` is 1-based; the view is scrolled so it sits near the
/// middle of the pane.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    diagnostics_by_line: &FxHashMap<usize, Vec<usize>>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Source ", is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let height = visible_height(area);

    if current_line > 0 && current_line <= total_lines {
        *scroll_offset = (current_line - 1).saturating_sub(height / 2);
    }
    if total_lines > height {
        *scroll_offset = (*scroll_offset).min(total_lines - height);
    } else {
        *scroll_offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let has_error = diagnostics_by_line.contains_key(&line_num);

            let marker = if has_error { '!' } else { ' ' };
            let num_style = if has_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                let current = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4}{} ", line_num, marker), num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_texts(line: &str) -> Vec<String> {
        highlight_source_code(line)
            .spans
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect()
    }

    #[test]
    fn test_comment_takes_rest_of_line() {
        let spans = span_texts("x = 1 -- größe");
        assert_eq!(spans.last().map(String::as_str), Some("-- größe"));
    }

    #[test]
    fn test_strings_and_floats_stay_whole() {
        let spans = span_texts("s = 'a b' .. 3.25");
        assert!(spans.contains(&"'a b'".to_string()));
        assert!(spans.contains(&"3.25".to_string()));
    }

    #[test]
    fn test_keyword_styles() {
        assert_eq!(
            get_word_style("local", false).fg,
            Some(DEFAULT_THEME.keyword)
        );
        assert_eq!(get_word_style("nil", false).fg, Some(DEFAULT_THEME.number));
        assert_eq!(get_word_style("print", true).fg, Some(DEFAULT_THEME.function));
        assert_eq!(get_word_style("x", false).fg, Some(DEFAULT_THEME.fg));
    }
}
