#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::ConversationTurn;
use crate::domain::models::Role;
use crate::domain::models::TurnStatus;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

/// Unicode border plus inner padding, and the gap kept towards the far edge.
const BUBBLE_PADDING: usize = 8;
/// Left border + left padding + (text, not counted) + right padding + right
/// border.
const BORDER_ELEMENTS_LENGTH: usize = 5;
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

fn width(text: &str) -> usize {
    return text.chars().count();
}

fn fill(total: usize, used: usize) -> String {
    return " ".repeat(total.saturating_sub(used));
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    turn: &'a ConversationTurn,
    window_max_width: usize,
}

impl<'a> Bubble<'a> {
    pub fn new(turn: &'a ConversationTurn, window_max_width: usize) -> Bubble<'a> {
        let mut alignment = BubbleAlignment::Left;
        if turn.role == Role::User {
            alignment = BubbleAlignment::Right;
        }

        return Bubble {
            alignment,
            turn,
            window_max_width,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let body = self.body();
        let max_line_length = self.get_max_line_length(&body);

        let lines = body
            .iter()
            .flat_map(|(text, style)| {
                return self.wrap(text, *style, max_line_length);
            })
            .collect();

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    /// Text rows before wrapping. Citations are only listed under answers
    /// that resolved with at least one source.
    fn body(&self) -> Vec<(String, Style)> {
        if self.turn.is_pending() {
            return vec![(
                "Thinking...".to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )];
        }

        let mut text_style = Style::default();
        if self.turn.status == TurnStatus::Errored {
            text_style = text_style.fg(Color::Red);
        }

        let mut body: Vec<(String, Style)> = self
            .turn
            .text
            .lines()
            .map(|line| return (line.to_string(), text_style))
            .collect();
        if body.is_empty() {
            body.push(("".to_string(), text_style));
        }

        if self.turn.status == TurnStatus::Resolved && !self.turn.sources.is_empty() {
            let source_style = Style::default().fg(Color::DarkGray);
            body.push(("".to_string(), source_style));
            body.push((
                "Sources:".to_string(),
                source_style.add_modifier(Modifier::BOLD),
            ));
            for citation in &self.turn.sources {
                body.push((format!("- {}", citation.label()), source_style));
            }
        }

        return body;
    }

    fn wrap(&self, text: &str, style: Style, max_line_length: usize) -> Vec<Line<'static>> {
        let mut lines = vec![];
        let mut word_set: Vec<&str> = vec![];
        let mut line_char_count = 0;

        for word in text.split(' ') {
            if line_char_count > 0 && width(word) + line_char_count > max_line_length {
                lines.push(self.text_line(word_set.join(" "), style, max_line_length));
                word_set = vec![];
                line_char_count = 0;
            }

            word_set.push(word);
            line_char_count += width(word) + 1;
        }

        lines.push(self.text_line(word_set.join(" "), style, max_line_length));
        return lines;
    }

    fn text_line(&self, text: String, style: Style, max_line_length: usize) -> Line<'static> {
        let text_width = width(&text);
        let inner_fill = fill(max_line_length, text_width);
        let formatted_line_length = text_width + inner_fill.len() + BUBBLE_PADDING;
        let outer_fill = fill(self.window_max_width, formatted_line_length);

        let bubble_spans = vec![
            self.border_span("│ ".to_string()),
            Span::styled(text, style),
            self.border_span(format!("{inner_fill} │")),
        ];

        if self.alignment == BubbleAlignment::Left {
            let mut spans = bubble_spans;
            spans.push(Span::from(outer_fill));
            return Line::from(spans);
        }

        let mut spans = vec![Span::from(outer_fill)];
        spans.extend(bubble_spans);
        return Line::from(spans);
    }

    fn get_max_line_length(&self, body: &[(String, Style)]) -> usize {
        // Keep a minimum 4% of padding on the side.
        let min_bubble_padding_length =
            (self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil() as usize;
        let line_border_width = BORDER_ELEMENTS_LENGTH + min_bubble_padding_length;

        let max_line_length = body
            .iter()
            .map(|(text, _)| return width(text))
            .max()
            .unwrap_or(0)
            .min(self.window_max_width.saturating_sub(line_border_width));

        return max_line_length.max(width(&self.turn.role.to_string()));
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.turn.role.to_string();
        // Add 2 for the padding around the text.
        let title_bar = "─".repeat(max_line_length + 2 - width(&title));
        let top_bar = format!("╭{title}{title_bar}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let outer_fill = fill(self.window_max_width, max_line_length + BUBBLE_PADDING);

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.border_line(format!("{top_bar}{outer_fill}")));
            res.extend(lines);
            res.push(self.border_line(format!("{bottom_bar}{outer_fill}")));
        } else {
            res.push(self.border_line(format!("{outer_fill}{top_bar}")));
            res.extend(lines);
            res.push(self.border_line(format!("{outer_fill}{bottom_bar}")));
        }

        return res;
    }

    fn border_span(&self, text: String) -> Span<'static> {
        if self.turn.status == TurnStatus::Errored {
            return Span::styled(text, Style::default().fg(Color::Red));
        }

        if self.turn.role == Role::Assistant {
            return Span::styled(text, Style::default().fg(Color::Rgb(70, 130, 180)));
        }

        return Span::from(text);
    }

    fn border_line(&self, text: String) -> Line<'static> {
        return Line::from(self.border_span(text));
    }
}
