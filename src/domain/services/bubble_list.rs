#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use crate::domain::models::ConversationTurn;
use crate::domain::models::TurnStatus;

struct BubbleCacheEntry {
    status: TurnStatus,
    lines: Vec<Line<'static>>,
}

/// Rendered transcript. A turn is only re-rendered when its status changes
/// or the window is resized.
#[derive(Default)]
pub struct BubbleList {
    cache: HashMap<u64, BubbleCacheEntry>,
    order: Vec<u64>,
    line_width: usize,
    lines_len: usize,
}

impl BubbleList {
    pub fn set_turns(&mut self, turns: &[ConversationTurn], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = turns.iter().map(|turn| return turn.id).collect();
        self.lines_len = turns
            .iter()
            .map(|turn| {
                if let Some(entry) = self.cache.get(&turn.id) {
                    if entry.status == turn.status {
                        return entry.lines.len();
                    }
                }

                let lines = Bubble::new(turn, line_width).as_lines();
                let lines_len = lines.len();
                self.cache.insert(
                    turn.id,
                    BubbleCacheEntry {
                        status: turn.status,
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let lines: Vec<Line> = self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
