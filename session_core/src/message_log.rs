//! The in-game message log.

use game_rules::Color;
use serde::{Deserialize, Serialize};

use crate::render::Console;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: Color,
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            count: 1,
        }
    }

    /// Text with a repeat counter when the message was stacked.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, stacking it onto the previous one if identical.
    pub fn add_message(&mut self, text: impl Into<String>, color: Color) {
        self.add(text, color, true);
    }

    pub fn add(&mut self, text: impl Into<String>, color: Color, stack: bool) {
        let text = text.into();
        if stack {
            if let Some(last) = self.messages.last_mut() {
                if last.text == text {
                    last.count += 1;
                    return;
                }
            }
        }
        self.messages.push(Message::new(text, color));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.text == text)
    }

    /// Draw the newest messages bottom-up inside the given panel.
    pub fn render(&self, console: &mut dyn Console, x: i32, y: i32, width: i32, height: i32) {
        let mut y_offset = height - 1;
        for message in self.messages.iter().rev() {
            for line in wrap(&message.full_text(), width).iter().rev() {
                if y_offset < 0 {
                    return;
                }
                console.print(x, y + y_offset, line, message.color);
                y_offset -= 1;
            }
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: i32) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !word.is_empty() {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&word);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextConsole;
    use game_rules::colors;

    #[test]
    fn test_stacking() {
        let mut log = MessageLog::new();
        log.add_message("That way is blocked.", colors::IMPOSSIBLE);
        log.add_message("That way is blocked.", colors::IMPOSSIBLE);
        log.add("That way is blocked.", colors::IMPOSSIBLE, false);

        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[0].full_text(), "That way is blocked. (x2)");
        assert_eq!(log.last().unwrap().full_text(), "That way is blocked.");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(wrap("", 5).is_empty());
    }

    #[test]
    fn test_render_newest_at_bottom() {
        let mut log = MessageLog::new();
        log.add_message("first", colors::WHITE);
        log.add_message("second", colors::WHITE);
        log.add_message("third", colors::WHITE);

        let mut console = TextConsole::new(10, 2);
        log.render(&mut console, 0, 0, 10, 2);
        assert_eq!(console.row_text(0), "second");
        assert_eq!(console.row_text(1), "third");
    }
}
