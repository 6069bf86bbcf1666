#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::prelude::Line;
use ratatui::prelude::Span;
use ratatui::prelude::Style;
use ratatui::style::Color;
use ratatui::style::Modifier;

use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;

/// Lays the transcript out as styled terminal lines: a label line per
/// message, the word-wrapped body, and a blank spacer between messages.
pub struct Transcript {}

impl Transcript {
    pub fn lines(messages: &[Message], width: u16) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = vec![];

        for message in messages {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            style = match message.role {
                Role::User => style.fg(Color::Cyan),
                Role::Assistant => style.fg(Color::Green),
            };
            if message.message_type() == MessageType::Error {
                style = style.fg(Color::Red);
            }

            lines.push(Line::from(Span::styled(message.role.to_string(), style)));

            for text_line in message.as_string_lines(width.into()) {
                if message.message_type() == MessageType::Error {
                    lines.push(Line::from(Span::styled(
                        text_line,
                        Style::default().fg(Color::Red),
                    )));
                } else {
                    lines.push(Line::from(text_line));
                }
            }

            lines.push(Line::from(""));
        }

        return lines;
    }

    pub fn line_count(messages: &[Message], width: u16) -> usize {
        return Transcript::lines(messages, width).len();
    }
}
