use iced::{
    alignment,
    widget::{button, column, container, horizontal_rule, horizontal_space, row, text, Column, Space},
    Element, Length,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::{Answer, Source};

const SOURCE_PLACEHOLDER: &str = "Document source";
const EXCERPT_LINES: usize = 2;
const EXCERPT_COLUMNS: usize = 88;

#[derive(Debug, Clone, Copy)]
pub enum Message {
    Feedback { helpful: bool },
}

/// The feedback buttons are decorative; nothing is sent anywhere.
pub fn update(message: Message) {
    match message {
        Message::Feedback { helpful } => tracing::debug!(helpful, "answer feedback clicked"),
    }
}

/// One entry per line of the answer text, blank lines included.
pub fn paragraphs(answer: &str) -> Vec<&str> {
    answer.split('\n').map(|line| line.trim_end_matches('\r')).collect()
}

pub fn sources_heading(answer: &Answer) -> Option<String> {
    if answer.sources.is_empty() {
        None
    } else {
        Some(format!("Sources ({})", answer.sources.len()))
    }
}

pub fn source_title(source: &Source) -> &str {
    if source.title.trim().is_empty() {
        SOURCE_PLACEHOLDER
    } else {
        &source.title
    }
}

/// Word-wraps `text` to `width` display columns and keeps at most `max_lines`,
/// ending with an ellipsis when something was cut.
pub fn clamp_lines(text: &str, max_lines: usize, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let rest_width = rest.width();
            let current_width = current.width();
            let needed = if current.is_empty() {
                rest_width
            } else {
                current_width + 1 + rest_width
            };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(rest);
                rest = "";
            } else if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            } else {
                let (head, tail) = split_at_width(rest, width);
                lines.push(head.to_string());
                rest = tail;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if max_lines == 0 {
        return String::new();
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && last.width() + 1 > width {
                last.pop();
            }
            last.push('…');
        }
    }

    lines.join("\n")
}

fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, ch) in word.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && i > 0 {
            return word.split_at(i);
        }
        used += w;
    }
    (word, "")
}

pub fn view(answer: Option<&Answer>) -> Element<Message> {
    let Some(answer) = answer else {
        return Space::with_height(0).into();
    };

    let body = Column::with_children(
        paragraphs(&answer.answer)
            .into_iter()
            .map(|paragraph| text(paragraph).size(16).into()),
    )
    .spacing(8);

    let feedback = row![
        text("Was this response helpful?").size(13).style(text::secondary),
        horizontal_space(),
        button(text("👍 Yes").size(13))
            .on_press(Message::Feedback { helpful: true })
            .style(button::secondary),
        button(text("👎 No").size(13))
            .on_press(Message::Feedback { helpful: false })
            .style(button::secondary),
    ]
    .spacing(8)
    .align_y(alignment::Vertical::Center);

    let card = container(column![body, horizontal_rule(1), feedback].spacing(16))
        .padding(20)
        .width(Length::Fill)
        .style(container::rounded_box);

    let mut content = column![card].spacing(16);

    if let Some(heading) = sources_heading(answer) {
        let sources = Column::with_children(answer.sources.iter().map(source_card)).spacing(10);
        content = content.push(
            column![text(heading).size(14).style(text::secondary), sources].spacing(10),
        );
    }

    content.into()
}

fn source_card(source: &Source) -> Element<Message> {
    let mut details = column![
        text(source_title(source)).size(14),
        text(clamp_lines(&source.content, EXCERPT_LINES, EXCERPT_COLUMNS))
            .size(13)
            .style(text::secondary),
    ]
    .spacing(4);

    if !source.source.is_empty() {
        details = details.push(
            text(format!("🔗 {}", source.source))
                .size(12)
                .style(text::primary),
        );
    }

    container(row![text("📄").size(16), details].spacing(12))
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
