use iced::{
    widget::{button, row, text, text_input, text_input::Id},
    Element, Length, Task,
};

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Submit,
}

/// Emitted to the parent, which owns the loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Search(String),
}

pub struct SearchBox {
    query: String,
    input_id: Id,
}

impl SearchBox {
    pub fn new() -> Self {
        SearchBox {
            query: String::new(),
            input_id: Id::unique(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn focus<T: Send + 'static>(&self) -> Task<T> {
        text_input::focus(self.input_id.clone())
    }

    fn can_submit(&self, busy: bool) -> bool {
        !busy && !self.query.trim().is_empty()
    }

    pub fn update(&mut self, message: Message, busy: bool) -> Option<Event> {
        match message {
            Message::InputChanged(value) => {
                self.query = value;
                None
            }
            Message::Submit => {
                if !self.can_submit(busy) {
                    return None;
                }
                Some(Event::Search(self.query.trim().to_string()))
            }
        }
    }

    pub fn view(&self, loading: bool) -> Element<Message> {
        let mut input = text_input("Ask about your documents...", self.query())
            .padding(15)
            .size(18)
            .width(Length::Fill)
            .id(self.input_id.clone());

        if !loading {
            input = input.on_input(Message::InputChanged).on_submit(Message::Submit);
        }

        let label = if loading { "⠋ Thinking" } else { "Ask" };
        let submit = button(text(label).size(16))
            .padding(15)
            .on_press_maybe(self.can_submit(loading).then_some(Message::Submit));

        row![text("🔍").size(18), input, submit]
            .spacing(10)
            .align_y(iced::alignment::Vertical::Center)
            .into()
    }
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(query: &str) -> SearchBox {
        let mut search = SearchBox::new();
        search.update(Message::InputChanged(query.to_string()), false);
        search
    }

    #[test]
    fn test_submit_emits_trimmed_query_once() {
        let mut search = typed("   What is tokenization?  ");
        assert_eq!(
            search.update(Message::Submit, false),
            Some(Event::Search("What is tokenization?".to_string()))
        );
    }

    #[test]
    fn test_blank_query_emits_nothing() {
        for query in ["", "   ", "\t\n "] {
            let mut search = typed(query);
            assert_eq!(search.update(Message::Submit, false), None, "{:?}", query);
        }
    }

    #[test]
    fn test_busy_search_emits_nothing() {
        let mut search = typed("chunking");
        assert_eq!(search.update(Message::Submit, true), None);
    }

    #[test]
    fn test_submit_keeps_query_text() {
        let mut search = typed("embeddings");
        search.update(Message::Submit, false);
        assert_eq!(search.query(), "embeddings");
    }
}
