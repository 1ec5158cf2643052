use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use iced::{
    widget::{button, column, container, scrollable, text, Column},
    Element, Length, Task,
};
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::types::Question;

const LOAD_FAILED: &str = "Failed to load history. Please try again.";
const CLEAR_FAILED: &str = "Failed to clear history.";
const UNKNOWN_DATE: &str = "Unknown date";
const UNKNOWN_TIME: &str = "Unknown time";

#[derive(Debug, Clone)]
pub enum Message {
    /// A fetch result tagged with the generation it was started in.
    Loaded(u64, Result<Vec<Question>, String>),
    Select(String),
    Clear,
    Cleared(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Requery(String),
    Cleared,
    ClearFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub label: String,
    pub entries: Vec<Question>,
}

/// Reads a backend timestamp as a moment in `tz`. Offset-less timestamps are
/// taken to already be in `tz`.
pub fn parse_timestamp<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.with_timezone(tz));
    }
    let naive = timestamp
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    tz.from_local_datetime(&naive).earliest()
}

pub fn day_label<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    parse_timestamp(timestamp, tz)
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn time_label<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    parse_timestamp(timestamp, tz)
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

/// Partitions questions by calendar day. Groups keep first-seen order and
/// entries keep their arrival order.
pub fn group_by_day_in<Tz: TimeZone>(entries: &[Question], tz: &Tz) -> Vec<DayGroup>
where
    Tz::Offset: std::fmt::Display,
{
    let mut groups: Vec<DayGroup> = Vec::new();
    for question in entries {
        let label = day_label(&question.timestamp, tz);
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.entries.push(question.clone()),
            None => groups.push(DayGroup {
                label,
                entries: vec![question.clone()],
            }),
        }
    }
    groups
}

pub fn group_by_day(entries: &[Question]) -> Vec<DayGroup> {
    group_by_day_in(entries, &Local)
}

pub struct HistoryPanel {
    state: LoadState,
    entries: Vec<Question>,
    /// Entries removed optimistically while a clear request is in flight.
    pending_clear: Option<Vec<Question>>,
    notice: Option<String>,
    /// Bumped by every clear; fetches started earlier are dropped on arrival.
    generation: u64,
}

impl HistoryPanel {
    pub fn new() -> Self {
        HistoryPanel {
            state: LoadState::Loading,
            entries: Vec::new(),
            pending_clear: None,
            notice: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn entries(&self) -> &[Question] {
        &self.entries
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_clearing(&self) -> bool {
        self.pending_clear.is_some()
    }

    pub fn groups(&self) -> Vec<DayGroup> {
        match self.state {
            LoadState::Loaded => group_by_day(&self.entries),
            LoadState::Loading | LoadState::Failed(_) => Vec::new(),
        }
    }

    pub fn load(&mut self, api: &ApiClient) -> Task<Message> {
        self.state = LoadState::Loading;
        self.fetch(api)
    }

    /// Re-fetches without flipping back to the loading placeholder.
    pub fn refresh(&self, api: &ApiClient) -> Task<Message> {
        self.fetch(api)
    }

    fn fetch(&self, api: &ApiClient) -> Task<Message> {
        let api = api.clone();
        let generation = self.generation;
        Task::perform(
            async move { api.get_history().await.map_err(|e| e.to_string()) },
            move |result| Message::Loaded(generation, result),
        )
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> (Task<Message>, Option<Event>) {
        match message {
            Message::Loaded(generation, _) if generation != self.generation => {
                debug!(generation, current = self.generation, "dropping stale history fetch");
                (Task::none(), None)
            }
            Message::Loaded(_, Ok(entries)) => {
                info!(count = entries.len(), "history loaded");
                match self.pending_clear.as_mut() {
                    Some(snapshot) => *snapshot = entries,
                    None => self.entries = entries,
                }
                self.state = LoadState::Loaded;
                (Task::none(), None)
            }
            Message::Loaded(_, Err(e)) => {
                if self.state == LoadState::Loading {
                    error!(error = %e, "failed to load history");
                    self.state = LoadState::Failed(LOAD_FAILED.to_string());
                } else {
                    warn!(error = %e, "history refresh failed, keeping current list");
                }
                (Task::none(), None)
            }
            Message::Select(question) => (Task::none(), Some(Event::Requery(question))),
            Message::Clear => (self.begin_clear(api), None),
            Message::Cleared(result) => (Task::none(), Some(self.finish_clear(result))),
        }
    }

    fn begin_clear(&mut self, api: &ApiClient) -> Task<Message> {
        if self.pending_clear.is_some() || self.entries.is_empty() {
            return Task::none();
        }
        self.pending_clear = Some(std::mem::take(&mut self.entries));
        self.notice = None;
        self.generation += 1;

        let api = api.clone();
        Task::perform(
            async move { api.clear_history().await.map_err(|e| e.to_string()) },
            Message::Cleared,
        )
    }

    fn finish_clear(&mut self, result: Result<(), String>) -> Event {
        let snapshot = self.pending_clear.take().unwrap_or_default();
        match result {
            Ok(()) => {
                info!(removed = snapshot.len(), "history cleared");
                Event::Cleared
            }
            Err(e) => {
                error!(error = %e, "failed to clear history");
                self.entries = snapshot;
                self.notice = Some(CLEAR_FAILED.to_string());
                Event::ClearFailed
            }
        }
    }

    pub fn view(&self) -> Element<Message> {
        let header = text("🕘 Recent Questions").size(18);

        let body: Element<Message> = match self.state() {
            LoadState::Loading => text("Loading history...").style(text::secondary).into(),
            LoadState::Failed(message) => text(message.as_str()).style(text::danger).into(),
            LoadState::Loaded if self.entries.is_empty() => {
                text("No questions yet. Start by asking something!")
                    .style(text::secondary)
                    .into()
            }
            LoadState::Loaded => {
                let groups = self.groups().into_iter().map(|group| {
                    let items = group.entries.into_iter().map(|question| {
                        let when = time_label(&question.timestamp, &Local);
                        button(column![
                            text(question.question.clone()).size(14),
                            text(format!("🕘 {}", when)).size(11).style(text::secondary),
                        ])
                        .width(Length::Fill)
                        .style(button::text)
                        .on_press(Message::Select(question.question))
                        .into()
                    });
                    column![
                        text(group.label).size(12).style(text::secondary),
                        Column::with_children(items).spacing(2),
                    ]
                    .spacing(4)
                    .into()
                });
                scrollable(Column::with_children(groups).spacing(16))
                    .height(Length::Fill)
                    .into()
            }
        };

        let mut content = column![header].spacing(12).height(Length::Fill);
        if let Some(notice) = self.notice() {
            content = content.push(text(notice).size(13).style(text::danger));
        }
        content = content.push(body);

        if self.is_clearing() {
            content = content.push(text("Clearing history...").size(13).style(text::secondary));
        } else if !self.entries().is_empty() {
            content = content.push(
                button(text("🗑 Clear History").size(14))
                    .width(Length::Fill)
                    .style(button::danger)
                    .on_press(Message::Clear),
            );
        }

        container(content)
            .padding(16)
            .width(Length::Fixed(300.0))
            .height(Length::Fill)
            .style(container::rounded_box)
            .into()
    }
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}
