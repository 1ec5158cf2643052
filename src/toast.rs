use std::time::Duration;

use iced::{
    widget::{button, column, container, row, text, Column},
    Element, Length, Task,
};
use tracing::warn;

const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Toast {
            title: title.into(),
            description: description.into(),
            variant: Variant::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Toast {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(u64),
    Delivered(Result<(), String>),
}

/// Transient notifications stacked in a corner, optionally mirrored to the desktop.
pub struct Toasts {
    next_id: u64,
    active: Vec<(u64, Toast)>,
    lifetime: Duration,
    desktop: bool,
}

impl Toasts {
    pub fn new(lifetime: Duration, desktop: bool) -> Self {
        Toasts {
            next_id: 0,
            active: Vec::new(),
            lifetime,
            desktop,
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter().map(|(_, toast)| toast)
    }

    pub fn push(&mut self, toast: Toast) -> Task<Message> {
        let id = self.next_id;
        self.next_id += 1;

        if self.active.len() >= MAX_VISIBLE {
            self.active.remove(0);
        }

        let desktop = if self.desktop {
            let (summary, body) = (toast.title.clone(), toast.description.clone());
            Task::perform(
                async move {
                    tokio::task::spawn_blocking(move || {
                        notify_rust::Notification::new()
                            .appname("ask-oracle")
                            .summary(&summary)
                            .body(&body)
                            .show()
                            .map(|_| ())
                            .map_err(|e| e.to_string())
                    })
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|delivered| delivered)
                },
                Message::Delivered,
            )
        } else {
            Task::none()
        };

        self.active.push((id, toast));

        let lifetime = self.lifetime;
        Task::batch([
            Task::perform(
                async move { tokio::time::sleep(lifetime).await },
                move |_| Message::Dismiss(id),
            ),
            desktop,
        ])
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Dismiss(id) => self.active.retain(|(toast_id, _)| *toast_id != id),
            Message::Delivered(Ok(())) => {}
            Message::Delivered(Err(e)) => warn!(error = %e, "desktop notification failed"),
        }
    }

    pub fn view(&self) -> Element<Message> {
        let cards = self.active.iter().map(|(id, toast)| {
            let title = match toast.variant {
                Variant::Info => text(toast.title.as_str()).size(15),
                Variant::Destructive => text(toast.title.as_str()).size(15).style(text::danger),
            };
            container(
                row![
                    column![title, text(toast.description.as_str()).size(13)]
                        .spacing(4)
                        .width(Length::Fill),
                    button(text("✕").size(12))
                        .style(button::text)
                        .on_press(Message::Dismiss(*id)),
                ]
                .spacing(8),
            )
            .padding(12)
            .width(Length::Fixed(320.0))
            .style(container::rounded_box)
            .into()
        });

        Column::with_children(cards).spacing(8).into()
    }
}
