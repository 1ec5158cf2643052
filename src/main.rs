mod answer;
mod api;
mod config;
mod flow;
mod history;
mod logging;
mod search;
mod toast;
mod types;
mod upload;

use iced::{
    alignment,
    event::{self, Event as IcedEvent},
    keyboard::{self, Key},
    widget::{button, column, container, horizontal_rule, horizontal_space, row, scrollable, stack, text},
    window, Element, Length, Size, Subscription, Task, Theme,
};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::types::{Answer, AskResponse};

fn main() -> iced::Result {
    let (config, warnings) = config::Config::load();
    logging::init(&config.log_level);
    for warning in &warnings {
        warn!("{}", warning);
    }
    info!(backend = %config.backend.base_url, "starting ask-oracle");

    let window = config.window.clone();

    iced::application("Ask Your Docs", App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window::Settings {
            size: Size::new(window.width as f32, window.height as f32),
            min_size: Some(Size::new(window.min_width as f32, window.min_height as f32)),
            position: window::Position::Centered,
            ..Default::default()
        })
        .run_with(move || App::new(config.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    FlowDemo,
}

#[derive(Debug, Clone)]
enum Message {
    Navigate(Page),
    ToggleSidebar,
    CloseSidebar,
    Search(search::Message),
    Answered(Result<AskResponse, String>),
    Answer(answer::Message),
    History(history::Message),
    Upload(upload::Message),
    HomeFlow(flow::Message),
    DemoFlow(flow::Message),
    Toast(toast::Message),
}

struct App {
    api: ApiClient,
    page: Page,
    sidebar_open: bool,
    search: search::SearchBox,
    is_loading: bool,
    answer: Option<Answer>,
    /// Answer held back while the pipeline animation plays.
    pending_answer: Option<Answer>,
    reveal_after_flow: bool,
    history: history::HistoryPanel,
    upload: upload::UploadPanel,
    home_flow: flow::Flow,
    demo_flow: flow::Flow,
    toasts: toast::Toasts,
}

impl App {
    fn new(config: config::Config) -> (Self, Task<Message>) {
        let api = ApiClient::with_base_url(config.backend.base_url.clone());
        let (home_flow, home_started) = flow::Flow::new(
            flow::demo_script(flow::DEFAULT_QUESTION),
            flow::Options {
                delay: config.flow.step_delay(),
                ..flow::Options::default()
            },
        );
        let (demo_flow, demo_started) = flow::Flow::new(
            flow::demo_script(flow::DEFAULT_QUESTION),
            flow::Options {
                delay: config.flow.demo_step_delay(),
                ..flow::Options::default()
            },
        );
        let mut app = App {
            api,
            page: Page::Home,
            sidebar_open: false,
            search: search::SearchBox::new(),
            is_loading: false,
            answer: None,
            pending_answer: None,
            reveal_after_flow: config.flow.reveal_after_flow,
            history: history::HistoryPanel::new(),
            upload: upload::UploadPanel::new(),
            home_flow,
            demo_flow,
            toasts: toast::Toasts::new(
                Duration::from_secs(config.notifications.toast_seconds),
                config.notifications.desktop,
            ),
        };

        let history_task = app.history.load(&app.api).map(Message::History);
        let focus_task = app.search.focus();
        let home_task = app.handle_home_flow(home_started);
        let demo_task = app.handle_demo_flow(demo_started);

        (app, Task::batch([history_task, focus_task, home_task, demo_task]))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(page) => {
                let restarted = page == Page::FlowDemo && self.page != Page::FlowDemo;
                self.page = page;
                if restarted {
                    let action = self
                        .demo_flow
                        .replace_steps(flow::demo_script(flow::DEFAULT_QUESTION), true);
                    self.handle_demo_flow(action)
                } else {
                    Task::none()
                }
            }
            Message::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                Task::none()
            }
            Message::CloseSidebar => {
                self.sidebar_open = false;
                Task::none()
            }
            Message::Search(message) => match self.search.update(message, self.is_loading) {
                Some(search::Event::Search(query)) => self.ask(query),
                None => Task::none(),
            },
            Message::Answered(Ok(response)) => {
                self.is_loading = false;
                let (answer, reports) = response.into_parts();
                info!(
                    sources = answer.sources.len(),
                    steps = reports.len(),
                    "answer received"
                );

                let steps = flow::steps_from_reports(&reports);
                let refresh = self.history.refresh(&self.api).map(Message::History);

                if steps.is_empty() {
                    self.answer = Some(answer);
                    return refresh;
                }

                if self.reveal_after_flow {
                    self.pending_answer = Some(answer);
                } else {
                    self.answer = Some(answer);
                }
                let action = self.home_flow.replace_steps(steps, true);
                let flow_task = self.handle_home_flow(action);

                Task::batch([refresh, flow_task])
            }
            Message::Answered(Err(e)) => {
                error!(error = %e, "error getting answer");
                self.is_loading = false;
                self.notify(toast::Toast::destructive(
                    "Error",
                    "Failed to get an answer. Please try again.",
                ))
            }
            Message::Answer(message) => {
                answer::update(message);
                Task::none()
            }
            Message::History(message) => {
                let (task, event) = self.history.update(message, &self.api);
                let task = task.map(Message::History);
                let follow_up = match event {
                    Some(history::Event::Requery(question)) if self.is_loading => {
                        info!(question = %question, "ignoring history selection while a request is in flight");
                        Task::none()
                    }
                    Some(history::Event::Requery(question)) => {
                        self.search.set_query(question.clone());
                        self.page = Page::Home;
                        self.ask(question)
                    }
                    Some(history::Event::Cleared) => self.notify(toast::Toast::info(
                        "History cleared",
                        "Your question history has been cleared successfully.",
                    )),
                    Some(history::Event::ClearFailed) => self.notify(toast::Toast::destructive(
                        "Error",
                        "Failed to clear history. Please try again.",
                    )),
                    None => Task::none(),
                };
                Task::batch([task, follow_up])
            }
            Message::Upload(message) => {
                let (task, event) = self.upload.update(message, &self.api);
                let task = task.map(Message::Upload);
                let follow_up = match event {
                    Some(upload::Event::Uploaded(receipt)) => self.notify(toast::Toast::info(
                        "Files uploaded successfully",
                        format!("{} ({} chunks)", receipt.message, receipt.chunks),
                    )),
                    Some(upload::Event::Rejected(reason)) => {
                        self.notify(toast::Toast::destructive("Upload failed", reason))
                    }
                    Some(upload::Event::Failed) => self.notify(toast::Toast::destructive(
                        "Upload failed",
                        "There was an error uploading your documents",
                    )),
                    None => Task::none(),
                };
                Task::batch([task, follow_up])
            }
            Message::HomeFlow(message) => {
                let action = self.home_flow.update(message);
                self.handle_home_flow(action)
            }
            Message::DemoFlow(message) => {
                let action = self.demo_flow.update(message);
                self.handle_demo_flow(action)
            }
            Message::Toast(message) => {
                self.toasts.update(message);
                Task::none()
            }
        }
    }

    fn ask(&mut self, query: String) -> Task<Message> {
        if self.is_loading {
            return Task::none();
        }

        self.is_loading = true;
        self.answer = None;
        self.pending_answer = None;
        let action = self.home_flow.replace_steps(flow::demo_script(&query), false);
        let flow_task = self.handle_home_flow(action);

        let api = self.api.clone();
        Task::batch([
            flow_task,
            Task::perform(
                async move { api.ask_question(&query).await.map_err(|e| e.to_string()) },
                Message::Answered,
            ),
        ])
    }

    fn handle_home_flow(&mut self, action: flow::Action) -> Task<Message> {
        match action {
            flow::Action::Run(task) => task.map(Message::HomeFlow),
            flow::Action::Completed | flow::Action::Stopped => {
                if let Some(answer) = self.pending_answer.take() {
                    self.answer = Some(answer);
                }
                Task::none()
            }
            flow::Action::None => Task::none(),
        }
    }

    fn handle_demo_flow(&mut self, action: flow::Action) -> Task<Message> {
        match action {
            flow::Action::Run(task) => task.map(Message::DemoFlow),
            flow::Action::None | flow::Action::Completed | flow::Action::Stopped => Task::none(),
        }
    }

    fn notify(&mut self, toast: toast::Toast) -> Task<Message> {
        self.toasts.push(toast).map(Message::Toast)
    }

    fn subscription(&self) -> Subscription<Message> {
        let flow = match self.page {
            Page::Home => self.home_flow.subscription().map(Message::HomeFlow),
            Page::FlowDemo => self.demo_flow.subscription().map(Message::DemoFlow),
        };

        let events = event::listen_with(|event, _status, _id| {
            if let IcedEvent::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(keyboard::key::Named::Escape),
                ..
            }) = event
            {
                Some(Message::CloseSidebar)
            } else {
                None
            }
        });

        Subscription::batch([flow, events])
    }

    fn view(&self) -> Element<Message> {
        let page = match self.page {
            Page::Home => self.home_view(),
            Page::FlowDemo => self.demo_view(),
        };

        let main = column![
            self.header(),
            horizontal_rule(1),
            scrollable(container(page).padding(24).width(Length::Fill)).height(Length::Fill),
        ]
        .width(Length::Fill);

        let body: Element<Message> = if self.sidebar_open {
            row![self.history.view().map(Message::History), main].into()
        } else {
            main.into()
        };

        let toasts = container(self.toasts.view().map(Message::Toast))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16)
            .align_x(alignment::Horizontal::Right)
            .align_y(alignment::Vertical::Bottom);

        stack![body, toasts].into()
    }

    fn header(&self) -> Element<Message> {
        let nav = |label: &'static str, page: Page| {
            let style = if self.page == page {
                button::primary
            } else {
                button::text
            };
            button(text(label).size(14))
                .style(style)
                .on_press(Message::Navigate(page))
        };

        row![
            button(text("☰").size(18))
                .style(button::text)
                .on_press(Message::ToggleSidebar),
            text("💬 Ask Your Docs").size(20),
            horizontal_space(),
            nav("Home", Page::Home),
            nav("RAG Flow", Page::FlowDemo),
        ]
        .spacing(12)
        .padding(12)
        .align_y(alignment::Vertical::Center)
        .into()
    }

    fn home_view(&self) -> Element<Message> {
        let intro = column![
            text("Ask the Oracle").size(40),
            text(
                "Upload your documents and get instant, accurate answers powered by wisdom from beyond. \
                 Ask in natural language and receive enlightened responses."
            )
            .size(16)
            .style(text::secondary),
        ]
        .spacing(12)
        .align_x(alignment::Horizontal::Center);

        let mut ask = column![
            self.upload.view().map(Message::Upload),
            self.search.view(self.is_loading).map(Message::Search),
            answer::view(self.answer.as_ref()).map(Message::Answer),
        ]
        .spacing(20)
        .max_width(860);

        if self.answer.is_none() && !self.is_loading {
            let hint = if self.pending_answer.is_some() {
                "Follow the pipeline below, your answer is on its way"
            } else {
                "Ask the Oracle a question to receive wisdom"
            };
            ask = ask.push(
                container(text(hint).style(text::secondary))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Center),
            );
        }

        let how = column![
            text("How The Oracle Works").size(26),
            text(
                "This diagram shows how The Oracle uses Retrieval-Augmented Generation \
                 to enhance answers with your documents."
            )
            .style(text::secondary),
            self.home_flow.view().map(Message::HomeFlow),
        ]
        .spacing(12)
        .align_x(alignment::Horizontal::Center);

        column![intro, ask, horizontal_rule(1), how, why_rag()]
            .spacing(32)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .into()
    }

    fn demo_view(&self) -> Element<Message> {
        column![
            text("Understanding RAG Systems").size(34),
            text(
                "See how Retrieval-Augmented Generation works behind the scenes \
                 to provide accurate answers from your documents."
            )
            .style(text::secondary),
            self.demo_flow.view().map(Message::DemoFlow),
            why_rag(),
        ]
        .spacing(24)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into()
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }
}

fn why_rag() -> Element<'static, Message> {
    let list = |heading: &'static str, items: [&'static str; 4]| {
        let mut col = column![text(heading).size(16)].spacing(6);
        for item in items {
            col = col.push(text(format!("• {}", item)).size(14));
        }
        container(col)
            .padding(20)
            .width(Length::FillPortion(1))
            .style(container::rounded_box)
    };

    column![
        text("Why RAG Matters").size(26),
        text(
            "RAG systems combine the knowledge from your documents with the intelligence of large \
             language models. This gives you the best of both worlds: accurate, contextual answers \
             based on your specific content."
        )
        .style(text::secondary),
        row![
            list(
                "Benefits",
                [
                    "Answers grounded in your actual documents",
                    "Reduced hallucinations and fabricated information",
                    "Citations to verify information sources",
                    "Up-to-date knowledge not limited to LLM training data",
                ],
            ),
            list(
                "Applications",
                [
                    "Company knowledge bases and documentation",
                    "Legal and compliance document search",
                    "Research paper and academic assistance",
                    "Technical support and troubleshooting",
                ],
            ),
        ]
        .spacing(24),
    ]
    .spacing(16)
    .max_width(860)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Source, StepReport};

    fn app_with(config: config::Config) -> App {
        let (app, _) = App::new(config);
        app
    }

    fn response(steps: &[&str]) -> AskResponse {
        AskResponse {
            answer: "Chunks are retrieved by similarity.".to_string(),
            sources: vec![Source {
                id: "1".to_string(),
                content: "Vector search ranks chunks.".to_string(),
                title: "notes.txt".to_string(),
                source: String::new(),
            }],
            steps: steps
                .iter()
                .map(|step| StepReport {
                    step: step.to_string(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_answer_is_held_until_flow_completes() {
        let mut app = app_with(config::Config::default());
        app.is_loading = true;

        let _ = app.update(Message::Answered(Ok(response(&[
            "User Question",
            "Search Vector DB",
            "Show Answer",
        ]))));
        assert!(!app.is_loading);
        assert!(app.answer.is_none());
        assert!(app.pending_answer.is_some());
        assert!(app.home_flow.sequencer().is_playing());

        let _ = app.update(Message::HomeFlow(flow::Message::Tick));
        assert!(app.answer.is_none());

        let _ = app.update(Message::HomeFlow(flow::Message::Tick));
        assert!(app.pending_answer.is_none());
        assert_eq!(
            app.answer.as_ref().map(|a| a.answer.as_str()),
            Some("Chunks are retrieved by similarity.")
        );
    }

    #[tokio::test]
    async fn test_pause_or_reset_releases_held_answer() {
        for stop in [flow::Message::Pause, flow::Message::Reset] {
            let mut app = app_with(config::Config::default());
            let _ = app.update(Message::Answered(Ok(response(&[
                "User Question",
                "Search Vector DB",
                "Show Answer",
            ]))));
            assert!(app.answer.is_none());

            let _ = app.update(Message::HomeFlow(stop));
            assert!(app.answer.is_some());
            assert!(app.pending_answer.is_none());
        }
    }

    #[tokio::test]
    async fn test_answer_without_steps_is_shown_at_once() {
        let mut app = app_with(config::Config::default());
        let _ = app.update(Message::Answered(Ok(response(&[]))));
        assert!(app.answer.is_some());
        assert!(app.pending_answer.is_none());
        assert!(!app.home_flow.sequencer().is_playing());
    }

    #[tokio::test]
    async fn test_answer_is_shown_at_once_when_reveal_is_disabled() {
        let mut config = config::Config::default();
        config.flow.reveal_after_flow = false;
        let mut app = app_with(config);

        let _ = app.update(Message::Answered(Ok(response(&[
            "User Question",
            "Show Answer",
        ]))));
        assert!(app.answer.is_some());
        assert!(app.pending_answer.is_none());
        assert!(app.home_flow.sequencer().is_playing());
    }

    #[tokio::test]
    async fn test_failed_answer_clears_loading() {
        let mut app = app_with(config::Config::default());
        app.is_loading = true;

        let _ = app.update(Message::Answered(Err("connection refused".into())));
        assert!(!app.is_loading);
        assert!(app.answer.is_none());
        assert!(app.pending_answer.is_none());
    }

    #[tokio::test]
    async fn test_history_selection_is_ignored_while_loading() {
        let mut app = app_with(config::Config::default());
        app.page = Page::FlowDemo;
        app.search.set_query("first question");
        app.is_loading = true;

        let _ = app.update(Message::History(history::Message::Select(
            "second question".into(),
        )));
        assert_eq!(app.search.query(), "first question");
        assert_eq!(app.page, Page::FlowDemo);
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_history_selection_asks_again_when_idle() {
        let mut app = app_with(config::Config::default());
        app.page = Page::FlowDemo;

        let _ = app.update(Message::History(history::Message::Select(
            "What is RAG?".into(),
        )));
        assert_eq!(app.search.query(), "What is RAG?");
        assert_eq!(app.page, Page::Home);
        assert!(app.is_loading);
    }
}
