//! Animated walk through the stages of the retrieval-augmented-generation pipeline.
//!
//! The [`Sequencer`] is a small state machine (`Idle`, `Playing`, `Finished`)
//! driven by timer ticks. The timer is a subscription that only exists while
//! the sequencer is playing, so pausing, resetting, finishing or dropping the
//! view all release it.

use std::time::Duration;

use iced::{
    alignment,
    widget::{button, column, container, horizontal_rule, progress_bar, row, scrollable, text},
    time, Element, Length, Subscription, Task,
};

use crate::answer::clamp_lines;
use crate::types::StepReport;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);
pub const RESTART_DELAY: Duration = Duration::from_millis(100);
/// Shortest tick period; the timer cannot run with a zero period.
pub const MIN_DELAY: Duration = Duration::from_millis(1);
pub const DEFAULT_QUESTION: &str = "How does tokenization affect RAG systems?";

/// A known pipeline stage, or whatever else the backend chose to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    UserQuestion,
    EmbedQuestion,
    SearchVectorDb,
    RetrieveContexts,
    BuildPrompt,
    SendToLlm,
    GenerateAnswer,
    ShowAnswer,
    Unknown(String),
}

impl StepKind {
    pub const PIPELINE: [StepKind; 8] = [
        StepKind::UserQuestion,
        StepKind::EmbedQuestion,
        StepKind::SearchVectorDb,
        StepKind::RetrieveContexts,
        StepKind::BuildPrompt,
        StepKind::SendToLlm,
        StepKind::GenerateAnswer,
        StepKind::ShowAnswer,
    ];

    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "User Question" => StepKind::UserQuestion,
            "Embed Question" | "Embed Question → Vector" => StepKind::EmbedQuestion,
            "Search Vector DB" => StepKind::SearchVectorDb,
            "Retrieve Contexts" => StepKind::RetrieveContexts,
            "Build Prompt" => StepKind::BuildPrompt,
            "Send to LLM" => StepKind::SendToLlm,
            "Generate Answer" | "LLM Generates Answer" => StepKind::GenerateAnswer,
            "Show Answer" => StepKind::ShowAnswer,
            _ => StepKind::Unknown(name.to_string()),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            StepKind::UserQuestion => "User Question",
            StepKind::EmbedQuestion => "Embed Question",
            StepKind::SearchVectorDb => "Search Vector DB",
            StepKind::RetrieveContexts => "Retrieve Contexts",
            StepKind::BuildPrompt => "Build Prompt",
            StepKind::SendToLlm => "Send to LLM",
            StepKind::GenerateAnswer => "Generate Answer",
            StepKind::ShowAnswer => "Show Answer",
            StepKind::Unknown(name) => name,
        }
    }

    /// What the stage does, used by the demonstration script.
    pub fn description(&self) -> &str {
        match self {
            StepKind::UserQuestion => "The user asks a question about their documents",
            StepKind::EmbedQuestion => "Convert question to a vector embedding",
            StepKind::SearchVectorDb => "Find similar vectors in the database",
            StepKind::RetrieveContexts => "Get the most relevant text chunks",
            StepKind::BuildPrompt => "Combine retrieved context with user question",
            StepKind::SendToLlm => "Pass the enhanced prompt to AI model",
            StepKind::GenerateAnswer => "LLM creates response using context",
            StepKind::ShowAnswer => "Present answer with source citations to user",
            StepKind::Unknown(name) => name,
        }
    }

    /// What the stage did, used when replaying a backend report.
    pub fn summary(&self) -> &str {
        match self {
            StepKind::UserQuestion => "User submitted a question to the system.",
            StepKind::EmbedQuestion => "Question converted to vector embedding.",
            StepKind::SearchVectorDb => "Similar documents found using vector search.",
            StepKind::RetrieveContexts => "Top text chunks retrieved from database.",
            StepKind::BuildPrompt => "Question and context combined to form prompt.",
            StepKind::SendToLlm => "Prompt sent to language model.",
            StepKind::GenerateAnswer => "LLM generated a contextual answer.",
            StepKind::ShowAnswer => "Answer shown with source citations.",
            StepKind::Unknown(name) => name,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StepKind::UserQuestion | StepKind::ShowAnswer | StepKind::Unknown(_) => "💬",
            StepKind::EmbedQuestion => "🧮",
            StepKind::SearchVectorDb => "🗄",
            StepKind::RetrieveContexts => "📄",
            StepKind::BuildPrompt => "🔎",
            StepKind::SendToLlm => "➜",
            StepKind::GenerateAnswer => "🤖",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowStep {
    pub index: usize,
    pub kind: StepKind,
    pub title: String,
    pub description: String,
    pub icon: &'static str,
    pub sample: String,
}

impl FlowStep {
    pub fn from_report(index: usize, report: &StepReport) -> Self {
        let kind = StepKind::from_name(&report.step);
        FlowStep {
            index,
            title: kind.title().to_string(),
            description: kind.summary().to_string(),
            icon: kind.icon(),
            sample: report.value.clone(),
            kind,
        }
    }

    fn demo(index: usize, kind: StepKind, sample: String) -> Self {
        FlowStep {
            index,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            icon: kind.icon(),
            sample,
            kind,
        }
    }
}

pub fn steps_from_reports(reports: &[StepReport]) -> Vec<FlowStep> {
    reports
        .iter()
        .enumerate()
        .map(|(i, report)| FlowStep::from_report(i, report))
        .collect()
}

/// The built-in eight stage walkthrough with illustrative payloads.
pub fn demo_script(question: &str) -> Vec<FlowStep> {
    let question = if question.trim().is_empty() {
        DEFAULT_QUESTION
    } else {
        question.trim()
    };

    StepKind::PIPELINE
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let sample = match &kind {
                StepKind::UserQuestion => format!("\"{}\"", question),
                StepKind::EmbedQuestion => "[0.12, -0.33, 0.41, 0.09, ...]".to_string(),
                StepKind::SearchVectorDb => {
                    "Similarity search: cosine(question_vector, db_vectors)".to_string()
                }
                StepKind::RetrieveContexts => {
                    "\"Tokenization divides text into units called tokens...\"".to_string()
                }
                StepKind::BuildPrompt => {
                    format!("CONTEXT: [retrieved text] \nQUESTION: {}", question)
                }
                StepKind::SendToLlm => {
                    "API request to GPT/Claude with context-enriched prompt".to_string()
                }
                StepKind::GenerateAnswer => {
                    "Tokenization in RAG affects retrieval quality by...".to_string()
                }
                StepKind::ShowAnswer => {
                    "Answer displayed with references to source documents".to_string()
                }
                StepKind::Unknown(name) => name.clone(),
            };
            FlowStep::demo(i, kind, sample)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub start_index: usize,
    /// Start playing as soon as the flow is built. Applied by [`Flow::new`].
    pub auto_play: bool,
    pub delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            start_index: 0,
            auto_play: false,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Marker returned once per full traversal, when the last step is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed;

/// Outcome of asking the sequencer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Started,
    /// Rewound to the first step; call [`Sequencer::begin`] with the token after the delay.
    Delayed { after: Duration, generation: u64 },
    Completed,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    steps: Vec<FlowStep>,
    index: usize,
    phase: Phase,
    delay: Duration,
    generation: u64,
    completion_sent: bool,
}

impl Sequencer {
    pub fn new(steps: Vec<FlowStep>, options: Options) -> Self {
        Sequencer {
            index: options.start_index.min(steps.len().saturating_sub(1)),
            steps,
            phase: Phase::Idle,
            delay: options.delay.max(MIN_DELAY),
            generation: 0,
            completion_sent: false,
        }
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    fn at_last(&self) -> bool {
        self.last_index() == Some(self.index)
    }

    /// `(index + 1) / len`, or zero when there are no steps.
    pub fn progress(&self) -> f32 {
        if self.steps.is_empty() {
            0.0
        } else {
            (self.index + 1) as f32 / self.steps.len() as f32
        }
    }

    pub fn progress_percent(&self) -> u32 {
        (self.progress() * 100.0).round() as u32
    }

    /// Swaps in a new step list and starts over from the first step.
    pub fn replace_steps(&mut self, steps: Vec<FlowStep>, auto_play: bool) -> Option<Completed> {
        self.steps = steps;
        self.index = 0;
        self.phase = Phase::Idle;
        self.generation += 1;
        self.completion_sent = false;

        if auto_play {
            self.start()
        } else {
            None
        }
    }

    pub fn play(&mut self) -> Playback {
        if self.steps.is_empty() || self.is_playing() {
            return Playback::Ignored;
        }

        if self.at_last() && self.steps.len() > 1 {
            self.index = 0;
            self.phase = Phase::Idle;
            self.completion_sent = false;
            self.generation += 1;
            return Playback::Delayed {
                after: RESTART_DELAY,
                generation: self.generation,
            };
        }

        match self.start() {
            Some(Completed) => Playback::Completed,
            None if self.is_playing() => Playback::Started,
            None => Playback::Ignored,
        }
    }

    /// Starts a delayed playback unless something reset the sequencer meanwhile.
    pub fn begin(&mut self, generation: u64) -> Option<Completed> {
        if generation != self.generation || self.phase != Phase::Idle {
            return None;
        }
        self.start()
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.phase = Phase::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.index = 0;
        self.generation += 1;
        self.completion_sent = false;
    }

    /// Advances one step; stops and reports completion on reaching the end.
    pub fn tick(&mut self) -> Option<Completed> {
        if !self.is_playing() {
            return None;
        }
        if !self.at_last() {
            self.index += 1;
        }
        if self.at_last() {
            self.finish()
        } else {
            None
        }
    }

    fn start(&mut self) -> Option<Completed> {
        if self.steps.is_empty() {
            return None;
        }
        if self.at_last() {
            if self.completion_sent {
                self.phase = Phase::Finished;
                return None;
            }
            return self.finish();
        }
        self.phase = Phase::Playing;
        None
    }

    fn finish(&mut self) -> Option<Completed> {
        self.phase = Phase::Finished;
        if self.completion_sent {
            None
        } else {
            self.completion_sent = true;
            Some(Completed)
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Play,
    Pause,
    Reset,
    Tick,
    Begin(u64),
}

/// What the parent needs to know after an update.
pub enum Action {
    None,
    Run(Task<Message>),
    Completed,
    /// The user halted playback by hand.
    Stopped,
}

pub struct Flow {
    sequencer: Sequencer,
    heading: &'static str,
    blurb: &'static str,
}

impl Flow {
    /// Builds the flow and, with `auto_play`, starts it. The returned action
    /// carries a completion that happened during start-up.
    pub fn new(steps: Vec<FlowStep>, options: Options) -> (Self, Action) {
        let mut flow = Flow {
            sequencer: Sequencer::new(steps, options),
            heading: "Retrieval-Augmented Generation (RAG) Flow",
            blurb: "This diagram shows how RAG enhances AI responses by retrieving relevant context from a document database.",
        };
        let action = if options.auto_play {
            flow.update(Message::Play)
        } else {
            Action::None
        };
        (flow, action)
    }

    #[cfg(test)]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn replace_steps(&mut self, steps: Vec<FlowStep>, auto_play: bool) -> Action {
        match self.sequencer.replace_steps(steps, auto_play) {
            Some(Completed) => Action::Completed,
            None => Action::None,
        }
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Play => match self.sequencer.play() {
                Playback::Delayed { after, generation } => Action::Run(Task::perform(
                    async move { tokio::time::sleep(after).await },
                    move |_| Message::Begin(generation),
                )),
                Playback::Completed => Action::Completed,
                Playback::Started | Playback::Ignored => Action::None,
            },
            Message::Begin(generation) => match self.sequencer.begin(generation) {
                Some(Completed) => Action::Completed,
                None => Action::None,
            },
            Message::Pause => {
                self.sequencer.pause();
                Action::Stopped
            }
            Message::Reset => {
                self.sequencer.reset();
                Action::Stopped
            }
            Message::Tick => match self.sequencer.tick() {
                Some(Completed) => {
                    tracing::debug!(steps = self.sequencer.steps().len(), "flow finished");
                    Action::Completed
                }
                None => Action::None,
            },
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.sequencer.is_playing() {
            time::every(self.sequencer.delay()).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    pub fn view(&self) -> Element<Message> {
        let seq = &self.sequencer;
        let at_end = seq.steps().len().checked_sub(1) == Some(seq.index());

        let play_label = match seq.phase() {
            Phase::Playing => "Pause",
            Phase::Finished => "Restart ▶",
            Phase::Idle if at_end => "Restart ▶",
            Phase::Idle => "Play ▶",
        };
        let play_message = if seq.is_playing() {
            Message::Pause
        } else {
            Message::Play
        };

        let controls = row![
            button(text(play_label).size(14))
                .on_press_maybe((!seq.steps().is_empty()).then_some(play_message))
                .style(button::secondary)
                .padding(8),
            button(text("↺").size(14))
                .on_press_maybe((seq.index() != 0).then_some(Message::Reset))
                .style(button::secondary)
                .padding(8),
        ]
        .spacing(8);

        let header = column![
            text(self.heading).size(24),
            text(self.blurb).size(14).style(text::secondary),
            controls,
            row![
                container(progress_bar(0.0..=100.0, seq.progress() * 100.0).height(8))
                    .width(Length::Fixed(480.0)),
                text(format!("{}%", seq.progress_percent()))
                    .size(12)
                    .style(text::secondary),
            ]
            .spacing(10)
            .align_y(alignment::Vertical::Center),
        ]
        .spacing(12)
        .align_x(alignment::Horizontal::Center);

        let mut cards = row![].spacing(12).padding(12);
        for (i, step) in seq.steps().iter().enumerate() {
            cards = cards.push(step_card(step, i, seq.index()));
            if i + 1 < seq.steps().len() {
                let arrow = text("→").size(if i == seq.index() { 26 } else { 20 });
                cards = cards.push(
                    container(arrow)
                        .height(Length::Fixed(180.0))
                        .align_y(alignment::Vertical::Center),
                );
            }
        }

        let strip = scrollable(cards).direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new(),
        ));

        column![header, strip]
            .spacing(16)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .into()
    }
}

fn step_card<'a>(step: &'a FlowStep, position: usize, active: usize) -> Element<'a, Message> {
    let is_active = position == active;
    let is_past = position < active;

    let badge = row![
        text(step.icon).size(20),
        iced::widget::horizontal_space(),
        text(format!("Step {}", position + 1))
            .size(13)
            .style(text::secondary),
    ]
    .align_y(alignment::Vertical::Center);

    let title = if is_active {
        text(&step.title).size(17).style(text::primary)
    } else {
        text(&step.title).size(17)
    };

    let body = column![
        badge,
        title,
        text(&step.description).size(13).style(text::secondary),
        horizontal_rule(1),
        text(clamp_lines(&step.sample, 4, 34))
            .size(12)
            .font(iced::Font::MONOSPACE),
    ]
    .spacing(8);

    let card = container(body)
        .padding(16)
        .width(Length::Fixed(260.0))
        .height(Length::Fixed(if is_active { 200.0 } else { 180.0 }));

    if is_active || is_past {
        card.style(container::rounded_box).into()
    } else {
        card.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports(names: &[&str]) -> Vec<StepReport> {
        names
            .iter()
            .map(|name| StepReport {
                step: name.to_string(),
                value: format!("{} value", name),
            })
            .collect()
    }

    fn sequencer(len: usize) -> Sequencer {
        let names: Vec<String> = (0..len).map(|i| format!("step {}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        Sequencer::new(steps_from_reports(&reports(&names)), Options::default())
    }

    #[test]
    fn test_step_kind_lookup_and_fallback() {
        assert_eq!(StepKind::from_name("Search Vector DB"), StepKind::SearchVectorDb);
        assert_eq!(StepKind::from_name("Embed Question → Vector"), StepKind::EmbedQuestion);
        assert_eq!(StepKind::from_name("LLM Generates Answer"), StepKind::GenerateAnswer);

        let step = FlowStep::from_report(
            3,
            &StepReport {
                step: "Rerank".to_string(),
                value: "top 3".to_string(),
            },
        );
        assert_eq!(step.kind, StepKind::Unknown("Rerank".to_string()));
        assert_eq!(step.title, "Rerank");
        assert_eq!(step.description, "Rerank");
        assert_eq!(step.sample, "top 3");
        assert_eq!(step.index, 3);
    }

    #[test]
    fn test_report_uses_summary_text() {
        let step = FlowStep::from_report(
            0,
            &StepReport {
                step: "Build Prompt".to_string(),
                value: "CONTEXT: ...".to_string(),
            },
        );
        assert_eq!(step.title, "Build Prompt");
        assert_eq!(step.description, "Question and context combined to form prompt.");
    }

    #[test]
    fn test_demo_script_has_eight_stages_with_question() {
        let steps = demo_script("What is chunking?");
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0].sample, "\"What is chunking?\"");
        assert!(steps[4].sample.ends_with("QUESTION: What is chunking?"));
        assert_eq!(steps[7].kind, StepKind::ShowAnswer);
        assert!(steps.iter().enumerate().all(|(i, s)| s.index == i));

        let fallback = demo_script("   ");
        assert_eq!(fallback[0].sample, format!("\"{}\"", DEFAULT_QUESTION));
    }

    #[test]
    fn test_three_step_walkthrough() {
        let mut seq = Sequencer::new(
            steps_from_reports(&reports(&["User Question", "Search Vector DB", "Show Answer"])),
            Options {
                delay: Duration::from_millis(100),
                ..Options::default()
            },
        );

        assert_eq!(seq.play(), Playback::Started);
        let mut indices = vec![seq.index()];
        let mut percents = vec![seq.progress_percent()];
        let mut completions = 0;

        while seq.is_playing() {
            if seq.tick().is_some() {
                completions += 1;
            }
            indices.push(seq.index());
            percents.push(seq.progress_percent());
        }

        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(percents, vec![33, 67, 100]);
        assert_eq!(completions, 1);
        assert_eq!(seq.phase(), Phase::Finished);
        assert!(seq.tick().is_none());
    }

    #[test]
    fn test_n_steps_advance_n_minus_one_times() {
        for len in 1..=9 {
            let mut seq = sequencer(len);
            let mut completions = usize::from(seq.play() == Playback::Completed);
            let mut advances = 0;
            while seq.is_playing() {
                let before = seq.index();
                if seq.tick().is_some() {
                    completions += 1;
                }
                if seq.index() != before {
                    advances += 1;
                }
            }
            assert_eq!(advances, len - 1, "len {}", len);
            assert_eq!(completions, 1, "len {}", len);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut seq = sequencer(5);
        seq.play();
        seq.tick();
        seq.tick();

        seq.reset();
        let once = (seq.index(), seq.phase());
        seq.reset();
        assert_eq!((seq.index(), seq.phase()), once);
        assert_eq!(once, (0, Phase::Idle));
        assert!(seq.tick().is_none());
    }

    #[test]
    fn test_pause_keeps_index() {
        let mut seq = sequencer(4);
        seq.play();
        seq.tick();
        seq.pause();
        assert_eq!(seq.index(), 1);
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(seq.tick().is_none());
        assert_eq!(seq.index(), 1);

        assert_eq!(seq.play(), Playback::Started);
        seq.tick();
        assert_eq!(seq.index(), 2);
    }

    #[test]
    fn test_play_at_end_rewinds_then_begins_after_delay() {
        let mut seq = sequencer(3);
        seq.play();
        while seq.is_playing() {
            seq.tick();
        }

        let Playback::Delayed { after, generation } = seq.play() else {
            panic!("expected a delayed restart");
        };
        assert_eq!(after, RESTART_DELAY);
        assert_eq!(seq.index(), 0);
        assert!(!seq.is_playing());

        assert!(seq.begin(generation).is_none());
        assert!(seq.is_playing());
        seq.tick();
        assert_eq!(seq.tick(), Some(Completed));
    }

    #[test]
    fn test_stale_delayed_begin_is_ignored() {
        let mut seq = sequencer(3);
        seq.play();
        seq.tick();
        seq.tick();

        let Playback::Delayed { generation, .. } = seq.play() else {
            panic!("expected a delayed restart");
        };
        seq.reset();
        assert!(seq.begin(generation).is_none());
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_replace_steps_restarts_with_auto_play() {
        let mut seq = sequencer(4);
        seq.play();
        seq.tick();
        seq.tick();

        assert!(seq
            .replace_steps(steps_from_reports(&reports(&["a", "b"])), true)
            .is_none());
        assert_eq!(seq.index(), 0);
        assert!(seq.is_playing());
        assert_eq!(seq.tick(), Some(Completed));

        seq.replace_steps(demo_script(""), false);
        assert_eq!(seq.index(), 0);
        assert_eq!(seq.phase(), Phase::Idle);
    }

    #[test]
    fn test_single_step_auto_play_completes_immediately() {
        let mut seq = sequencer(0);
        let done = seq.replace_steps(steps_from_reports(&reports(&["User Question"])), true);
        assert_eq!(done, Some(Completed));
        assert_eq!(seq.phase(), Phase::Finished);
        assert_eq!(seq.progress_percent(), 100);
    }

    #[test]
    fn test_empty_sequencer_is_inert() {
        let mut seq = sequencer(0);
        assert_eq!(seq.progress(), 0.0);
        assert_eq!(seq.play(), Playback::Ignored);
        assert!(seq.tick().is_none());
    }

    #[test]
    fn test_start_index_is_clamped() {
        let seq = Sequencer::new(
            demo_script(""),
            Options {
                start_index: 42,
                ..Options::default()
            },
        );
        assert_eq!(seq.index(), 7);
        assert_eq!(seq.phase(), Phase::Idle);
    }

    #[test]
    fn test_flow_update_reports_completion_and_manual_stop() {
        let (mut flow, started) = Flow::new(
            steps_from_reports(&reports(&["a", "b"])),
            Options {
                auto_play: true,
                ..Options::default()
            },
        );
        assert!(matches!(started, Action::None));
        assert!(flow.sequencer().is_playing());
        assert!(matches!(flow.update(Message::Tick), Action::Completed));
        assert!(matches!(flow.update(Message::Reset), Action::Stopped));
        assert_eq!(flow.sequencer().index(), 0);
    }

    #[test]
    fn test_single_step_auto_play_flow_reports_completion_from_new() {
        let (flow, started) = Flow::new(
            steps_from_reports(&reports(&["User Question"])),
            Options {
                auto_play: true,
                ..Options::default()
            },
        );
        assert!(matches!(started, Action::Completed));
        assert_eq!(flow.sequencer().phase(), Phase::Finished);
    }

    #[test]
    fn test_zero_delay_is_raised_to_minimum() {
        let seq = Sequencer::new(
            demo_script(""),
            Options {
                delay: Duration::ZERO,
                ..Options::default()
            },
        );
        assert_eq!(seq.delay(), MIN_DELAY);
        assert!(seq.delay() > Duration::ZERO);
    }
}
