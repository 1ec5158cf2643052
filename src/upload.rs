use std::path::{Path, PathBuf};

use iced::{
    widget::{button, column, row, text, text_input},
    Element, Length, Task,
};
use tracing::{error, info};

use crate::api::ApiClient;
use crate::types::UploadReceipt;

pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

#[derive(Debug, Clone)]
pub enum Message {
    PathChanged(String),
    Upload,
    Uploaded(Result<UploadReceipt, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Uploaded(UploadReceipt),
    Rejected(String),
    Failed,
}

/// Checks that `raw` names a document type the backend knows how to ingest.
pub fn validate(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return Err("Choose a file to upload.".to_string());
    }
    let path = Path::new(trimmed);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(path.to_path_buf()),
        _ => Err(format!(
            "Unsupported file type. Supported formats: {}",
            supported_formats()
        )),
    }
}

fn supported_formats() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct UploadPanel {
    path: String,
    uploading: bool,
}

impl UploadPanel {
    pub fn new() -> Self {
        UploadPanel {
            path: String::new(),
            uploading: false,
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> (Task<Message>, Option<Event>) {
        match message {
            Message::PathChanged(path) => {
                self.path = path;
                (Task::none(), None)
            }
            Message::Upload => {
                if self.uploading {
                    return (Task::none(), None);
                }
                let path = match validate(&self.path) {
                    Ok(path) => path,
                    Err(reason) => return (Task::none(), Some(Event::Rejected(reason))),
                };
                self.uploading = true;
                let api = api.clone();
                (
                    Task::perform(
                        async move { api.upload_file(&path).await.map_err(|e| e.to_string()) },
                        Message::Uploaded,
                    ),
                    None,
                )
            }
            Message::Uploaded(Ok(receipt)) => {
                info!(message = %receipt.message, chunks = receipt.chunks, "document uploaded");
                self.uploading = false;
                self.path.clear();
                (Task::none(), Some(Event::Uploaded(receipt)))
            }
            Message::Uploaded(Err(e)) => {
                error!(error = %e, "error uploading files");
                self.uploading = false;
                (Task::none(), Some(Event::Failed))
            }
        }
    }

    pub fn view(&self) -> Element<Message> {
        let mut input = text_input("Path to a document...", &self.path)
            .padding(10)
            .width(Length::Fill);
        if !self.is_uploading() {
            input = input
                .on_input(Message::PathChanged)
                .on_submit(Message::Upload);
        }

        let label = if self.uploading {
            "Uploading..."
        } else {
            "⇪ Upload Documents"
        };

        column![
            row![
                input,
                button(text(label).size(14))
                    .padding(10)
                    .style(button::secondary)
                    .on_press_maybe((!self.uploading).then_some(Message::Upload)),
            ]
            .spacing(8),
            text(format!("Supported formats: {}", supported_formats()))
                .size(12)
                .style(text::secondary),
        ]
        .spacing(6)
        .into()
    }
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self::new()
    }
}
