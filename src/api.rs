use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::filters::FilterSelection;

/// Hosted tutor service; overridable via config or EDUQUERY_API_URL.
pub const DEFAULT_ENDPOINT: &str = "https://ai-book-reader.onrender.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub board: String,
    pub language: String,
    #[serde(rename = "classLevel")]
    pub class_level: String,
    pub subject: String,
    pub question: String,
}

impl AskRequest {
    pub fn new(filters: &FilterSelection, question: &str) -> Self {
        Self {
            board: filters.board.clone(),
            language: filters.language.clone(),
            class_level: filters.class_level.clone(),
            subject: filters.subject.clone(),
            question: question.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AskResponse {
    answer: Option<String>,
}

#[derive(Clone)]
pub struct TutorClient {
    client: Client,
    base_url: String,
}

impl TutorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one question. `Ok(None)` means the service answered 2xx but the
    /// body carried no usable answer; callers substitute their fallback text.
    pub async fn ask(&self, request: &AskRequest) -> Result<Option<String>> {
        let url = format!("{}/ask", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "tutor request failed with status: {}",
                response.status()
            ));
        }

        let body: AskResponse = response.json().await?;
        Ok(body.answer.filter(|a| !a.is_empty()))
    }
}
