//! Chat endpoint
//!
//! POST /api/chat {"question": "..."} → {"answer": "..."}
//!
//! Agent failures never become HTTP errors: the user gets a generic apology
//! and the cause goes to the log.

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::post, Json, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::http::extractors::ValidQuestion;
use crate::http::server::AppState;

pub const GREETING_REPLY: &str = "Hello! Ask me about your users, products, or orders, \
for example: 'Show total sales amount by user.'";

pub const FAILURE_REPLY: &str = "Sorry, I couldn't answer that one. \
Try rephrasing the question or asking about something more specific.";

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[\s\S]*?```").expect("valid regex"));
static TOOL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)db_exec_tool").expect("valid regex"));
static SQL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSQL\b").expect("valid regex"));

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    /// Set when the agent failed and `answer` is the generic apology
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

/// POST /api/chat
async fn chat(
    State(state): State<Arc<AppState>>,
    ValidQuestion(question): ValidQuestion,
) -> Json<ChatResponse> {
    if question.is_greeting() {
        return Json(ChatResponse {
            answer: GREETING_REPLY.to_string(),
            error: false,
        });
    }

    let response = match state.agent.answer(question.as_str()).await {
        Ok(answer) => ChatResponse {
            answer: sanitize_answer(&answer),
            error: false,
        },
        Err(err) => {
            tracing::error!(question = question.as_str(), error = %err, "Agent failed");
            ChatResponse {
                answer: FAILURE_REPLY.to_string(),
                error: true,
            }
        }
    };

    Json(response)
}

/// Keep implementation details out of user-facing answers.
pub fn sanitize_answer(answer: &str) -> String {
    let text = CODE_FENCE.replace_all(answer, "");
    let text = TOOL_NAME.replace_all(&text, "the database");
    let text = SQL_WORD.replace_all(&text, "the database");
    text.trim().to_string()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat", post(chat))
}
