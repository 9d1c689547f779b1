//! Conversational assistant contract
//!
//! Request and response types exchanged with the assistant endpoint, and the
//! prompt context assembled from conversation history and health data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::WeeklyView;
use crate::error::Result;

/// One turn of a conversation, tagged by speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversationTurn {
    User {
        text: String,
    },
    Ai {
        response: String,
        #[serde(
            rename = "followUpQuestions",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        follow_up_questions: Option<Vec<String>>,
    },
}

/// Request sent to the assistant endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub query: String,
    #[serde(default, alias = "whoopData")]
    pub health_data: Value,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Reply from the assistant endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_questions: Option<Vec<String>>,
}

impl ChatResponse {
    /// The same reply as a history turn
    pub fn into_turn(self) -> ConversationTurn {
        ConversationTurn::Ai {
            response: self.response,
            follow_up_questions: self.follow_up_questions,
        }
    }
}

impl ChatRequest {
    /// Request carrying a weekly view as its health data
    pub fn for_view(
        query: impl Into<String>,
        view: &WeeklyView,
        conversation_history: Vec<ConversationTurn>,
    ) -> Result<Self> {
        Ok(ChatRequest {
            query: query.into(),
            health_data: serde_json::to_value(view)?,
            conversation_history,
        })
    }

    /// Prompt context for this request
    pub fn context(&self, retrieved: &str) -> Result<String> {
        build_context(&self.conversation_history, retrieved, &self.health_data)
    }
}

/// Format prior turns as a prompt preamble
///
/// The last turn is the question being asked and is left out.
pub fn format_history(history: &[ConversationTurn]) -> String {
    let Some((_, previous)) = history.split_last() else {
        return String::new();
    };

    let mut formatted = String::from("Previous conversation:\n");
    for turn in previous {
        match turn {
            ConversationTurn::User { text } => {
                formatted.push_str(&format!("User: {}\n", text));
            }
            ConversationTurn::Ai { response, .. } => {
                formatted.push_str(&format!("Assistant: {}\n", response));
            }
        }
    }
    formatted.push_str("\nCurrent question:\n");
    formatted
}

/// Combine history, retrieved knowledge and health data into one context
pub fn build_context(history: &[ConversationTurn], retrieved: &str, health_data: &Value) -> Result<String> {
    let health_section = if health_data.is_null() {
        String::new()
    } else {
        format!(
            "User's Health Data (JSON format):\n{}\n",
            serde_json::to_string_pretty(health_data)?
        )
    };

    Ok(format!(
        "{}\n{}\n\n{}",
        format_history(history),
        retrieved,
        health_section
    ))
}
