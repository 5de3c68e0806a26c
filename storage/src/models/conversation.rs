//! Conversation and message turn models.
//!
//! A conversation is keyed by Telegram chat id and only ever grows. `/reset` moves
//! `context_start` instead of dropping turns; [`Conversation::active_turns`] is what goes into prompts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn. Older documents use `human` / `ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "human" => Ok(TurnRole::User),
            "assistant" | "ai" => Ok(TurnRole::Assistant),
            other => Err(format!("unknown turn role: {}", other)),
        }
    }
}

/// One stored message. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTurn {
    #[serde(alias = "author")]
    pub role: TurnRole,
    #[serde(alias = "content")]
    pub text: String,
    /// Missing in legacy documents; defaults to the Unix epoch.
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl MessageTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text)
    }

    fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub chat_id: i64,
    #[serde(default)]
    pub messages: Vec<MessageTurn>,
    /// Index of the first turn still sent to the LLM.
    #[serde(default)]
    pub context_start: u32,
}

impl Conversation {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            messages: Vec::new(),
            context_start: 0,
        }
    }

    /// Turns after the reset marker. A marker past the end yields an empty slice.
    pub fn active_turns(&self) -> &[MessageTurn] {
        let start = (self.context_start as usize).min(self.messages.len());
        &self.messages[start..]
    }

    /// Active turns, keeping only the newest `limit` (0 = all).
    pub fn recent_turns(&self, limit: usize) -> &[MessageTurn] {
        let active = self.active_turns();
        if limit == 0 || active.len() <= limit {
            active
        } else {
            &active[active.len() - limit..]
        }
    }
}
