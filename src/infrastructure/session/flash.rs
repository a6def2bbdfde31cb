use serde::{Deserialize, Serialize};

/// Session key the pending messages live under.
pub const FLASH_KEY: &str = "_flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Errors,
}

/// One-shot messages carried across a redirect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Flash {
    pub fn push(&mut self, level: FlashLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            FlashLevel::Success => self.success.push(message),
            FlashLevel::Errors => self.errors.push(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.errors.is_empty()
    }
}
