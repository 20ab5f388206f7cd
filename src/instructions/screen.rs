// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instruction display collaborator.

/// Default heading, shown when nothing else applies
pub const DEFAULT_TITLE: &str = "Congratulations!";

/// Default description
pub const DEFAULT_DESCRIPTION: &str = "You have assembled the engine!";

/// Receives the instruction for the active unit
pub trait InstructionDisplay {
    /// Show a title and description
    fn display(&mut self, title: &str, description: &str);

    /// Fall back to the default text
    fn display_default(&mut self);

    /// Currently shown title and description
    fn current(&self) -> (&str, &str);
}

/// In-memory instruction screen
#[derive(Debug, Clone)]
pub struct InstructionScreen {
    /// Shown title
    title: String,
    /// Shown description
    description: String,
    /// Fallback title
    default_title: String,
    /// Fallback description
    default_description: String,
    /// Number of updates received
    updates: usize,
}

impl InstructionScreen {
    /// Create a screen with the stock defaults
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_TITLE, DEFAULT_DESCRIPTION)
    }

    /// Create a screen with custom defaults
    pub fn with_defaults(title: impl Into<String>, description: impl Into<String>) -> Self {
        let title = title.into();
        let description = description.into();
        Self {
            title: title.clone(),
            description: description.clone(),
            default_title: title,
            default_description: description,
            updates: 0,
        }
    }

    /// Number of updates received
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Default for InstructionScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionDisplay for InstructionScreen {
    fn display(&mut self, title: &str, description: &str) {
        self.title = title.to_string();
        self.description = description.to_string();
        self.updates += 1;
        tracing::debug!(title, description, "Instruction screen updated");
    }

    fn display_default(&mut self) {
        let (title, description) = (self.default_title.clone(), self.default_description.clone());
        self.display(&title, &description);
    }

    fn current(&self) -> (&str, &str) {
        (&self.title, &self.description)
    }
}
