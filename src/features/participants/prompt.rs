//! Persona prompt construction
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Template-based builder with context placeholder

/// Placeholder replaced by the recent conversation
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Builder for the single user message sent to a participant
///
/// # Example
///
/// ```ignore
/// let prompt = PromptBuilder::new(&config.prompt_template)
///     .with_context("Is free will compatible with determinism?")
///     .build();
/// ```
pub struct PromptBuilder<'a> {
    template: &'a str,
    context: String,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            context: String::new(),
        }
    }

    /// Set the recent conversation, newest line last
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    /// Build the final prompt
    pub fn build(self) -> String {
        if self.template.contains(CONTEXT_PLACEHOLDER) {
            self.template.replace(CONTEXT_PLACEHOLDER, &self.context)
        } else {
            // Templates without a placeholder still get the conversation
            format!(
                "{}\n\nHere's the recent conversation:\n\n{}",
                self.template.trim_end(),
                self.context
            )
        }
    }
}
