//! Recording UI for command tests.
//!
//! Every line a command emits lands in a per-channel buffer, and prompt
//! answers are scripted up front by prompt key.
//!
//! # Example
//!
//! ```
//! use envpull::ui::{confirm, MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("overwrite", "yes");
//!
//! assert!(confirm(&mut ui, "overwrite", "Overwrite?", false).unwrap());
//! ui.success("Done!");
//!
//! assert!(ui.has_success("Done!"));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::env::DiffLine;
use crate::error::Result;

use super::{parse_bool_answer, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// A [`UserInterface`] that records instead of printing.
///
/// Answers come from a per-key queue first, then a fixed per-key answer,
/// then the prompt default.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    infos: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    outputs: Vec<String>,
    diff_lines: Vec<DiffLine>,
    hints: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Recorder reporting `mode` as its output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Answer every `key` prompt with `response`.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Answer successive `key` prompts with `responses`, in order.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Text written with `output`, in order.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// All `output` text joined together.
    pub fn output_text(&self) -> String {
        self.outputs.concat()
    }

    /// Diff lines written, in order.
    pub fn diff_lines(&self) -> &[DiffLine] {
        &self.diff_lines
    }

    /// Spinner labels, in start order.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Keys of the prompts asked.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, needle: &str) -> bool {
        contains(&self.messages, needle)
    }

    pub fn has_info(&self, needle: &str) -> bool {
        contains(&self.infos, needle)
    }

    pub fn has_success(&self, needle: &str) -> bool {
        contains(&self.successes, needle)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        contains(&self.warnings, needle)
    }

    pub fn has_error(&self, needle: &str) -> bool {
        contains(&self.errors, needle)
    }

    pub fn has_hint(&self, needle: &str) -> bool {
        contains(&self.hints, needle)
    }

    fn answer(prompt: &Prompt, response: &str) -> PromptResult {
        match prompt.prompt_type {
            PromptType::Confirm => {
                PromptResult::Bool(parse_bool_answer(response).unwrap_or(false))
            }
            PromptType::Input => PromptResult::String(response.to_string()),
        }
    }
}

fn contains(lines: &[String], needle: &str) -> bool {
    lines.iter().any(|line| line.contains(needle))
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn info(&mut self, msg: &str) {
        self.infos.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn output(&mut self, text: &str) {
        self.outputs.push(text.to_string());
    }

    fn diff_line(&mut self, line: &DiffLine) {
        self.diff_lines.push(line.clone());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        if let Some(queue) = self.prompt_queues.get_mut(&prompt.key) {
            if let Some(response) = queue.pop_front() {
                return Ok(Self::answer(prompt, &response));
            }
        }

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(Self::answer(prompt, response));
        }

        if let Some(default) = &prompt.default {
            return Ok(Self::answer(prompt, default));
        }

        // Type-appropriate empty answer as a last resort
        Ok(Self::answer(prompt, ""))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner that remembers whether it was cleared.
#[derive(Debug, Default)]
pub struct MockSpinner {
    cleared: bool,
}

impl MockSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_and_clear(&mut self) {
        self.cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::LineKind;

    #[test]
    fn captures_messages_by_kind() {
        let mut ui = MockUI::new();

        ui.message("plain");
        ui.info("info");
        ui.success("done");
        ui.warning("careful");
        ui.error("broken");
        ui.show_hint("try this");

        assert!(ui.has_message("plain"));
        assert!(ui.has_info("info"));
        assert!(ui.has_success("done"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
        assert!(ui.has_hint("try this"));
    }

    #[test]
    fn captures_output_and_diff_lines() {
        let mut ui = MockUI::new();

        ui.output("A=1\n");
        ui.output("B=2\n");
        ui.diff_line(&DiffLine {
            kind: LineKind::Added,
            text: "  + C=3".into(),
        });

        assert_eq!(ui.output_text(), "A=1\nB=2\n");
        assert_eq!(ui.diff_lines().len(), 1);
    }

    #[test]
    fn queued_responses_come_first() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses("name", vec!["first", "second"]);
        ui.set_prompt_response("name", "fallback");
        let prompt = Prompt::input("name", "Name", None);

        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "first");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "second");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "fallback");
        assert_eq!(ui.prompts_shown().len(), 3);
    }

    #[test]
    fn confirm_without_response_uses_default() {
        let mut ui = MockUI::new();

        let result = ui.prompt(&Prompt::confirm("go", "Go?", true)).unwrap();

        assert_eq!(result, PromptResult::Bool(true));
    }

    #[test]
    fn input_without_response_or_default_is_empty() {
        let mut ui = MockUI::new();

        let result = ui.prompt(&Prompt::input("name", "Name", None)).unwrap();

        assert_eq!(result.as_string(), "");
    }

    #[test]
    fn spinner_records_start_message() {
        let mut ui = MockUI::new();

        let mut spinner = ui.start_spinner("Downloading");
        spinner.finish_and_clear();

        assert_eq!(ui.spinners(), ["Downloading"]);
    }

    #[test]
    fn mock_spinner_tracks_clearing() {
        let mut spinner = MockSpinner::new();
        assert!(!spinner.is_cleared());

        spinner.finish_and_clear();

        assert!(spinner.is_cleared());
    }
}
