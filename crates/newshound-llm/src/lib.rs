//! Newshound Selector Generation Layer
//!
//! Implementations of the `SelectorGenerator` trait from
//! `newshound-domain`: an OpenAI-compatible chat-completions provider for
//! production and a scripted mock for tests.
//!
//! The resolution pipeline treats every generator as a pure collaborator:
//! a failed call degrades to an empty proposal, never a crash.
//!
//! # Examples
//!
//! ```
//! use newshound_llm::MockGenerator;
//! use newshound_domain::traits::SelectorGenerator;
//!
//! let generator = MockGenerator::new();
//! let proposal = generator.propose_initial("<html></html>").unwrap();
//! assert!(proposal.title.is_empty());
//! ```

#![warn(missing_docs)]

pub mod openai;
pub mod parser;
pub mod prompt;

use newshound_domain::traits::SelectorGenerator;
use newshound_domain::{Field, FieldSet};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiGenerator;

/// Errors that can occur during selector generation
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response was not the expected JSON shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Generation error: {0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct MockState {
    initial: VecDeque<FieldSet<String>>,
    corrections: VecDeque<BTreeMap<Field, String>>,
    direct: VecDeque<BTreeMap<Field, String>>,
    initial_calls: usize,
    correction_calls: usize,
    direct_calls: usize,
    last_failed: Vec<Field>,
    last_feedback: BTreeMap<Field, String>,
    fail_next: bool,
}

/// Scripted generator for deterministic testing.
///
/// Responses are queued per operation and consumed in order; an exhausted
/// queue yields an empty proposal (the generator "could not improve"
/// anything). Call counts and the most recent correction request are
/// recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    state: Arc<Mutex<MockState>>,
}

impl MockGenerator {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `propose_initial` call.
    pub fn push_initial(&self, proposal: FieldSet<String>) {
        self.state.lock().unwrap().initial.push_back(proposal);
    }

    /// Queue a response for the next `propose_corrections` call.
    pub fn push_correction(&self, proposal: BTreeMap<Field, String>) {
        self.state.lock().unwrap().corrections.push_back(proposal);
    }

    /// Queue a response for the next `extract_direct` call.
    pub fn push_direct(&self, proposal: BTreeMap<Field, String>) {
        self.state.lock().unwrap().direct.push_back(proposal);
    }

    /// Make the next call of any kind return an error.
    pub fn fail_next(&self) {
        self.state.lock().unwrap().fail_next = true;
    }

    /// Number of `propose_initial` calls so far.
    pub fn initial_calls(&self) -> usize {
        self.state.lock().unwrap().initial_calls
    }

    /// Number of `propose_corrections` calls so far.
    pub fn correction_calls(&self) -> usize {
        self.state.lock().unwrap().correction_calls
    }

    /// Number of `extract_direct` calls so far.
    pub fn direct_calls(&self) -> usize {
        self.state.lock().unwrap().direct_calls
    }

    /// Failed fields passed to the most recent correction or direct call.
    pub fn last_failed(&self) -> Vec<Field> {
        self.state.lock().unwrap().last_failed.clone()
    }

    /// Feedback passed to the most recent correction or direct call.
    pub fn last_feedback(&self) -> BTreeMap<Field, String> {
        self.state.lock().unwrap().last_feedback.clone()
    }

    fn take_failure(state: &mut MockState) -> Result<(), LlmError> {
        if state.fail_next {
            state.fail_next = false;
            return Err(LlmError::Other("scripted failure".to_string()));
        }
        Ok(())
    }
}

impl SelectorGenerator for MockGenerator {
    type Error = LlmError;

    fn propose_initial(&self, _cleaned_html: &str) -> Result<FieldSet<String>, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.initial_calls += 1;
        Self::take_failure(&mut state)?;
        Ok(state.initial.pop_front().unwrap_or_default())
    }

    fn propose_corrections(
        &self,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        _current: &FieldSet<String>,
        _cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.correction_calls += 1;
        state.last_failed = failed.to_vec();
        state.last_feedback = feedback.clone();
        Self::take_failure(&mut state)?;
        Ok(state.corrections.pop_front().unwrap_or_default())
    }

    fn extract_direct(
        &self,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        _cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.direct_calls += 1;
        state.last_failed = failed.to_vec();
        state.last_feedback = feedback.clone();
        Self::take_failure(&mut state)?;
        Ok(state.direct.pop_front().unwrap_or_default())
    }
}
