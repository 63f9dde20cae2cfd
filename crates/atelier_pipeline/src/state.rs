//! Observable pipeline state.

use atelier_core::GroundingReference;
use derive_getters::Getters;
use serde::Serialize;

/// The phase a pipeline run is currently in.
///
/// `Idle` is the initial phase; `Ready` and `Error` are the terminal phases
/// of a run. Everything in between is a loading phase during which the
/// pipeline rejects new commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum Phase {
    /// No run has started since construction or the last reset.
    #[default]
    Idle,
    /// Producing the app specification from the content basis.
    GeneratingSpecification,
    /// Producing the interactive HTML artifact from the specification.
    GeneratingCode,
    /// Rewriting the specification from user refinement instructions.
    RefiningSpecification,
    /// Producing the lesson-plan material.
    GeneratingLessonPlan,
    /// Producing the handout material.
    GeneratingHandout,
    /// Producing the quiz material.
    GeneratingQuiz,
    /// The run completed; artifacts are available.
    Ready,
    /// The run failed; [`PipelineState::last_error`] describes why.
    Error,
}

impl Phase {
    /// Whether the pipeline is mid-run and should refuse new commands.
    pub fn is_loading(&self) -> bool {
        !matches!(self, Phase::Idle | Phase::Ready | Phase::Error)
    }
}

/// Snapshot of every artifact a run has produced so far.
///
/// Fields are only ever cleared at well-defined points: a new run resets the
/// whole state, a specification edit or refinement clears the code and
/// materials, and a failure preserves whatever the run had already produced.
#[derive(Debug, Default, Clone, Getters, Serialize)]
pub struct PipelineState {
    /// Current phase.
    phase: Phase,
    /// The accepted app specification, with the delivery addendum applied.
    specification: Option<String>,
    /// The interactive HTML artifact.
    code: Option<String>,
    /// Lesson-plan material, or a failure placeholder.
    lesson_plan: Option<String>,
    /// Handout material, or a failure placeholder.
    handout: Option<String>,
    /// Quiz material as structured JSON, or a failure placeholder.
    quiz: Option<serde_json::Value>,
    /// Web sources that grounded a topic-seeded specification.
    grounding: Vec<GroundingReference>,
    /// Message from the most recent fatal failure.
    last_error: Option<String>,
}

impl PipelineState {
    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_specification(&mut self, spec: String) {
        self.specification = Some(spec);
    }

    pub(crate) fn set_code(&mut self, code: String) {
        self.code = Some(code);
    }

    pub(crate) fn set_lesson_plan(&mut self, text: String) {
        self.lesson_plan = Some(text);
    }

    pub(crate) fn set_handout(&mut self, text: String) {
        self.handout = Some(text);
    }

    pub(crate) fn set_quiz(&mut self, value: serde_json::Value) {
        self.quiz = Some(value);
    }

    pub(crate) fn set_grounding(&mut self, grounding: Vec<GroundingReference>) {
        self.grounding = grounding;
    }

    pub(crate) fn set_last_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub(crate) fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    /// Drop the code artifact and all materials, keeping the specification.
    pub(crate) fn clear_derived(&mut self) {
        self.code = None;
        self.lesson_plan = None;
        self.handout = None;
        self.quiz = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_phases() {
        assert!(!Phase::Idle.is_loading());
        assert!(!Phase::Ready.is_loading());
        assert!(!Phase::Error.is_loading());
        assert!(Phase::GeneratingSpecification.is_loading());
        assert!(Phase::RefiningSpecification.is_loading());
        assert!(Phase::GeneratingQuiz.is_loading());
    }

    #[test]
    fn clear_derived_keeps_specification() {
        let mut state = PipelineState::default();
        state.set_specification("spec".into());
        state.set_code("<html></html>".into());
        state.set_handout("handout".into());
        state.clear_derived();
        assert!(state.specification().is_some());
        assert!(state.code().is_none());
        assert!(state.handout().is_none());
    }
}
