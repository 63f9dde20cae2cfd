//! The generation pipeline orchestrator.

use crate::extract::{extract_html, extract_json};
use crate::prompts;
use crate::state::{Phase, PipelineState};
use atelier_core::{
    ContentBasis, EventSink, GenerateRequest, GenerateResponse, MaterialsRequest, ResponseFormat,
};
use atelier_error::{AtelierError, AtelierResult, PipelineError, PipelineErrorKind};
use atelier_interface::{GenerateText, TokenCallback};
use std::sync::Arc;

/// Callback invoked whenever the pipeline changes phase.
pub type PhaseCallback = dyn Fn(Phase) + Send + Sync;

/// Drives a content basis through specification, code, and materials
/// generation, including the two re-entrant flows (manual specification edit
/// and natural-language refinement).
///
/// The pipeline owns its [`PipelineState`] and mutates it through exclusive
/// access, so one pipeline never has overlapping runs. All generation calls
/// go through the injected [`GenerateText`] client, which also receives the
/// event sink for interaction logging.
///
/// Fatal failures (specification, code, refinement) move the pipeline to
/// [`Phase::Error`] while preserving every artifact produced before the
/// failure. Material failures are not fatal: each failed material is
/// replaced by a placeholder and the run still completes as
/// [`Phase::Ready`].
pub struct Pipeline<G: GenerateText> {
    client: G,
    sink: Arc<dyn EventSink>,
    state: PipelineState,
    materials: MaterialsRequest,
    phase_listener: Option<Box<PhaseCallback>>,
    token_listener: Option<Box<TokenCallback>>,
}

impl<G: GenerateText> Pipeline<G> {
    /// Create a pipeline over a generation client and an event sink.
    pub fn new(client: G, sink: Arc<dyn EventSink>) -> Self {
        Self {
            client,
            sink,
            state: PipelineState::default(),
            materials: MaterialsRequest::default(),
            phase_listener: None,
            token_listener: None,
        }
    }

    /// Register a callback observing every phase transition.
    pub fn with_phase_listener(mut self, listener: Box<PhaseCallback>) -> Self {
        self.phase_listener = Some(listener);
        self
    }

    /// Register a callback receiving streamed token fragments.
    pub fn with_token_listener(mut self, listener: Box<TokenCallback>) -> Self {
        self.token_listener = Some(listener);
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(%phase, "Pipeline phase transition");
        self.state.set_phase(phase);
        if let Some(listener) = &self.phase_listener {
            listener(phase);
        }
    }

    /// Record a fatal failure: phase becomes [`Phase::Error`], the message is
    /// stored, and every artifact produced so far stays in place.
    fn fail<T>(&mut self, err: AtelierError) -> AtelierResult<T> {
        tracing::error!(error = %err, "Pipeline run failed");
        self.state.set_last_error(err.to_string());
        self.set_phase(Phase::Error);
        Err(err)
    }

    async fn generate(&mut self, req: &GenerateRequest) -> AtelierResult<GenerateResponse> {
        self.client
            .generate(req, self.token_listener.as_deref(), self.sink.as_ref())
            .await
    }

    /// Start a fresh run from a classified content basis.
    ///
    /// Resets all previous state, generates the specification (video-seeded
    /// or topic-seeded, with search grounding for topics), then the code
    /// artifact, then the requested materials. An empty basis is rejected
    /// before any generation call is made.
    pub async fn start_run(
        &mut self,
        basis: &ContentBasis,
        materials: MaterialsRequest,
    ) -> AtelierResult<()> {
        self.state = PipelineState::default();
        self.materials = materials;

        if basis.is_empty() {
            return self.fail(PipelineError::new(PipelineErrorKind::NoContentBasis).into());
        }

        self.set_phase(Phase::GeneratingSpecification);
        let req = if let Some(video) = &basis.video_reference {
            GenerateRequest {
                prompt: prompts::SPEC_FROM_VIDEO_PROMPT.to_string(),
                video_reference: Some(video.clone()),
                additional_context: basis
                    .topic_or_details
                    .as_ref()
                    .map(|t| format!("User-provided details to consider: {t}")),
                response_format: ResponseFormat::Json,
                streaming: true,
                ..GenerateRequest::default()
            }
        } else if let Some(topic) = &basis.topic_or_details {
            // Search grounding and a strict JSON body are mutually exclusive
            // on the multimodal protocol, so the topic path relies on the
            // prompt alone to shape the response.
            GenerateRequest {
                prompt: prompts::spec_from_topic_prompt(topic),
                use_search: true,
                streaming: true,
                ..GenerateRequest::default()
            }
        } else {
            return self.fail(PipelineError::new(PipelineErrorKind::NoContentBasis).into());
        };

        let response = match self.generate(&req).await {
            Ok(r) => r,
            Err(e) => return self.fail(e),
        };
        if response.has_grounding() {
            self.state.set_grounding(response.grounding.clone());
        }

        let spec = match self.accept_specification(&response.text) {
            Ok(s) => s,
            Err(e) => return self.fail(e),
        };
        self.run_code_and_materials(&spec).await
    }

    /// Replace the specification with user-edited text and regenerate
    /// everything derived from it. A replacement identical to the current
    /// specification (after trimming) is a no-op.
    pub async fn submit_specification_edit(&mut self, replacement: &str) -> AtelierResult<()> {
        let trimmed = replacement.trim();
        if self.state.specification().as_deref() == Some(trimmed) {
            tracing::debug!("Specification edit is identical to current; skipping regeneration");
            return Ok(());
        }

        let spec = trimmed.to_string();
        self.state.set_specification(spec.clone());
        self.state.clear_derived();
        self.state.clear_last_error();
        self.run_code_and_materials(&spec).await
    }

    /// Rewrite the specification from natural-language instructions, then
    /// regenerate everything derived from it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::MissingSpecification`] without touching
    /// state when no specification exists yet.
    pub async fn submit_refinement(&mut self, instructions: &str) -> AtelierResult<()> {
        let Some(current) = self.state.specification().clone() else {
            return Err(PipelineError::new(PipelineErrorKind::MissingSpecification).into());
        };

        self.state.clear_last_error();
        self.set_phase(Phase::RefiningSpecification);
        let req = GenerateRequest {
            prompt: prompts::refine_spec_prompt(&current, instructions),
            response_format: ResponseFormat::Json,
            ..GenerateRequest::default()
        };
        let response = match self.generate(&req).await {
            Ok(r) => r,
            Err(e) => return self.fail(e),
        };

        let spec = match self.accept_specification(&response.text) {
            Ok(s) => s,
            Err(e) => return self.fail(e),
        };
        self.state.clear_derived();
        self.run_code_and_materials(&spec).await
    }

    /// Parse a specification response body, validate the `spec` field, apply
    /// the delivery addendum, and store the result.
    fn accept_specification(&mut self, body: &str) -> AtelierResult<String> {
        let parsed = extract_json(body)?;
        let Some(spec_text) = parsed.get("spec").and_then(|v| v.as_str()) else {
            return Err(PipelineError::new(PipelineErrorKind::InvalidSpecField).into());
        };
        let spec = format!("{spec_text}{}", prompts::SPEC_ADDENDUM);
        self.state.set_specification(spec.clone());
        Ok(spec)
    }

    /// Generate the code artifact from an accepted specification, then the
    /// requested materials, and finish the run.
    async fn run_code_and_materials(&mut self, spec: &str) -> AtelierResult<()> {
        self.set_phase(Phase::GeneratingCode);
        let req = GenerateRequest {
            prompt: spec.to_string(),
            streaming: true,
            ..GenerateRequest::default()
        };
        let response = match self.generate(&req).await {
            Ok(r) => r,
            Err(e) => return self.fail(e),
        };
        self.state.set_code(extract_html(&response.text));

        self.generate_materials(spec).await;
        self.set_phase(Phase::Ready);
        Ok(())
    }

    /// Generate each requested material in order. Failures become
    /// placeholders; none of them abort the run.
    async fn generate_materials(&mut self, spec: &str) {
        let materials = self.materials;

        if materials.lesson_plan {
            self.set_phase(Phase::GeneratingLessonPlan);
            let req = GenerateRequest {
                prompt: prompts::lesson_plan_prompt(spec),
                streaming: true,
                ..GenerateRequest::default()
            };
            let text = match self.generate(&req).await {
                Ok(r) => r.text,
                Err(e) => {
                    tracing::warn!(error = %e, "Lesson plan generation failed");
                    format!("Error generating lesson plan: {e}")
                }
            };
            self.state.set_lesson_plan(text);
        }

        if materials.handout {
            self.set_phase(Phase::GeneratingHandout);
            let req = GenerateRequest {
                prompt: prompts::handout_prompt(spec),
                streaming: true,
                ..GenerateRequest::default()
            };
            let text = match self.generate(&req).await {
                Ok(r) => r.text,
                Err(e) => {
                    tracing::warn!(error = %e, "Handout generation failed");
                    format!("Error generating handout: {e}")
                }
            };
            self.state.set_handout(text);
        }

        if materials.quiz {
            self.set_phase(Phase::GeneratingQuiz);
            let req = GenerateRequest {
                prompt: prompts::quiz_prompt(spec),
                response_format: ResponseFormat::Json,
                streaming: true,
                ..GenerateRequest::default()
            };
            let value = match self.generate(&req).await {
                Ok(r) => match extract_json(&r.text) {
                    Ok(parsed) => match parsed.get("quiz") {
                        Some(quiz) if !quiz.is_null() => quiz.clone(),
                        _ => parsed,
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "Quiz response was not valid JSON");
                        serde_json::json!({ "error": format!("Error generating quiz: {e}") })
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Quiz generation failed");
                    serde_json::json!({ "error": format!("Error generating quiz: {e}") })
                }
            };
            self.state.set_quiz(value);
        }
    }
}
