//! End-to-end pipeline flow tests against a scripted generation client.

use async_trait::async_trait;
use atelier_core::{
    classify, ContentBasis, EventSink, GenerateRequest, GenerateResponse, GroundingReference,
    MaterialsRequest, NullSink, ResponseFormat,
};
use atelier_error::{
    AtelierErrorKind, AtelierResult, PipelineErrorKind, TransportError,
};
use atelier_interface::{GenerateText, TokenCallback};
use atelier_pipeline::{prompts, Phase, Pipeline};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays a fixed script of responses and records every request it saw.
struct ScriptedClient {
    script: Mutex<VecDeque<AtelierResult<GenerateResponse>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedClient {
    fn new(script: Vec<AtelierResult<GenerateResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Arc<Mutex<Vec<GenerateRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl GenerateText for ScriptedClient {
    async fn generate(
        &self,
        req: &GenerateRequest,
        _on_token: Option<&TokenCallback>,
        _sink: &dyn EventSink,
    ) -> AtelierResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted: unexpected generation call")
    }
}

fn text_response(text: &str) -> AtelierResult<GenerateResponse> {
    Ok(GenerateResponse {
        text: text.to_string(),
        grounding: Vec::new(),
    })
}

fn spec_response(spec: &str) -> AtelierResult<GenerateResponse> {
    text_response(&format!(
        "```json\n{}\n```",
        serde_json::json!({ "spec": spec })
    ))
}

fn code_response() -> AtelierResult<GenerateResponse> {
    text_response("```html\n<!DOCTYPE html><html><body>app</body></html>\n```")
}

fn transport_failure() -> AtelierResult<GenerateResponse> {
    Err(TransportError::with_status(503, "Service Unavailable").into())
}

fn pipeline(client: ScriptedClient) -> Pipeline<ScriptedClient> {
    Pipeline::new(client, Arc::new(NullSink))
}

#[tokio::test]
async fn video_run_produces_spec_code_and_materials() -> anyhow::Result<()> {
    let client = ScriptedClient::new(vec![
        spec_response("Build a tides app."),
        code_response(),
        text_response("## Lesson Plan"),
        text_response("## Handout"),
        text_response(
            "```json\n{\"quiz\": [{\"question\": \"Q?\", \"options\": [\"a\"], \"correctAnswer\": \"a\"}]}\n```",
        ),
    ]);
    let requests = client.requests();
    let mut pipeline = pipeline(client);

    let basis = classify("https://youtu.be/dQw4w9WgXcQ make it about tides");
    let materials = MaterialsRequest {
        lesson_plan: true,
        handout: true,
        quiz: true,
    };
    pipeline.start_run(&basis, materials).await?;

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Ready);
    let spec = state.specification().as_deref().unwrap();
    assert!(spec.starts_with("Build a tides app."));
    assert!(spec.ends_with(prompts::SPEC_ADDENDUM));
    assert_eq!(
        state.code().as_deref(),
        Some("<!DOCTYPE html><html><body>app</body></html>")
    );
    assert_eq!(state.lesson_plan().as_deref(), Some("## Lesson Plan"));
    assert_eq!(state.handout().as_deref(), Some("## Handout"));
    // The quiz array is unwrapped from its "quiz" key.
    assert!(state.quiz().as_ref().unwrap().is_array());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 5);
    let spec_req = &requests[0];
    assert_eq!(
        spec_req.video_reference.as_deref(),
        Some("https://youtu.be/dQw4w9WgXcQ")
    );
    assert_eq!(
        spec_req.additional_context.as_deref(),
        Some("User-provided details to consider: make it about tides")
    );
    assert_eq!(spec_req.response_format, ResponseFormat::Json);
    assert!(spec_req.streaming);
    assert!(!spec_req.use_search);
    // The code prompt is the accepted specification itself.
    assert!(requests[1].prompt.ends_with(prompts::SPEC_ADDENDUM));
    Ok(())
}

#[tokio::test]
async fn topic_run_enables_search_and_keeps_grounding() {
    let grounded_spec = GenerateResponse {
        text: serde_json::json!({ "spec": "Build a photosynthesis app." }).to_string(),
        grounding: vec![GroundingReference {
            title: "Photosynthesis".to_string(),
            uri: "https://example.org/photosynthesis".to_string(),
        }],
    };
    let client = ScriptedClient::new(vec![Ok(grounded_spec), code_response()]);
    let requests = client.requests();
    let mut pipeline = pipeline(client);

    let basis = classify("photosynthesis");
    pipeline
        .start_run(&basis, MaterialsRequest::default())
        .await
        .unwrap();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Ready);
    assert_eq!(state.grounding().len(), 1);
    assert!(state.lesson_plan().is_none());
    assert!(state.handout().is_none());
    assert!(state.quiz().is_none());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2, "no material calls were requested");
    assert!(requests[0].use_search);
    assert_eq!(requests[0].response_format, ResponseFormat::Text);
    assert!(requests[0].prompt.contains("Topic: \"photosynthesis\""));
}

#[tokio::test]
async fn empty_basis_fails_before_any_generation_call() {
    let client = ScriptedClient::new(vec![]);
    let mut pipeline = pipeline(client);

    let err = pipeline
        .start_run(&ContentBasis::default(), MaterialsRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        AtelierErrorKind::Pipeline(p) if p.kind == PipelineErrorKind::NoContentBasis
    ));
    assert_eq!(*pipeline.state().phase(), Phase::Error);
    assert!(pipeline.state().last_error().is_some());
}

#[tokio::test]
async fn fatal_spec_failure_leaves_no_artifacts() {
    let client = ScriptedClient::new(vec![transport_failure()]);
    let mut pipeline = pipeline(client);

    let basis = classify("tides");
    pipeline
        .start_run(&basis, MaterialsRequest::default())
        .await
        .unwrap_err();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Error);
    assert!(state.specification().is_none());
    assert!(state.code().is_none());
    assert!(state
        .last_error()
        .as_deref()
        .unwrap()
        .contains("Service Unavailable"));
}

#[tokio::test]
async fn fatal_code_failure_keeps_specification() {
    let client = ScriptedClient::new(vec![spec_response("Build it."), transport_failure()]);
    let mut pipeline = pipeline(client);

    let basis = classify("tides");
    pipeline
        .start_run(&basis, MaterialsRequest::default())
        .await
        .unwrap_err();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Error);
    assert!(state.specification().is_some());
    assert!(state.code().is_none());
}

#[tokio::test]
async fn spec_without_spec_field_is_rejected() {
    let client = ScriptedClient::new(vec![text_response("{\"title\": \"not a spec\"}")]);
    let mut pipeline = pipeline(client);

    let err = pipeline
        .start_run(&classify("tides"), MaterialsRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        AtelierErrorKind::Pipeline(p) if p.kind == PipelineErrorKind::InvalidSpecField
    ));
    assert_eq!(*pipeline.state().phase(), Phase::Error);
}

#[tokio::test]
async fn quiz_failure_is_a_placeholder_not_a_run_failure() {
    let client = ScriptedClient::new(vec![
        spec_response("Build it."),
        code_response(),
        transport_failure(),
    ]);
    let mut pipeline = pipeline(client);

    let materials = MaterialsRequest {
        quiz: true,
        ..Default::default()
    };
    pipeline
        .start_run(&classify("tides"), materials)
        .await
        .unwrap();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Ready);
    let quiz = state.quiz().as_ref().unwrap();
    assert!(quiz["error"]
        .as_str()
        .unwrap()
        .starts_with("Error generating quiz:"));
}

#[tokio::test]
async fn unparseable_quiz_becomes_a_placeholder() {
    let client = ScriptedClient::new(vec![
        spec_response("Build it."),
        code_response(),
        text_response("this is not json"),
    ]);
    let mut pipeline = pipeline(client);

    let materials = MaterialsRequest {
        quiz: true,
        ..Default::default()
    };
    pipeline
        .start_run(&classify("tides"), materials)
        .await
        .unwrap();

    assert_eq!(*pipeline.state().phase(), Phase::Ready);
    assert!(pipeline.state().quiz().as_ref().unwrap()["error"].is_string());
}

#[tokio::test]
async fn identical_specification_edit_is_a_no_op() {
    let client = ScriptedClient::new(vec![spec_response("Build it."), code_response()]);
    let requests = client.requests();
    let mut pipeline = pipeline(client);

    pipeline
        .start_run(&classify("tides"), MaterialsRequest::default())
        .await
        .unwrap();
    let current = pipeline.state().specification().clone().unwrap();
    let code_before = pipeline.state().code().clone();

    // Surrounding whitespace does not count as a change.
    pipeline
        .submit_specification_edit(&format!("  {current}  "))
        .await
        .unwrap();

    assert_eq!(requests.lock().unwrap().len(), 2, "no regeneration calls");
    assert_eq!(*pipeline.state().code(), code_before);
    assert_eq!(*pipeline.state().phase(), Phase::Ready);
}

#[tokio::test]
async fn specification_edit_regenerates_code_and_materials() {
    let client = ScriptedClient::new(vec![
        spec_response("Build it."),
        code_response(),
        text_response("## Lesson Plan"),
        text_response("```html\n<p>new app</p>\n```"),
        text_response("## New Lesson Plan"),
    ]);
    let mut pipeline = pipeline(client);

    let materials = MaterialsRequest {
        lesson_plan: true,
        ..Default::default()
    };
    pipeline
        .start_run(&classify("tides"), materials)
        .await
        .unwrap();

    pipeline
        .submit_specification_edit("A hand-edited specification.")
        .await
        .unwrap();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Ready);
    assert_eq!(
        state.specification().as_deref(),
        Some("A hand-edited specification.")
    );
    assert_eq!(state.code().as_deref(), Some("<p>new app</p>"));
    assert_eq!(state.lesson_plan().as_deref(), Some("## New Lesson Plan"));
}

#[tokio::test]
async fn refinement_requires_an_existing_specification() {
    let client = ScriptedClient::new(vec![]);
    let mut pipeline = pipeline(client);

    let err = pipeline.submit_refinement("make it purple").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        AtelierErrorKind::Pipeline(p) if p.kind == PipelineErrorKind::MissingSpecification
    ));
    // The precondition failure leaves state untouched.
    assert_eq!(*pipeline.state().phase(), Phase::Idle);
    assert!(pipeline.state().last_error().is_none());
}

#[tokio::test]
async fn refinement_rewrites_spec_and_regenerates() {
    let client = ScriptedClient::new(vec![
        spec_response("Build it."),
        code_response(),
        spec_response("Build it, but purple."),
        text_response("```html\n<p>purple app</p>\n```"),
    ]);
    let requests = client.requests();
    let mut pipeline = pipeline(client);

    pipeline
        .start_run(&classify("tides"), MaterialsRequest::default())
        .await
        .unwrap();
    pipeline.submit_refinement("make it purple").await.unwrap();

    let state = pipeline.state();
    assert_eq!(*state.phase(), Phase::Ready);
    assert!(state
        .specification()
        .as_deref()
        .unwrap()
        .starts_with("Build it, but purple."));
    assert_eq!(state.code().as_deref(), Some("<p>purple app</p>"));

    let requests = requests.lock().unwrap();
    let refine_req = &requests[2];
    assert_eq!(refine_req.response_format, ResponseFormat::Json);
    assert!(!refine_req.streaming, "refinement is a buffered call");
    assert!(refine_req.prompt.contains("make it purple"));
    assert!(refine_req.prompt.contains("Build it."));
}

#[tokio::test]
async fn phase_listener_observes_the_full_run() {
    let client = ScriptedClient::new(vec![spec_response("Build it."), code_response()]);
    let observed: Arc<Mutex<Vec<Phase>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let mut pipeline = pipeline(client).with_phase_listener(Box::new(move |phase| {
        sink.lock().unwrap().push(phase);
    }));

    pipeline
        .start_run(&classify("tides"), MaterialsRequest::default())
        .await
        .unwrap();

    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            Phase::GeneratingSpecification,
            Phase::GeneratingCode,
            Phase::Ready,
        ]
    );
}
