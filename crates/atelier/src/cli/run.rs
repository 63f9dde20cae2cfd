//! Generation run command handler.

use crate::cli::BackendArg;
use atelier::{
    classify, BackendConfig, EventSink, GenerationClient, InteractionLog, InteractionPayload,
    MaterialsRequest, Pipeline, PipelineState, Protocol, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENROUTER_MODEL,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Run one full generation pass and write the resulting artifacts.
///
/// The input string is classified into a content basis (video URL and/or
/// topic). Artifacts land in `output` when given, one file per artifact;
/// otherwise the app code goes to stdout and materials follow with headers.
pub async fn run_generation(
    input: &str,
    backend: BackendArg,
    model: Option<String>,
    api_key: Option<String>,
    materials: MaterialsRequest,
    output: Option<&Path>,
    show_log: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let basis = classify(input);
    if basis.is_empty() {
        return Err("provide a video URL, a topic, or both".into());
    }
    if let Some(video) = &basis.video_reference {
        info!(video = %video, "Using video reference");
    }
    if let Some(topic) = &basis.topic_or_details {
        info!(topic = %topic, "Using topic text");
    }

    let protocol = Protocol::from(backend);
    let model = model.unwrap_or_else(|| {
        match protocol {
            Protocol::Gemini => DEFAULT_GEMINI_MODEL,
            Protocol::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        }
        .to_string()
    });
    let mut config = BackendConfig::from_env(protocol, model);
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    let log = Arc::new(InteractionLog::default());
    let sink: Arc<dyn EventSink> = Arc::clone(&log) as Arc<dyn EventSink>;
    let mut pipeline = Pipeline::new(GenerationClient::new(config), sink)
        .with_phase_listener(Box::new(|phase| info!(%phase, "Pipeline phase")));

    let result = pipeline.start_run(&basis, materials).await;
    if show_log {
        print_log(&log);
    }
    result?;

    write_artifacts(pipeline.state(), output)?;
    Ok(())
}

/// Write run artifacts to a directory, or to stdout when none was given.
fn write_artifacts(
    state: &PipelineState,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            if let Some(spec) = state.specification() {
                std::fs::write(dir.join("specification.md"), spec)?;
            }
            if let Some(code) = state.code() {
                std::fs::write(dir.join("app.html"), code)?;
            }
            if let Some(plan) = state.lesson_plan() {
                std::fs::write(dir.join("lesson_plan.md"), plan)?;
            }
            if let Some(handout) = state.handout() {
                std::fs::write(dir.join("handout.md"), handout)?;
            }
            if let Some(quiz) = state.quiz() {
                std::fs::write(dir.join("quiz.json"), serde_json::to_string_pretty(quiz)?)?;
            }
            if !state.grounding().is_empty() {
                let sources: Vec<String> = state
                    .grounding()
                    .iter()
                    .map(|g| format!("- [{}]({})", g.title, g.uri))
                    .collect();
                std::fs::write(dir.join("sources.md"), sources.join("\n"))?;
            }
            info!(dir = %dir.display(), "Artifacts written");
        }
        None => {
            if let Some(code) = state.code() {
                println!("{code}");
            }
            if let Some(plan) = state.lesson_plan() {
                println!("\n=== Lesson Plan ===\n{plan}");
            }
            if let Some(handout) = state.handout() {
                println!("\n=== Handout ===\n{handout}");
            }
            if let Some(quiz) = state.quiz() {
                println!("\n=== Quiz ===\n{}", serde_json::to_string_pretty(quiz)?);
            }
            for source in state.grounding() {
                println!("Source: {} <{}>", source.title, source.uri);
            }
        }
    }
    Ok(())
}

/// Print a one-line summary of each recorded interaction event.
fn print_log(log: &InteractionLog) {
    for event in log.snapshot() {
        let summary = match &event.payload {
            InteractionPayload::Prompt(req) => {
                format!("PROMPT ({} chars)", req.full_prompt().len())
            }
            InteractionPayload::Token(t) => format!("TOKEN ({} chars)", t.len()),
            InteractionPayload::Response(v) => format!(
                "RESPONSE ({} chars)",
                v.get("text").and_then(|t| t.as_str()).map_or(0, str::len)
            ),
            InteractionPayload::Error(report) => {
                format!("ERROR [{}] {}", report.kind, report.message)
            }
        };
        eprintln!("{} {} {}", event.timestamp.to_rfc3339(), event.model, summary);
    }
}
