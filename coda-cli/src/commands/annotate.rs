//! `coda annotate` - run an annotation pipeline over an input file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use coda_core::{
    AnnotationSet, DetailedPrompt, FewShotPrompt, PipelineRunner, PromptStrategy, RunCache,
    RunKey, SimplePrompt, annotated_output_path,
};
use coda_models::{GenerationOptions, ModelProvider, OllamaProvider, provider_for_model};

use crate::config::CodaConfig;

/// Annotate arguments.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Input annotation document (must carry a codebook)
    pub input: PathBuf,

    /// Model to annotate with (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Prompt strategy
    #[arg(short, long, value_enum, default_value_t = PipelineKind::Detailed)]
    pub pipeline: PipelineKind,

    /// Example entry ids for the few-shot pipeline (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub examples: Vec<u64>,

    /// Directory for the annotated output (defaults to the input's)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the run cache and force a fresh run
    #[arg(long)]
    pub no_cache: bool,
}

/// Available prompt strategies.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Minimal zero-shot prompt
    Simple,
    /// Instruction-heavy zero-shot prompt
    Detailed,
    /// Prompt seeded with annotated examples from the input
    FewShot,
}

impl PipelineKind {
    fn strategy(self, examples: &[u64]) -> Box<dyn PromptStrategy> {
        match self {
            PipelineKind::Simple => Box::new(SimplePrompt),
            PipelineKind::Detailed => Box::new(DetailedPrompt),
            PipelineKind::FewShot => Box::new(FewShotPrompt::new(examples.to_vec())),
        }
    }
}

/// Run annotate command.
pub async fn run(args: AnnotateArgs, config: CodaConfig) -> Result<()> {
    let model = args.model.unwrap_or(config.model);
    let strategy = args.pipeline.strategy(&args.examples);
    let key = RunKey::new(&args.input, &model, strategy.name());

    let mut cache = RunCache::open_default();
    if !args.no_cache
        && let Some(cached) = cache.get(&key)
    {
        println!("Cached annotated output: {}", cached.display());
        println!("(pass --no-cache to force a fresh run)");
        return Ok(());
    }

    let set = AnnotationSet::from_path(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let provider = build_provider(&model, config.ollama_base_url.as_deref())?;
    let mut runner = PipelineRunner::new(provider, strategy);
    let run = runner.run(&set).await?;

    let output_path = annotated_output_path(&args.input, args.output_dir.as_deref());
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    run.output.to_path(&output_path)?;

    if !args.no_cache {
        cache.put(&key, &output_path)?;
    }

    info!(run = %run.record.id, "annotation run complete");
    println!("Annotated {} entries with {}.", run.record.entries, run.record.model);
    if run.record.failures > 0 {
        println!(
            "{} entries fell back to an Error annotation; re-run with -v for details.",
            run.record.failures
        );
    }
    println!("Output written to {}", output_path.display());
    Ok(())
}

/// Build a provider for `model`, honoring a custom Ollama endpoint.
fn build_provider(
    model: &str,
    ollama_base_url: Option<&str>,
) -> Result<Box<dyn ModelProvider>> {
    let options = GenerationOptions::default();
    match ollama_base_url {
        // A custom Ollama endpoint serves whatever models it hosts, so
        // skip name-based routing for non-OpenAI models.
        Some(base_url) if !model.to_lowercase().contains("gpt") => Ok(Box::new(
            OllamaProvider::with_base_url(model, options, base_url),
        )),
        _ => Ok(provider_for_model(model, options)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_kind_maps_to_strategy_names() {
        assert_eq!(PipelineKind::Simple.strategy(&[]).name(), "simple");
        assert_eq!(PipelineKind::Detailed.strategy(&[]).name(), "detailed");
        assert_eq!(PipelineKind::FewShot.strategy(&[1, 2]).name(), "few-shot");
    }

    #[test]
    fn build_provider_uses_custom_ollama_endpoint_for_local_models() {
        let provider =
            build_provider("some-local-model", Some("http://10.0.0.2:11434")).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn build_provider_rejects_unknown_model_without_custom_endpoint() {
        assert!(build_provider("some-local-model", None).is_err());
    }
}
