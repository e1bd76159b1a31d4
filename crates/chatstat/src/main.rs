mod bootstrap;
mod table;

use anyhow::{bail, Context, Result};
use chatstat_core::sentiment::NaiveBayesClassifier;
use chatstat_core::settings::Settings;
use chatstat_data::aggregator::ChatStat;
use chatstat_data::analysis::{analyze_file, AnalysisResult};
use chatstat_data::corpus::load_training_corpus;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .as_deref()
        .map(|p| bootstrap::resolve_log_file(&app_dir, p));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("chatstat v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Transcript: {}, format: {}",
        settings.transcript.display(),
        settings.format
    );

    let mut analysis = analyze_file(&settings.transcript)
        .with_context(|| format!("analysing {}", settings.transcript.display()))?;

    if settings.classify {
        classify(&mut analysis.stat, &settings)?;
    }

    println!("{}", render(&analysis, &settings)?);
    Ok(())
}

/// Train the mood classifier from the configured corpus and label every message.
fn classify(stat: &mut ChatStat, settings: &Settings) -> Result<()> {
    let Some(corpus_dir) = settings.corpus_dir.as_deref() else {
        bail!("--classify needs a training corpus; pass --corpus-dir");
    };

    let documents = load_training_corpus(corpus_dir, settings.training_size)?;
    let classifier = NaiveBayesClassifier::train(
        documents.iter().map(|d| (d.text.as_str(), d.label)),
        settings.min_certainty,
    )?;
    tracing::info!(
        "Classifier ready: {} features, min certainty {}",
        classifier.vocabulary_size(),
        settings.min_certainty
    );

    stat.classify_messages(&classifier);
    Ok(())
}

fn render(analysis: &AnalysisResult, settings: &Settings) -> Result<String> {
    let stat = &analysis.stat;
    let json = settings.format == "json";

    if let Some(name) = settings.author.as_deref() {
        let id = stat.find_author(name)?.id;
        let summary = stat.author_summary(id);
        let mood = stat.mood_tally(id);
        return Ok(if json {
            serde_json::to_string_pretty(&serde_json::json!({
                "author": summary,
                "mood": mood,
            }))?
        } else {
            table::render_author(&summary, Some(&mood))
        });
    }

    let report = stat.report();
    Ok(if json {
        serde_json::to_string_pretty(&serde_json::json!({
            "metadata": analysis.metadata,
            "report": report,
        }))?
    } else {
        format!(
            "{}\n{}",
            table::render_overview(&analysis.metadata),
            table::render_report(&report)
        )
    })
}
