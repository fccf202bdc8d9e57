use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use colored::*;
use log::{info, warn};

mod artifact;
mod config;
mod error;
mod event_bus;
mod generator;
mod llm_manager;
mod logger;
mod parser;
mod prompt;
mod providers;
mod render;
mod sections;
mod ui;

use artifact::ArtifactManager;
use config::{ArgOverrides, Config};
use event_bus::{Event, EventBus, EventEmitter};
use generator::{GenerationOutcome, GenerationRequest, QuestionGenerator};
use llm_manager::{LLMManager, LocalProvider};
use render::{OutputFormat, Renderer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Parser)]
#[command(name = "interview_gen", version, about = "AI interview question generator")]
struct Args {
    /// Job role to generate questions for (e.g. "Data Analyst")
    #[arg(short, long)]
    role: String,
    /// Difficulty level
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Total number of questions across all four sections
    #[arg(short = 'n', long)]
    total_questions: Option<usize>,
    /// Provider to use (gemini, openrouter, ollama, local)
    #[arg(short, long)]
    provider: Option<String>,
    /// Model override for the chosen provider
    #[arg(short, long)]
    model: Option<String>,
    /// Output format (terminal, plain, json)
    #[arg(short, long)]
    format: Option<String>,
    /// Save the raw questions as <role>_interview_questions.txt
    #[arg(short, long)]
    save: bool,
    /// Directory for saved question files
    #[arg(short, long)]
    output_dir: Option<String>,
    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,
    /// Use the built-in sample generator instead of a remote model
    #[arg(long)]
    offline: bool,
    /// Run without spinner or colors
    #[arg(long)]
    headless: bool,
    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();
    logger::init(args.verbose);

    let (mut config, config_path) = Config::load(&args.config)?;
    config.merge_with_args(&ArgOverrides {
        total_questions: args.total_questions,
        difficulty: args.difficulty.map(|d| d.label().to_string()),
        format: args.format.clone(),
        output_dir: args.output_dir.clone(),
        save: args.save,
        headless: args.headless,
    });
    let format: OutputFormat = config.output.format.parse()?;

    let bus = Arc::new(EventBus::new(64));
    bus.emit(Event::ConfigLoaded { path: config_path }).await?;

    let llm_manager = if args.offline {
        LLMManager::new(vec![Box::new(LocalProvider)])
    } else {
        LLMManager::from_config(&config, args.provider.as_deref(), args.model.clone())?
    };
    let llm_manager = Arc::new(llm_manager.with_event_bus(bus.clone()));

    let request = GenerationRequest {
        role: args.role.clone(),
        difficulty: config.generation.difficulty.clone(),
        total_questions: config.generation.total_questions,
    };

    let mut ui = ui::UIHandler::new(args.headless || format == OutputFormat::Json);
    ui.start(&bus);
    let outcome = QuestionGenerator::new(llm_manager)
        .with_event_bus(bus.clone())
        .generate_questions(&request)
        .await;
    ui.finish(matches!(outcome, GenerationOutcome::Questions(_)));

    let text = match outcome {
        GenerationOutcome::Questions(text) => text,
        GenerationOutcome::Error(message) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), message);
            std::process::exit(1);
        }
    };

    let (parsed, report) = parser::parse_with_report(&text, request.total_questions);
    bus.emit(Event::ParseCompleted {
        recovered: report.recovered,
        placeholders: report.placeholders,
        dropped: report.dropped,
    })
    .await?;
    if report.placeholders > 0 {
        warn!(
            "Model produced {} of {} questions; {} filled with placeholders",
            report.recovered, request.total_questions, report.placeholders
        );
    }

    Renderer::new(format, config.output.colorful).display(&parsed)?;

    if config.output.save_raw {
        let mut artifacts = ArtifactManager::new(PathBuf::from(&config.output.output_dir))?;
        artifacts.set_event_bus(bus.clone());
        let artifact = artifacts.export_questions(request.role.trim(), &text).await?;
        if format != OutputFormat::Json {
            println!("{} {}", "Saved:".bright_green().bold(), artifact.path.display());
        }
    }

    let metrics = bus.get_metrics().await;
    info!(
        "Done: {} API call(s), {} error(s), ~{} tokens, {} placeholder(s), {} file(s) saved",
        metrics.total_api_calls,
        metrics.api_errors,
        metrics.total_tokens,
        metrics.placeholders_injected,
        metrics.artifacts_created
    );

    Ok(())
}
