use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mnemo_core::breakdown::parse_breakdown;
use mnemo_core::{parse_batch_results, slugify, Language};

#[derive(Parser)]
#[command(name = "mnemo")]
#[command(about = "Medical mnemonic batch tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a batch results file and print canonical results as JSON
    Parse {
        /// Line-delimited batch results file
        results: PathBuf,
        /// Batch request list used for correlation linking
        #[arg(long)]
        inputs: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Write each canonical result to its own JSON file
    Export {
        /// Line-delimited batch results file
        results: PathBuf,
        /// Directory to write per-result files into
        out_dir: PathBuf,
        /// Batch request list used for correlation linking
        #[arg(long)]
        inputs: Option<PathBuf>,
    },
    /// Parse a topic-breakdown markdown document into a batch request list
    Breakdown {
        /// Markdown document produced by the breakdown step
        markdown: PathBuf,
        /// Language code recorded on each item
        #[arg(long, default_value = "en")]
        language: Language,
        /// Source name recorded on each item
        #[arg(long, default_value = "Unknown Source")]
        source: String,
        /// Visual style recorded on each item
        #[arg(long, default_value = "cartoon")]
        visual_style: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse {
            results,
            inputs,
            pretty,
        }) => {
            let outcome = parse_batch_results(&results, inputs.as_deref())?;
            report_skips(&outcome);

            let json = if pretty {
                serde_json::to_string_pretty(&outcome.results)?
            } else {
                serde_json::to_string(&outcome.results)?
            };
            println!("{json}");
        }
        Some(Commands::Export {
            results,
            out_dir,
            inputs,
        }) => {
            let outcome = parse_batch_results(&results, inputs.as_deref())?;
            report_skips(&outcome);

            if outcome.results.is_empty() {
                println!("No usable records found.");
                return Ok(());
            }

            fs::create_dir_all(&out_dir)?;
            for (index, result) in outcome.results.iter().enumerate() {
                let file_name = format!("{:03}_{}.json", index, slugify(result.topic.as_str()));
                let path = out_dir.join(file_name);
                fs::write(&path, serde_json::to_string_pretty(result)?)?;
                println!("Wrote {}", path.display());
            }
        }
        Some(Commands::Breakdown {
            markdown,
            language,
            source,
            visual_style,
        }) => {
            let text = fs::read_to_string(&markdown)?;
            let items = parse_breakdown(&text, language, &source, &visual_style);
            if items.is_empty() {
                eprintln!("No subtopics found in {}", markdown.display());
            }
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        None => {
            println!("Use 'mnemo --help' for commands");
        }
    }

    Ok(())
}

fn report_skips(outcome: &mnemo_core::BatchOutcome) {
    if outcome.skipped.is_empty() {
        return;
    }
    eprintln!("Skipped {} unusable record(s):", outcome.skipped.len());
    for skip in &outcome.skipped {
        match &skip.custom_id {
            Some(custom_id) => eprintln!("  line {} ({}): {}", skip.line, custom_id, skip.reason),
            None => eprintln!("  line {}: {}", skip.line, skip.reason),
        }
    }
}
