use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use webrag::config::{self, DEFAULT_MODEL};
use webrag::{
    AnswerGenerator, AnswerResult, ApiConfig, EvaluationReport, ResponseEvaluator, SearchProvider,
};

/// webrag - answer questions from live web search results
#[derive(Parser, Debug)]
#[command(name = "webrag")]
#[command(about = "Search DuckDuckGo and generate a cited answer")]
#[command(version)]
struct Cli {
    /// Query string (prompted for if omitted)
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// Maximum number of search results
    #[arg(short = 'n', long, value_name = "N", default_value_t = 5)]
    max_results: usize,

    /// Model used to generate the answer
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// API key for this run only, overriding DEEPSEEK_API_KEY
    #[arg(long, value_name = "KEY")]
    deepseek_key: Option<String>,

    /// Completion API base URL, overriding DEEPSEEK_BASE_URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Evaluate the quality of the generated answer
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    evaluate: bool,

    /// Model used for evaluation
    #[arg(long, default_value = DEFAULT_MODEL)]
    eval_model: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    // Settings files may set RUST_LOG, so load them before logging starts.
    let loaded = config::load_settings_files(&config::settings_paths());
    if let Err(e) = webrag::logging::init(cli.verbose) {
        eprintln!("Warning: {e}");
    }
    debug!(files = ?loaded, "settings files loaded");

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Runs the search, answer and evaluation stages and prints their output.
fn run(cli: &Cli) -> Result<()> {
    let query = match join_query(&cli.query) {
        Some(query) => query,
        None => prompt_for_query(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let api = ApiConfig::from_env()
        .with_api_key_override(cli.deepseek_key.clone())
        .with_base_url_override(cli.base_url.clone());
    debug!(config = ?api, "resolved completion API configuration");

    let client = api
        .chat_client()
        .context("Invalid completion API configuration")?;

    let search = SearchProvider::duckduckgo()?;
    let generator = AnswerGenerator::new(search).with_client(client.clone());
    let answer = generator.generate_answer(&query, cli.max_results, &cli.model)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_answer(&mut out, &answer)?;

    if cli.evaluate {
        writeln!(out, "\n=== Evaluating Response ===\n")?;
        out.flush()?;

        let report = ResponseEvaluator::new(client).evaluate(
            &query,
            answer.answer(),
            answer.sources(),
            &cli.eval_model,
        );
        write_report(&mut out, &report)?;
    }

    Ok(())
}

/// Joins positional query words with single spaces.
fn join_query(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Prompts for a query and reads one line.
///
/// End of input yields an empty query, which the search stage rejects.
fn prompt_for_query<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Enter your query: ")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read query from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prints the answer and a numbered source list.
fn write_answer<W: Write>(out: &mut W, result: &AnswerResult) -> io::Result<()> {
    writeln!(out, "\n=== Generated Answer ===\n")?;
    writeln!(out, "{}", result.answer())?;
    writeln!(out, "\n=== Sources ===\n")?;
    for (i, source) in result.sources().iter().enumerate() {
        writeln!(
            out,
            "[{}] {} - {}",
            i + 1,
            source.title().unwrap_or("None"),
            source.url().unwrap_or("None"),
        )?;
    }
    Ok(())
}

/// Prints the evaluation scores and commentary.
fn write_report<W: Write>(out: &mut W, report: &EvaluationReport) -> io::Result<()> {
    let search_quality = report
        .search_quality
        .map(|score| format!("{score}/10"))
        .unwrap_or_else(|| "n/a".to_string());

    writeln!(out, "Accuracy Score:      {}/10", report.accuracy_score)?;
    writeln!(out, "Relevance Score:     {}/10", report.relevance_score)?;
    writeln!(out, "Search Quality:      {}", search_quality)?;
    writeln!(out, "Citation Quality:    {}/10", report.citation_quality)?;
    writeln!(out, "Overall Score:       {:.1}/10", report.overall_score)?;
    writeln!(out, "\nFeedback: {}", report.feedback)?;
    writeln!(out, "Strengths: {}", report.strengths)?;
    writeln!(out, "Opportunity: {}", report.opportunity)?;
    Ok(())
}
