//! domquery: select nodes from an XML file with XPath, optionally change
//! them, and print the result.
//!
//! ```text
//! domquery books.xml "//book[@id='2']" --set-attr seen=1 --whole-document
//! domquery config.json "//port" --json-root config --format views
//! ```

use std::io::Read;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use domquery::{DocumentQuery, Fragment, Options, Output, OutputFormat};

const LOG_ENV: &str = "DOMQUERY_LOG";

#[derive(Parser, Debug)]
#[command(name = "domquery", version, about, long_about = None)]
struct Cli {
    /// Input file (use `-` for stdin)
    file: String,

    /// XPath expression selecting the nodes to work on
    path: String,

    /// Read the input as JSON and convert it to a document with this root
    /// element name
    #[arg(long, value_name = "NAME")]
    json_root: Option<String>,

    /// Set an attribute on every matched element
    #[arg(long, value_name = "NAME=VALUE")]
    set_attr: Vec<String>,

    /// Remove an attribute from every matched element
    #[arg(long, value_name = "NAME")]
    remove_attr: Vec<String>,

    /// Append a copy of this markup to every matched node
    #[arg(long, value_name = "MARKUP")]
    append: Option<String>,

    /// Empty every matched node
    #[arg(long)]
    clear: bool,

    /// Detach every matched node from the document
    #[arg(long)]
    remove: bool,

    /// Print the whole document instead of the matched nodes
    #[arg(long)]
    whole_document: bool,

    #[arg(long, value_enum, default_value_t = Format::Markup)]
    format: Format,

    /// Indent markup output
    #[arg(long)]
    pretty: bool,

    /// Keep whitespace-only text nodes from the input
    #[arg(long)]
    preserve_whitespace: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Serialized XML
    Markup,
    /// JSON element views
    Views,
    /// Number of matched nodes
    Count,
}

fn init_tracing() {
    let Some(filter) = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
    else {
        return;
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))
}

fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => bail!("expected NAME=VALUE, got `{assignment}`"),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = Options::default()
        .preserve_whitespace(cli.preserve_whitespace)
        .format_output(cli.pretty);
    let mut dq = DocumentQuery::new().with_options(options);

    let source = read_input(&cli.file)?;
    let loaded = match &cli.json_root {
        Some(root) => {
            let data: serde_json::Value = serde_json::from_str(&source)
                .with_context(|| format!("{} is not valid JSON", cli.file))?;
            dq.load_value(root, &data)
        }
        None => dq.load(&source),
    };
    loaded.with_context(|| format!("failed to load {}", cli.file))?;

    dq.path(&cli.path)
        .with_context(|| format!("failed to evaluate `{}`", cli.path))?;
    let matched = dq.count();
    tracing::debug!(matched, path = %cli.path, "selected nodes");

    // re-select before each step so it sees what earlier steps changed
    for assignment in &cli.set_attr {
        let (name, value) = split_assignment(assignment)?;
        dq.path(&cli.path)?.set_attr(name, value)?;
    }
    for name in &cli.remove_attr {
        dq.path(&cli.path)?.remove_attr(name)?;
    }
    if let Some(markup) = &cli.append {
        let fragment = Fragment::parse(markup).context("invalid --append markup")?;
        dq.path(&cli.path)?.append(&fragment)?;
    }
    if cli.clear {
        dq.path(&cli.path)?.clear()?;
    }
    if cli.remove {
        dq.path(&cli.path)?.remove()?;
    }

    let output = match (cli.format, cli.whole_document) {
        (Format::Count, _) => {
            println!("{matched}");
            return Ok(());
        }
        (Format::Markup, true) => dq.save(OutputFormat::Markup)?,
        (Format::Markup, false) => dq.save_results(OutputFormat::Markup)?,
        (Format::Views, true) => dq.save(OutputFormat::Views)?,
        (Format::Views, false) => dq.save_results(OutputFormat::Views)?,
    };

    match output {
        Output::Markup(markup) => println!("{}", markup.trim_end()),
        Output::Views(views) => println!(
            "{}",
            serde_json::to_string_pretty(&views).context("failed to encode views")?
        ),
        Output::Dom(_) => bail!("document output cannot be printed"),
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("domquery: {err:#}");
            ExitCode::FAILURE
        }
    }
}
