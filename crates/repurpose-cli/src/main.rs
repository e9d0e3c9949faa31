//! Repurpose CLI - Command-line interface for turning articles into social assets

use clap::{Args, Parser, Subcommand, ValueEnum};
use repurpose::{
    extract_document, AssetBundle, ExtractedContent, FetchOptions, FetcherChain, PipelineError,
    RawDocument, RepurposeInput, Repurposer, Selection, TOOL_LLMTXT,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown
    #[default]
    Md,
    /// JSON format
    Json,
}

/// Repurpose - turn one article into LinkedIn posts, X hooks, SEO and YouTube copy
#[derive(Parser, Debug)]
#[command(name = "repurpose")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch an article and generate assets from it
    Url {
        /// Article URL
        url: String,

        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Generate assets from pasted text (stdin when neither TEXT nor --file is given)
    Text {
        /// Article text
        text: Option<String>,

        /// Read the article text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        generate: GenerateArgs,
    },
    /// Fetch an article and print the extracted main content
    Extract {
        /// Article URL
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Print the JSON schema of the generated asset bundle
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model
    #[arg(long, env = "REPURPOSE_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Output format
    #[arg(long, short, default_value = "md")]
    output: OutputFormat,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Relay endpoint, tried before the direct request (repeatable)
    #[arg(long, env = "REPURPOSE_RELAY", value_delimiter = ',')]
    relay: Vec<String>,

    /// Do not request the article directly
    #[arg(long)]
    no_direct: bool,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl FetchArgs {
    fn options(&self) -> FetchOptions {
        let mut options = FetchOptions {
            user_agent: self.user_agent.clone(),
            ..Default::default()
        };
        if let Some(secs) = self.timeout {
            options.timeout = Duration::from_secs(secs);
        }
        options
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Url {
            url,
            generate,
            fetch,
        }) => {
            run_generate(RepurposeInput::url(url), &generate, Some(&fetch)).await;
        }
        Some(Commands::Text {
            text,
            file,
            generate,
        }) => {
            let text = read_text(text, file).unwrap_or_else(|e| {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            });
            run_generate(RepurposeInput::text(text), &generate, None).await;
        }
        Some(Commands::Extract { url, output, fetch }) => {
            run_extract(&url, output, &fetch).await;
        }
        Some(Commands::Schema) => {
            writeln_safe(&to_json(&AssetBundle::json_schema()));
        }
        None => {
            eprintln!("Usage: repurpose url <URL>");
            eprintln!("   or: repurpose text [TEXT] [--file PATH]");
            eprintln!("   or: repurpose extract <URL>");
            eprintln!("   or: repurpose --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr, `warn` unless RUST_LOG says otherwise
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

async fn run_generate(input: RepurposeInput, args: &GenerateArgs, fetch: Option<&FetchArgs>) {
    let mut builder = Repurposer::builder();

    if let Some(ref key) = args.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref model) = args.model {
        builder = builder.model(model);
    }
    if let Some(temperature) = args.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(fetch) = fetch {
        for relay in &fetch.relay {
            builder = builder.relay(relay);
        }
        builder = builder.direct_fetch(!fetch.no_direct);
        if let Some(ref ua) = fetch.user_agent {
            builder = builder.user_agent(ua);
        }
        if let Some(secs) = fetch.timeout {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
    }

    let repurposer = builder.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = repurposer
        .repurpose_with_status(input, |status| {
            debug!(phase = %status.phase, "Pipeline progress");
        })
        .await;

    match result {
        Ok(bundle) => match args.output {
            OutputFormat::Md => writeln_safe(&format_bundle_md(&bundle)),
            OutputFormat::Json => writeln_safe(&to_json(&bundle)),
        },
        Err(e) => exit_with(e),
    }
}

async fn run_extract(url: &str, output: OutputFormat, args: &FetchArgs) {
    let chain = FetcherChain::with_defaults(&args.relay, !args.no_direct, args.options());
    debug!(fetchers = ?chain.names(), "Fetch chain ready");

    let result = match chain.fetch_html(url).await {
        Ok(html) => {
            extract_document(&RawDocument::html(html, url)).map_err(PipelineError::from)
        }
        Err(e) => Err(PipelineError::from(e)),
    };

    match result {
        Ok(content) => match output {
            OutputFormat::Md => writeln_safe(&format_extract_md(url, &content)),
            OutputFormat::Json => writeln_safe(&to_json(&content)),
        },
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: PipelineError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Positional text, else the file, else stdin
fn read_text(text: Option<String>, file: Option<PathBuf>) -> io::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path),
        (None, None) => io::read_to_string(io::stdin()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        std::process::exit(1);
    })
}

/// Render the bundle as one markdown section per card
fn format_bundle_md(bundle: &AssetBundle) -> String {
    let mut output = String::new();

    for (i, card) in bundle.cards().iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("## {} · {}\n\n", card.title, card.badge));
        match card.secondary {
            Some(ref secondary) => {
                output.push_str(&format!("**{}**\n\n{}\n", card.content, secondary));
            }
            None => {
                output.push_str(&card.content);
                output.push('\n');
            }
        }
    }

    output
}

/// Format extracted content as markdown with YAML frontmatter
fn format_extract_md(url: &str, content: &ExtractedContent) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", url));
    match content.selection {
        Selection::Semantic { selector } => {
            output.push_str(&format!("selection: semantic {}\n", selector));
        }
        Selection::Density { paragraphs } => {
            output.push_str(&format!("selection: density ({} paragraphs)\n", paragraphs));
        }
        Selection::Body => output.push_str("selection: body\n"),
        Selection::UserText => output.push_str("selection: text\n"),
    }
    output.push_str(&format!("chars: {}\n", content.char_count));
    if content.truncated {
        output.push_str("truncated: true\n");
    }
    output.push_str("---\n");
    output.push_str(&content.text);

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
