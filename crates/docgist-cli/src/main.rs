use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docgist_core::{keys, Metadata, ParsedDocument, PDF_MIME};
use docgist_local::{extract, textprep, DocgistConfig, DocumentPipeline, HeadingExtractor, Summarizer};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docgist")]
#[command(about = "PDF headings and extractive summaries", long_about = None)]
struct Cli {
    /// JSON config file (thresholds, RTL languages). Env overrides still apply on top.
    #[arg(long, global = true, env = "DOCGIST_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a document (PDF, HTML or plain text).
    Summarize(SummarizeCmd),
    /// Infer a heading from a font-tagged first-page text stream.
    Heading(HeadingCmd),
    /// Pick a heading from the first lines of a document's text.
    TextHeading(TextHeadingCmd),
    /// Run the parse + index filters over one document and print its index fields (json).
    Index(IndexCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct SummarizeCmd {
    /// Document to summarize.
    path: PathBuf,
    /// Number of sentences (default: config `summary.sentences`, 5).
    #[arg(long)]
    sentences: Option<usize>,
    /// MIME type of the document; sniffed from the bytes when omitted.
    #[arg(long)]
    content_type: Option<String>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct HeadingCmd {
    /// File holding the tagged stream (`[<index> <size>]<text>` runs).
    path: PathBuf,
    /// Detected document language (e.g. "he"); right-to-left headings get reversed.
    #[arg(long)]
    lang: Option<String>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct TextHeadingCmd {
    /// Document to scan (PDF, HTML or plain text).
    path: PathBuf,
    /// MIME type of the document; sniffed from the bytes when omitted.
    #[arg(long)]
    content_type: Option<String>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct IndexCmd {
    /// Body file: a PDF, an HTML page, plain text, or text already extracted from a PDF
    /// (declared with `--content-type application/pdf`).
    path: PathBuf,
    /// Tagged first-page stream produced by the PDF reader.
    #[arg(long)]
    tagged: Option<PathBuf>,
    /// MIME type of the original document (default: application/pdf when the body is a PDF).
    #[arg(long)]
    content_type: Option<String>,
    /// Detected document language.
    #[arg(long)]
    lang: Option<String>,
    /// Page count reported by the PDF reader.
    #[arg(long)]
    pages: Option<u32>,
    /// Document URL recorded on the parsed document (default: the body path).
    #[arg(long)]
    url: Option<String>,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn init_tracing() {
    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DOCGIST_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DocgistConfig> {
    match path {
        Some(p) => {
            let mut cfg = DocgistConfig::from_json_file(p)
                .with_context(|| format!("load config {}", p.display()))?;
            cfg.apply_env();
            Ok(cfg)
        }
        None => Ok(DocgistConfig::from_env()),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn is_text_output(output: &str) -> bool {
    output.eq_ignore_ascii_case("text")
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summarize(args) => {
            let bytes = read_bytes(&args.path)?;
            let ex = extract::body_text_from_bytes(&bytes, args.content_type.as_deref());
            let summarizer = Summarizer::new(cfg.summary.clone());
            let count = args.sentences.unwrap_or(cfg.summary.sentences);
            let summary = summarizer.summarize_sentences(&ex.text, count);
            let text = textprep::clean_summary(&summary.to_text());
            tracing::info!(path = %args.path.display(), sentences = summary.len(), "summarized");

            if is_text_output(&args.output) {
                if !text.is_empty() {
                    println!("{text}");
                }
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "summary",
                    "ok": true,
                    "engine": ex.engine,
                    "sentences": summary.len(),
                    "summary": text,
                    "warnings": ex.warnings,
                });
                println!("{v}");
            }
        }
        Commands::Heading(args) => {
            let raw = read_bytes(&args.path)?;
            let tagged = String::from_utf8_lossy(&raw);
            let heading =
                HeadingExtractor::new(cfg.heading.clone()).extract(&tagged, args.lang.as_deref());

            if is_text_output(&args.output) {
                if let Some(h) = &heading {
                    println!("{}", h.tagged());
                }
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "heading",
                    "ok": true,
                    "heading": heading.as_ref().map(|h| h.text.clone()),
                    "tagged": heading.as_ref().map(|h| h.tagged()),
                    "provenance": heading.as_ref().map(|h| h.provenance),
                });
                println!("{v}");
            }
        }
        Commands::TextHeading(args) => {
            let bytes = read_bytes(&args.path)?;
            let ex = extract::body_text_from_bytes(&bytes, args.content_type.as_deref());
            let heading = Summarizer::new(cfg.summary.clone()).extract_heading(&ex.text);

            if is_text_output(&args.output) {
                if let Some(h) = &heading {
                    println!("{}", h.tagged());
                }
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "text_heading",
                    "ok": true,
                    "heading": heading.as_ref().map(|h| h.text.clone()),
                    "tagged": heading.as_ref().map(|h| h.tagged()),
                    "warnings": ex.warnings,
                });
                println!("{v}");
            }
        }
        Commands::Index(args) => {
            let bytes = read_bytes(&args.path)?;
            // A non-PDF body declared as PDF is text the PDF reader already extracted.
            let (text, sniffed, warnings) = if extract::bytes_look_like_pdf(&bytes) {
                let ex = extract::body_text_from_bytes(&bytes, Some(PDF_MIME));
                (ex.text, Some(PDF_MIME.to_string()), ex.warnings)
            } else if extract::is_pdf_content_type(args.content_type.as_deref()) {
                let text = textprep::clean_field(&String::from_utf8_lossy(&bytes));
                (text, None, Vec::new())
            } else {
                let ex = extract::body_text_from_bytes(&bytes, args.content_type.as_deref());
                (ex.text, None, ex.warnings)
            };
            let tagged_text = match &args.tagged {
                Some(p) => Some(String::from_utf8_lossy(&read_bytes(p)?).into_owned()),
                None => None,
            };

            let mut doc = ParsedDocument {
                url: args
                    .url
                    .clone()
                    .unwrap_or_else(|| args.path.display().to_string()),
                content_type: args.content_type.clone().or(sniffed),
                text,
                tagged_text,
                ..Default::default()
            };
            if let Some(n) = args.pages {
                doc.doc_meta.set(keys::NPAGES, n.to_string());
            }
            if let Some(lang) = &args.lang {
                doc.parse_meta.set(keys::LANGUAGE, lang.as_str());
            }

            let fields = DocumentPipeline::new(&cfg).run(&mut doc, Metadata::new());
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "index",
                "ok": true,
                "url": doc.url,
                "parse_meta": doc.parse_meta,
                "fields": fields,
                "warnings": warnings,
            });
            println!("{v}");
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "docgist",
                "version": env!("CARGO_PKG_VERSION"),
            });
            if is_text_output(&args.output) {
                println!("docgist {}", env!("CARGO_PKG_VERSION"));
            } else {
                println!("{v}");
            }
        }
    }

    Ok(())
}
