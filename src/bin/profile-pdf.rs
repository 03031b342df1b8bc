//! profile-pdf - render a user profile to a branded PDF
//!
//! Reads a JSONPlaceholder or RandomUser payload (file or stdin), applies
//! optional edits and branding, and writes the PDF or prints a data URL.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use profile_pdf::{
    BrandingConfig, DataSource, ProfilePdf, RecordUpdate, TemplateId, UserRecord,
    inspect_pdf_bytes, require_page_count,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "profile-pdf")]
#[command(author, version, about = "Render a user profile as a branded PDF", long_about = None)]
struct Args {
    /// API the payload came from (jsonplaceholder or randomuser)
    #[arg(short = 's', long, default_value = "jsonplaceholder")]
    source: DataSource,

    /// Path to the API payload; reads stdin when omitted or `-`
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Template: default, table, sectioned or modern
    #[arg(short = 't', long, default_value = "default")]
    template: String,

    /// JSON file with branding options (companyName, primaryColor, includeWatermark)
    #[arg(short = 'b', long)]
    branding: Option<PathBuf>,

    /// Company name, overrides the branding file
    #[arg(long)]
    company: Option<String>,

    /// Primary color as #rgb or #rrggbb, overrides the branding file
    #[arg(long)]
    color: Option<String>,

    /// Draw the company watermark
    #[arg(short = 'w', long, action = ArgAction::SetTrue)]
    watermark: bool,

    /// JSON file with field edits applied before rendering
    #[arg(short = 'u', long)]
    update: Option<PathBuf>,

    /// Output file or directory; defaults to the generated name in the current directory
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Print a base64 data URL instead of writing a file
    #[arg(long = "data-url", action = ArgAction::SetTrue)]
    data_url: bool,

    /// Re-open the written PDF and check its page count
    #[arg(long, action = ArgAction::SetTrue)]
    verify: bool,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("reading payload {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading payload from stdin")?;
            Ok(buf)
        }
    }
}

fn load_branding(args: &Args) -> Result<BrandingConfig> {
    let mut branding = match &args.branding {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading branding {}", path.display()))?;
            serde_json::from_str::<BrandingConfig>(&raw)
                .with_context(|| format!("parsing branding {}", path.display()))?
        }
        None => BrandingConfig::default(),
    };
    if let Some(company) = &args.company {
        branding.company_name = company.clone();
    }
    if let Some(color) = &args.color {
        branding.primary_color = color.clone();
    }
    if args.watermark {
        branding.include_watermark = true;
    }
    Ok(branding)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let payload = read_input(args.input.as_deref())?;
    let mut record = UserRecord::from_api_json(args.source, &payload)
        .map_err(|err| anyhow::anyhow!("{}: {}", err.user_message(), err))?;

    if let Some(path) = &args.update {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading update {}", path.display()))?;
        let update: RecordUpdate = serde_json::from_str(&raw)
            .with_context(|| format!("parsing update {}", path.display()))?;
        record
            .apply_update(update)
            .map_err(|err| anyhow::anyhow!("{}: {}", err.user_message(), err))?;
    }

    let branding = load_branding(&args)?;
    let template = TemplateId::parse(&args.template);
    let rendered = ProfilePdf::default()
        .render(&record, template, &branding)
        .map_err(|err| anyhow::anyhow!("{}: {}", err.user_message(), err))?;

    if args.verify {
        let report = inspect_pdf_bytes(rendered.as_bytes())?;
        require_page_count(&report, rendered.page_count())?;
    }

    if args.data_url {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered.to_data_payload())?;
        return Ok(());
    }

    let path = match &args.out {
        Some(out) if out.is_dir() => rendered.save_in(out)?,
        Some(out) => rendered.save_as(out)?,
        None => rendered.save_in(".")?,
    };
    info!(
        template = %template,
        pages = rendered.page_count(),
        "wrote {}",
        path.display()
    );
    Ok(())
}
