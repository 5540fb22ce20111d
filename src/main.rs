//! # qrforge CLI
//!
//! Command-line interface for payload encoding, rendering and the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # Print the encoded payload for a content type
//! qrforge encode --type wifi --field ssid=Home --field password=secret
//!
//! # Render to PNG with a saved design
//! qrforge render --type url --field url=example.com --options design.json --png qr.png
//!
//! # Render to SVG and show the renderer configuration
//! qrforge render --type text --field text=hello --svg qr.svg --print-config
//!
//! # Run the HTTP API
//! qrforge serve --listen 0.0.0.0:8080 --data-dir data/designs
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrforge::{
    QrForgeError,
    config::Settings,
    content::{ContentFields, ContentType, FieldSet},
    design::DesignOptions,
    export::{ExportError, ExportKind},
    render::RasterRenderer,
    server,
    studio::{ExportOutcome, ExportReceipt, Studio},
};

/// qrforge - Styled QR code payloads and rendering
#[derive(Parser, Debug)]
#[command(name = "qrforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the encoded payload for a content type
    Encode {
        /// Content type (url, text, phone, sms, email, wifi, vcard, location, event)
        #[arg(long = "type", short = 't', default_value = "url")]
        content_type: String,

        /// Field value as key=value (repeatable)
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// UTC offset in minutes for event times written without one
        #[arg(long, allow_hyphen_values = true)]
        tz_offset: Option<i32>,
    },

    /// Render a QR code to PNG or SVG
    Render {
        /// Content type (url, text, phone, sms, email, wifi, vcard, location, event)
        #[arg(long = "type", short = 't', default_value = "url")]
        content_type: String,

        /// Field value as key=value (repeatable)
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Design options JSON file
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Write PNG to this file
        #[arg(long, value_name = "FILE", conflicts_with = "svg", required_unless_present = "svg")]
        png: Option<PathBuf>,

        /// Write SVG to this file
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,

        /// Print the renderer configuration as JSON
        #[arg(long)]
        print_config: bool,

        /// UTC offset in minutes for event times written without one
        #[arg(long, allow_hyphen_values = true)]
        tz_offset: Option<i32>,
    },

    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long)]
        listen: Option<String>,

        /// Directory for saved designs
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// TOML settings file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "qrforge=debug,tower_http=debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> Result<(), QrForgeError> {
    match command {
        Commands::Encode {
            content_type,
            fields,
            tz_offset,
        } => {
            let (content_type, fields) = collect_fields(&content_type, fields, tz_offset)?;
            let verdict = content_type.validate(&fields);
            if let Some(key) = verdict.message_key {
                return Err(QrForgeError::InvalidInput(key.default_message().to_string()));
            }
            println!("{}", content_type.encode(&fields));
            Ok(())
        }

        Commands::Render {
            content_type,
            fields,
            options,
            png,
            svg,
            print_config,
            tz_offset,
        } => {
            let (content_type, fields) = collect_fields(&content_type, fields, tz_offset)?;
            let options = match options {
                Some(path) => load_options(&path)?,
                None => DesignOptions::default(),
            };
            let (kind, path) = match (png, svg) {
                (Some(path), _) => (ExportKind::Png, path),
                (None, Some(path)) => (ExportKind::Svg, path),
                (None, None) => {
                    return Err(QrForgeError::InvalidInput("one of --png or --svg is required".to_string()));
                }
            };
            render_to_file(content_type, fields, options, kind, &path, print_config)
        }

        Commands::Serve {
            listen,
            data_dir,
            config,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(listen) = listen {
                settings.server.listen_addr = listen;
            }
            if let Some(data_dir) = data_dir {
                settings.server.data_dir = data_dir;
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(settings))
        }
    }
}

fn collect_fields(
    tag: &str,
    pairs: Vec<(String, String)>,
    tz_offset: Option<i32>,
) -> Result<(ContentType, ContentFields), QrForgeError> {
    let content_type: ContentType = tag.parse().map_err(QrForgeError::InvalidInput)?;
    let set: FieldSet = pairs.into_iter().collect();
    let mut fields = ContentFields::from_field_set(content_type, &set)
        .map_err(|e| QrForgeError::InvalidInput(e.to_string()))?;
    if let Some(offset) = tz_offset {
        fields.event.tz_offset_minutes = offset;
    }
    Ok((content_type, fields))
}

fn load_options(path: &Path) -> Result<DesignOptions, QrForgeError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| QrForgeError::InvalidInput(format!("{}: {}", path.display(), e)))
}

fn render_to_file(
    content_type: ContentType,
    fields: ContentFields,
    options: DesignOptions,
    kind: ExportKind,
    path: &Path,
    print_config: bool,
) -> Result<(), QrForgeError> {
    let mut studio = Studio::new(RasterRenderer);
    studio.select_type(content_type, 0);
    studio.set_fields(fields, 0);
    studio.edit_design(0, |live| *live = options);
    studio.generate_now();

    if let Some(message) = studio.gate_message() {
        return Err(QrForgeError::InvalidInput(message.text().to_string()));
    }

    if print_config {
        if let Some(config) = studio.gate().last_config() {
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| QrForgeError::InvalidInput(e.to_string()))?;
            println!("{}", json);
        }
    }

    let pending = studio
        .begin_export(kind)
        .ok_or_else(|| QrForgeError::InvalidInput(format!("nothing to export as {}", kind)))?;
    let written = std::fs::write(path, &pending.bytes).map_err(ExportError::from);
    let outcome = studio.finish_export(pending.ticket, written.clone().map(|()| ExportReceipt::Done));
    written?;

    if let ExportOutcome::Reported(message) = outcome {
        eprintln!("{} ({})", message.text, path.display());
    }
    Ok(())
}
