//! Command-line front end.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use a11ylens::ai::{AiClient, ImageInfo, SimplificationLevel};
use a11ylens::contrast::{adjust, contrast_ratio, format_ratio, parse_color, ComplianceResult};
use a11ylens::highlight::PageSnapshot;
use a11ylens::messaging::{Background, Feature, MessageBus, Request, Response};
use a11ylens::storage::{self, ExtensionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest a foreground that reaches the target ratio
    Suggest {
        foreground: String,
        background: String,
        #[arg(long, default_value_t = 4.5)]
        target: f64,
    },
    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(flatten)]
    Worker(WorkerCommand),
}

/// Commands answered by the background worker.
#[derive(Subcommand, Debug)]
pub enum WorkerCommand {
    /// Contrast ratio and WCAG levels for a color pair
    Check {
        /// Foreground, `#RRGGBB` or `rgb(r, g, b)`
        foreground: String,
        /// Background, `#RRGGBB` or `rgb(r, g, b)`
        background: String,
    },
    /// Audit a page snapshot for low-contrast text
    Audit {
        /// Snapshot JSON exported from the page
        snapshot: PathBuf,
        /// Minimum ratio, defaults to the configured value
        #[arg(long)]
        min_ratio: Option<f64>,
        /// Write the snapshot back out with issue markers set
        #[arg(long)]
        annotate: Option<PathBuf>,
        /// Exit with an error when any element fails
        #[arg(long)]
        fail_on_issues: bool,
    },
    /// Ask the hosted model for contrast fixes
    Analyze {
        snapshot: PathBuf,
        #[arg(long)]
        min_contrast: Option<f64>,
    },
    /// Rewrite a text file at a simpler reading level
    Simplify {
        file: PathBuf,
        #[arg(long)]
        level: Option<SimplificationLevel>,
    },
    /// Ask the hosted model for readability feedback on a text file
    Readability { file: PathBuf },
    /// Generate alt text for images listed in a JSON file
    AltText { images: PathBuf },
    /// Check whether a feature can be switched on
    Activate {
        #[arg(value_enum)]
        feature: Feature,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration with keys masked
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Store an API key
    SetKey { provider: Provider, key: String },
    /// Turn developer mode on or off
    DeveloperMode {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Provider {
    Claude,
    Gemini,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(storage::get_config_path)
    }

    fn load_config(&self) -> Result<ExtensionConfig> {
        let path = self.config_path();
        storage::load_config_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Suggest {
            foreground,
            background,
            target,
        } => suggest(foreground, background, *target, cli.json),
        Command::Config { action } => config(&cli, action),
        Command::Worker(command) => {
            let bus = start_background(&cli)?;
            dispatch(&cli, &bus, command).await
        }
    }
}

fn start_background(cli: &Cli) -> Result<MessageBus> {
    let config = cli.load_config()?;
    let ai = match AiClient::from_config(&config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::debug!("Model client unavailable: {}", e);
            None
        }
    };
    Ok(Background::new(config, cli.config_path(), ai).spawn())
}

async fn dispatch(cli: &Cli, bus: &MessageBus, command: &WorkerCommand) -> Result<()> {
    let request = match command {
        WorkerCommand::Check {
            foreground,
            background,
        } => Request::CheckContrast {
            foreground: foreground.clone(),
            background: background.clone(),
        },
        WorkerCommand::Audit {
            snapshot,
            min_ratio,
            annotate,
            fail_on_issues,
        } => return audit(cli, bus, snapshot, *min_ratio, annotate.as_deref(), *fail_on_issues).await,
        WorkerCommand::Analyze {
            snapshot,
            min_contrast,
        } => Request::AnalyzeContrast {
            elements: load_snapshot(snapshot)?.samples(),
            min_contrast: *min_contrast,
        },
        WorkerCommand::Simplify { file, level } => Request::SimplifyContent {
            content: read_text(file)?,
            level: *level,
        },
        WorkerCommand::Readability { file } => Request::AnalyzeReadability {
            content: read_text(file)?,
        },
        WorkerCommand::AltText { images } => {
            let images: Vec<ImageInfo> =
                serde_json::from_str(&read_text(images)?).context("parsing image list")?;
            Request::GenerateAltText { images }
        }
        WorkerCommand::Activate { feature } => Request::ActivateFeature { feature: *feature },
    };

    let response = bus.send(request).await?;
    print_response(&response, cli.json)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

async fn audit(
    cli: &Cli,
    bus: &MessageBus,
    snapshot_path: &Path,
    min_ratio: Option<f64>,
    annotate: Option<&Path>,
    fail_on_issues: bool,
) -> Result<()> {
    let mut snapshot = load_snapshot(snapshot_path)?;

    let response = bus
        .send(Request::AuditPage {
            elements: snapshot.samples(),
            min_ratio,
        })
        .await?;
    print_response(&response, cli.json)?;

    let Response::Audit { report } = response else {
        bail!("unexpected reply to audit request");
    };

    if let Some(out) = annotate {
        snapshot.audit_and_mark(report.min_ratio);
        snapshot
            .save(out)
            .with_context(|| format!("writing {}", out.display()))?;
        tracing::info!("Annotated snapshot written to {}", out.display());
    }

    if fail_on_issues && !report.passed() {
        bail!("{} elements below {}", report.issues.len(), format_ratio(report.min_ratio));
    }
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<PageSnapshot> {
    PageSnapshot::load(path).with_context(|| format!("reading snapshot {}", path.display()))
}

fn suggest(foreground: &str, background: &str, target: f64, json: bool) -> Result<()> {
    let fg = parse_color(foreground)?;
    let bg = parse_color(background)?;

    let Some(suggestion) = adjust::suggest_foreground(fg, bg, target) else {
        bail!("no foreground reaches {} on {}", format_ratio(target), bg.to_hex());
    };

    let ratio = contrast_ratio(suggestion, bg);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "foreground": suggestion.to_hex(),
                "background": bg.to_hex(),
                "ratio": ratio,
            })
        );
    } else {
        println!("{} on {} -> {}", suggestion.to_hex(), bg.to_hex(), format_ratio(ratio));
    }
    Ok(())
}

fn config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = cli.config_path();

    match action {
        ConfigAction::Show => {
            let config = cli.load_config()?.redacted();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            storage::save_config_to(&ExtensionConfig::default(), &path)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::SetKey { provider, key } => {
            let mut config = cli.load_config()?;
            let slot = match provider {
                Provider::Claude => &mut config.api_keys.claude,
                Provider::Gemini => &mut config.api_keys.gemini,
            };
            *slot = Some(key.trim().to_string()).filter(|k| !k.is_empty());
            storage::save_config_to(&config, &path)?;
        }
        ConfigAction::DeveloperMode { enabled } => {
            let mut config = cli.load_config()?;
            config.developer_mode = *enabled;
            storage::save_config_to(&config, &path)?;
        }
    }
    Ok(())
}

fn print_response(response: &Response, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    match response {
        Response::Contrast { check } => {
            println!(
                "{} on {}: {}",
                check.foreground.to_hex(),
                check.background.to_hex(),
                format_ratio(check.ratio)
            );
            print_compliance(&check.compliance);
        }
        Response::Audit { report } => {
            println!(
                "{} elements checked, {} skipped, {} below {} (score {:.0}%)",
                report.evaluated,
                report.skipped,
                report.issues.len(),
                format_ratio(report.min_ratio),
                report.score * 100.0
            );
            for issue in &report.issues {
                println!("  {:<30} {}", issue.selector, issue.recommendation);
            }
        }
        Response::ContrastAnalysis { result: Some(result) } => {
            println!("Overall score: {:.2}", result.analysis.overall_score);
            for issue in &result.analysis.issues {
                println!(
                    "  {:<30} {:.2}:1 -> {} on {}: {}",
                    issue.element,
                    issue.current_contrast,
                    issue.suggested_colors.foreground,
                    issue.suggested_colors.background,
                    issue.recommendation
                );
            }
            if !result.css_fixes.trim().is_empty() {
                println!("\n{}", result.css_fixes.trim());
            }
        }
        Response::ContrastAnalysis { result: None } => {
            bail!("contrast analysis unavailable (is an API key configured?)")
        }
        Response::Simplified { text } => println!("{}", text),
        Response::Readability { feedback } => println!("{}", feedback),
        Response::AltText { suggestions } => {
            if suggestions.is_empty() {
                println!("Every image already has alt text");
            }
            for s in suggestions {
                println!("{}: {}", s.src, s.alt);
            }
        }
        Response::ShowApiKeyPrompt { feature } => {
            println!(
                "{} needs an API key. Run `a11ylens config set-key claude <KEY>`.",
                feature
            );
        }
        Response::FeatureActivated { feature } => println!("{} is ready", feature),
        Response::Settings { path } => println!("{}", path),
        Response::Error { message } => bail!("{}", message),
    }
    Ok(())
}

fn print_compliance(compliance: &ComplianceResult) {
    let mark = |pass: bool| if pass { "pass" } else { "fail" };
    println!("  AA   normal: {:<4}  large: {}", mark(compliance.aa.normal), mark(compliance.aa.large));
    println!("  AAA  normal: {:<4}  large: {}", mark(compliance.aaa.normal), mark(compliance.aaa.large));
}
