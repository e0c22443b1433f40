//! viewkit CLI
//!
//! # Usage
//!
//! ```bash
//! # Lint every views/ file under the discovered addons paths
//! viewkit lint --addons-path ./addons
//!
//! # Lint one file or directory, without schema validation
//! viewkit lint addons/sale_ext/views --skip-rng --format json
//!
//! # Basic well-formedness lint
//! viewkit lint-xml addons/sale_ext
//!
//! # Add a field to an inherited view
//! viewkit extend --module sale_ext --view-id base.view_partner_form \
//!     --model res.partner --field x_code --xpath "//field[@name='vat']" --position after
//! ```
//!
//! Exit codes: 0 success, 1 lint findings or lint setup error, 2 extension
//! failure, 3 configuration error.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use viewkit_core::features::discovery::{
    collect_xml_files, find_addons_paths, find_project_root, view_files_of, DiscoveryError,
};
use viewkit_core::features::view_extension::{
    ExtensionRequest, Position, ViewExtender, ViewExtensionUseCase,
};
use viewkit_core::pipeline::{render_json, render_text, LintMode, LintOrchestrator, OutputFormat};
use viewkit_core::{ToolkitConfig, ViewkitError};

const EXIT_FINDINGS: u8 = 1;
const EXIT_EXTEND_FAILED: u8 = 2;
const EXIT_CONFIG: u8 = 3;

#[derive(Parser)]
#[command(name = "viewkit")]
#[command(about = "Lint view definition files and extend inherited views", long_about = None)]
struct Cli {
    /// Configuration file (YAML, version 1)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate view files: conventions and RELAX NG schemas
    Lint {
        /// File or directory to lint; defaults to every module's views/
        path: Option<PathBuf>,

        /// Addons directory used to locate the project
        #[arg(long, default_value = ".")]
        addons_path: PathBuf,

        /// Skip RELAX NG schema validation
        #[arg(long)]
        skip_rng: bool,

        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Number of lint workers
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Basic lint: well-formedness and unescaped ampersands
    LintXml {
        path: Option<PathBuf>,

        #[arg(long, default_value = ".")]
        addons_path: PathBuf,
    },

    /// Add a field to a view through an inherited view record
    Extend {
        /// Module that hosts the extension
        #[arg(long)]
        module: String,

        /// External id of the view to inherit
        #[arg(long)]
        view_id: String,

        /// Model of the view (e.g. res.partner)
        #[arg(long)]
        model: String,

        /// Field to add
        #[arg(long)]
        field: String,

        /// XPath locating the insertion point
        #[arg(long)]
        xpath: String,

        /// after, before, inside or replace
        #[arg(long)]
        position: String,

        #[arg(long, default_value = ".")]
        addons_path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let result = match cli.command {
        Commands::Lint {
            path,
            addons_path,
            format,
            ..
        } => run_lint(&config, LintMode::Views, path, &addons_path, format.into()),
        Commands::LintXml { path, addons_path } => {
            run_lint(&config, LintMode::Basic, path, &addons_path, OutputFormat::Text)
        }
        Commands::Extend {
            module,
            view_id,
            model,
            field,
            xpath,
            position,
            addons_path,
        } => {
            let outcome = position
                .parse::<Position>()
                .map_err(ViewkitError::from)
                .and_then(|position| {
                    let request = ExtensionRequest {
                        module,
                        view_id,
                        model,
                        field,
                        xpath,
                        position,
                    };
                    run_extend(&request, &addons_path)
                });
            match outcome {
                Ok(code) => Ok(code),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    Ok(ExitCode::from(EXIT_EXTEND_FAILED))
                }
            }
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FINDINGS)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Defaults < YAML file < VIEWKIT_* environment < command-line flags
fn load_config(cli: &Cli) -> anyhow::Result<ToolkitConfig> {
    let mut config = ToolkitConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("invalid configuration in {}", path.display()),
        None => "invalid configuration".to_string(),
    })?;

    if let Commands::Lint { skip_rng, jobs, .. } = &cli.command {
        if *skip_rng {
            config.lint.skip_schema = true;
        }
        if let Some(jobs) = jobs {
            config.lint.parallelism = *jobs;
        }
        config.validate().context("invalid command-line option")?;
    }
    Ok(config)
}

fn run_lint(
    config: &ToolkitConfig,
    mode: LintMode,
    path: Option<PathBuf>,
    addons_path: &Path,
    format: OutputFormat,
) -> viewkit_core::Result<ExitCode> {
    if mode == LintMode::Views && config.lint.skip_schema {
        info!("skipping RELAX NG schema validation");
    }

    let (files, base) = match path {
        Some(path) => {
            let files = collect_xml_files(&path)?;
            (files, std::env::current_dir().ok())
        }
        None => {
            let root = find_project_root(addons_path)?;
            let addons = find_addons_paths(&root);
            debug!("addons paths: {:?}", addons);
            (view_files_of(&addons), Some(root))
        }
    };

    let orchestrator = LintOrchestrator::from_config(config, mode)?;
    let report = orchestrator.lint_paths(&files);

    match format {
        OutputFormat::Text => print!("{}", render_text(&report, mode, base.as_deref())),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FINDINGS)
    })
}

fn run_extend(request: &ExtensionRequest, addons_path: &Path) -> viewkit_core::Result<ExitCode> {
    let addons_path = addons_path
        .canonicalize()
        .map_err(|_| DiscoveryError::NotFound(addons_path.to_path_buf()))?;

    let mut search_paths = vec![addons_path.clone()];
    if let Ok(root) = find_project_root(&addons_path) {
        if root != addons_path {
            for path in find_addons_paths(&root) {
                if !search_paths.contains(&path) {
                    search_paths.push(path);
                }
            }
        }
    }

    let outcome = ViewExtender::new(search_paths).extend(request)?;
    if outcome.is_created() {
        println!("Created new view file: {}", outcome.path().display());
        println!("Don't forget to add this file to your __manifest__.py!");
    } else {
        println!(
            "Appended xpath to existing inherited view in {}",
            outcome.path().display()
        );
    }
    Ok(ExitCode::SUCCESS)
}
