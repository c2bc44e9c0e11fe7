use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use projctx::app::actions::{ActionRegistry, ActionStatus};
use projctx::app::context::{ActionContext, FileContext, SurfaceId};
use projctx::app::selection::{Ambient, SelectionModel};
use projctx::domain::model::OperationTracker;
use projctx::domain::project::Project;
use projctx::infra::config::Config;
use projctx::infra::manifest::load_project;
use projctx::ui::app::BrowserApp;

#[derive(Parser)]
#[command(
    name = "projctx",
    version,
    about = "Project browser with live action enablement"
)]
struct Cli {
    /// Project manifest to open (TOML). Falls back to the configured default.
    manifest: Option<PathBuf>,

    /// Open the project read-only regardless of its manifest.
    #[arg(long)]
    read_only: bool,

    /// Mark selections as coming from a temporary workspace.
    #[arg(long)]
    transient: bool,

    /// Treat the project as a background (non-active) workspace.
    #[arg(long)]
    inactive: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate action enablement for a selection without the TUI.
    Actions(ActionsArgs),
}

#[derive(Args)]
struct ActionsArgs {
    /// Project manifest to load.
    #[arg(long)]
    manifest: PathBuf,

    /// Folder paths to select (repeatable). Empty string selects the root.
    #[arg(long = "folder")]
    folders: Vec<String>,

    /// File paths to select (repeatable).
    #[arg(long = "file")]
    files: Vec<String>,

    /// Attach a busy tracker and mark an operation in flight.
    #[arg(long)]
    busy: bool,

    #[arg(long)]
    read_only: bool,

    #[arg(long)]
    transient: bool,

    #[arg(long)]
    inactive: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct EnablementReport {
    project: String,
    writable: bool,
    active: bool,
    transient: bool,
    busy: bool,
    folders: Vec<String>,
    files: Vec<String>,
    actions: Vec<ActionStatus>,
}

fn main() -> Result<()> {
    projctx::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Actions(args)) => report_actions(&args),
        None => run_browser(cli),
    }
}

fn run_browser(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let manifest = match cli.manifest.or_else(|| {
        config
            .project
            .manifest
            .as_ref()
            .map(PathBuf::from)
    }) {
        Some(path) => path,
        None => bail!("no manifest given; pass one as an argument or set [project].manifest"),
    };

    let project = load_project(&manifest)?;
    if cli.read_only || config.project.read_only {
        project.set_writable(false);
    }

    BrowserApp::new(project, config, !cli.inactive, cli.transient).run()
}

fn report_actions(args: &ActionsArgs) -> Result<()> {
    let project = load_project(&args.manifest)?;
    if args.read_only {
        project.set_writable(false);
    }

    let selection = build_selection(&project, &args.folders, &args.files)?;
    let tracker = OperationTracker::new();
    tracker.set_busy(args.busy);

    let ambient = Ambient {
        project: Some(project.as_data()),
        tracker: Some(tracker),
        in_active_project: !args.inactive,
        transient: args.transient,
    };
    let ctx = selection.snapshot(ActionContext::new(SurfaceId::new("cli")), &ambient);
    let actions = ActionRegistry::with_builtin().evaluate(&ctx);

    let report = EnablementReport {
        project: project.name().to_string(),
        writable: !ctx.is_read_only_project(),
        active: ctx.is_in_active_project(),
        transient: ctx.is_transient(),
        busy: ctx.is_busy(),
        folders: ctx
            .selected_folders()
            .iter()
            .map(|folder| folder.path())
            .collect(),
        files: ctx.selected_files().iter().map(|file| file.path()).collect(),
        actions,
    };

    match args.format {
        ReportFormat::Text => print_text_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn build_selection(
    project: &Project,
    folders: &[String],
    files: &[String],
) -> Result<SelectionModel> {
    let mut selection = SelectionModel::new();
    for path in folders {
        let folder = project
            .folder_at(path)
            .with_context(|| format!("no folder '{path}' in project"))?;
        selection.toggle_folder(folder);
    }
    for path in files {
        let file = project
            .file_at(path)
            .with_context(|| format!("no file '{path}' in project"))?;
        selection.toggle_file(file);
    }
    Ok(selection)
}

fn print_text_report(report: &EnablementReport) {
    let mode = if report.writable {
        "writable"
    } else {
        "read-only"
    };
    let mut flags = vec![mode.to_string()];
    if !report.active {
        flags.push("inactive".to_string());
    }
    if report.transient {
        flags.push("transient".to_string());
    }
    if report.busy {
        flags.push("busy".to_string());
    }
    println!("project {} ({})", report.project, flags.join(", "));
    println!(
        "selection: {} folder(s), {} file(s)",
        report.folders.len(),
        report.files.len()
    );
    for action in &report.actions {
        let label = if action.enabled { "enabled" } else { "disabled" };
        println!("  {:<12} {label}", action.name);
    }
}
