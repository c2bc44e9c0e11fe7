use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Write a sample project manifest for manual browser testing
    Demo {
        /// Destination path for the manifest
        #[arg(default_value = "demo-project.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Demo { path } => write_demo_manifest(path)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn write_demo_manifest(path: PathBuf) -> Result<()> {
    let manifest = r#"name = "demo"
writable = true
folders = [
    "src",
    "src/core",
    "src/ui",
    "docs",
]
files = [
    "README.md",
    "LICENSE",
    "src/main.c",
    "src/core/api.h",
    "src/core/api.c",
    "src/ui/window.c",
    "docs/guide.md",
]
"#;
    fs::write(&path, manifest)?;
    println!("wrote {}", path.display());
    Ok(())
}
