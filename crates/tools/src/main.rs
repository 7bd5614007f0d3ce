use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use std::process::Command;

use opencourse_tools::config::Config;

#[derive(Parser)]
#[command(name = "opencourse")]
#[command(about = "OpenCourse CLI tools for contract deployment and management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Contract {
    Registry,
    Enrollment,
    Payment,
}

impl Contract {
    fn wasm_name(&self) -> &'static str {
        match self {
            Contract::Registry => "course_registry.wasm",
            Contract::Enrollment => "enrollment.wasm",
            Contract::Payment => "payment.wasm",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the contract workspace to WASM
    Build {
        /// Build target (release/debug)
        #[arg(short, long, default_value = "release")]
        profile: String,
    },
    /// Deploy a contract WASM via the stellar CLI
    Deploy {
        /// Which contract to deploy
        #[arg(value_enum)]
        contract: Contract,
        /// Contract WASM file path (defaults to the workspace build output)
        #[arg(short, long)]
        wasm: Option<String>,
    },
    /// Show or validate the resolved configuration
    Config {
        /// Emit JSON instead of the human-readable summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { profile } => build(&profile),
        Commands::Deploy { contract, wasm } => deploy(contract, wasm.as_deref()),
        Commands::Config { json } => show_config(json),
    }
}

fn build(profile: &str) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["build", "--target", "wasm32v1-none"]);
    match profile {
        "release" => {
            cmd.arg("--release");
        }
        "debug" => {}
        other => bail!("unknown build profile: {other}"),
    }

    println!("Building contracts with {profile} profile");
    let status = cmd.status().context("failed to run cargo")?;
    if !status.success() {
        bail!("cargo build failed");
    }
    Ok(())
}

fn deploy(contract: Contract, wasm: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let account = config
        .account
        .as_deref()
        .context("SOROBAN_ACCOUNT is required to deploy")?;

    let default_wasm = format!(
        "target/wasm32v1-none/release/{}",
        contract.wasm_name()
    );
    let wasm = wasm.unwrap_or(&default_wasm);
    if !Path::new(wasm).exists() {
        bail!("WASM file not found: {wasm} (run `opencourse build` first)");
    }

    println!("Deploying {wasm} to {}", config.network);
    let status = Command::new("stellar")
        .args([
            "contract",
            "deploy",
            "--wasm",
            wasm,
            "--source-account",
            account,
            "--rpc-url",
            &config.rpc_url,
            "--network-passphrase",
            &config.network_passphrase,
        ])
        .status()
        .context("failed to run the stellar CLI")?;
    if !status.success() {
        bail!("stellar contract deploy failed");
    }
    Ok(())
}

fn show_config(json: bool) -> Result<()> {
    let config = Config::load()?;
    if json {
        println!("{}", config.to_json()?);
    } else {
        config.print_summary();
    }
    Ok(())
}
