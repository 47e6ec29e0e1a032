use anyhow::Context;
use blueprint_types::Profile;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the schema identifier of every blueprint profile.
    PrintSchemas,
    /// Compile the embedded schemas, and any extra schema files given.
    CheckSchemas {
        /// Additional schema files to compile.
        paths: Vec<PathBuf>,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            for profile in Profile::ALL {
                println!("{:<8} {}", profile.as_str(), profile.schema_id());
            }
        }
        Command::CheckSchemas { paths } => {
            for profile in Profile::ALL {
                let schema = blueprint_schema::embedded_schema_value(profile)?;
                check_schema(profile.schema_id(), &schema)?;
            }
            for path in paths {
                let text = fs::read_to_string(&path)?;
                let schema: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("parse {}", path.display()))?;
                check_schema(&path.display().to_string(), &schema)?;
            }
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "blueprint-core", "--test", "golden_fixtures"])
                .env("BLUEPRINT_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}

fn check_schema(id: &str, schema: &serde_json::Value) -> anyhow::Result<()> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .build(schema)
        .map_err(|e| anyhow::anyhow!("{id}: {e}"))?;
    println!("ok  {id}");
    Ok(())
}
