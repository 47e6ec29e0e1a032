mod config;
mod explain;

use anyhow::Context;
use blueprint_core::pipeline::{DocumentReport, LintRun, run_diff, run_lint};
use blueprint_render::{
    render_lint_text, render_repair_text, render_validation_report_md, to_structured, to_text,
};
use blueprint_rules::{RULE_REGISTRY, rules_for_profile};
use blueprint_types::Profile;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, LintArgs as MergeArgs};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "blueprint",
    version,
    about = "Lint, repair and diff workflow blueprints."
)]
struct Cli {
    /// Config file (default: ./blueprint.toml when present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate blueprint documents against a schema and the profile's rules.
    Lint(LintArgs),
    /// Show the structural differences between two blueprint versions.
    Diff(DiffArgs),
    /// Explain what a rule checks and how to fix its violations.
    Explain(ExplainArgs),
    /// List the built-in rules.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct LintArgs {
    /// Blueprint files, or directories whose *.json files are linted.
    #[arg(required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Blueprint format (default: make, or [lint].profile from the config file).
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// JSON Schema replacing the profile's embedded schema.
    #[arg(long)]
    schema: Option<Utf8PathBuf>,

    /// Attempt one auto-repair pass on failing documents.
    #[arg(long, default_value_t = false)]
    repair: bool,

    /// Never repair, even when the config file enables it.
    #[arg(long, default_value_t = false, conflicts_with = "repair")]
    no_repair: bool,

    /// Version written by repair when a document has none.
    #[arg(long)]
    canonical_version: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: LintFormat,
}

#[derive(Debug, Parser)]
struct DiffArgs {
    /// Earlier version of the blueprint.
    old: Utf8PathBuf,

    /// Later version of the blueprint.
    new: Utf8PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule key to explain (e.g. "no-self-loops", "SCHEMA").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Only list rules that run under this profile.
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProfileArg {
    Make,
    Legacy,
    Graph,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Make => Profile::Make,
            ProfileArg::Legacy => Profile::Legacy,
            ProfileArg::Graph => Profile::Graph,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LintFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<u8> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Lint(args) => cmd_lint(args, cli.config.as_deref()),
        Command::Diff(args) => cmd_diff(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListRules(args) => cmd_list_rules(args),
    }
}

fn cmd_lint(args: LintArgs, config_path: Option<&Utf8Path>) -> anyhow::Result<u8> {
    let file_config =
        config::load_or_default(config_path, Utf8Path::new(".")).context("load blueprint.toml")?;
    let settings = ConfigMerger::new(file_config).merge_lint_args(MergeArgs {
        profile: args.profile.map(Profile::from),
        schema: args.schema,
        repair: match (args.repair, args.no_repair) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
        canonical_version: args.canonical_version,
    });

    debug!(
        "merged config: profile={}, schema={:?}, repair={:?}",
        settings.profile, settings.schema, settings.repair
    );

    let run = run_lint(&settings, &args.inputs).context("lint blueprints")?;
    match args.format {
        LintFormat::Text => print!("{}", lint_text(&run)),
        LintFormat::Json => println!("{}", serde_json::to_string_pretty(&lint_json(&run))?),
        LintFormat::Markdown => print!("{}", lint_markdown(&run)),
    }

    info!(
        "linted {} document(s), {} failed",
        run.reports.len(),
        run.failed()
    );
    Ok(run.exit_code())
}

fn lint_text(run: &LintRun) -> String {
    let mut out = String::new();
    for report in &run.reports {
        match &report.attempt {
            Ok(attempt) => {
                out.push_str(&format!(
                    "{}: {}",
                    report.path,
                    render_lint_text(&attempt.result)
                ));
                if let Some(repair) = &attempt.repair {
                    out.push_str(&format!("  repair {}\n", attempt.status.as_str()));
                    for line in render_repair_text(repair).lines() {
                        out.push_str(&format!("    {line}\n"));
                    }
                }
                if let Some(err) = &attempt.repair_error {
                    out.push_str(&format!("  repair failed: {err}\n"));
                }
            }
            Err(err) => out.push_str(&format!("{}: error: {err}\n", report.path)),
        }
    }
    out.push_str(&format!(
        "{} document(s), {} failed\n",
        run.reports.len(),
        run.failed()
    ));
    out
}

fn report_json(report: &DocumentReport) -> serde_json::Value {
    match &report.attempt {
        Ok(attempt) => serde_json::json!({
            "path": report.path,
            "ok": attempt.result.ok,
            "attempt": attempt,
        }),
        Err(err) => serde_json::json!({
            "path": report.path,
            "ok": false,
            "error": err.to_string(),
        }),
    }
}

fn lint_json(run: &LintRun) -> serde_json::Value {
    let documents: Vec<_> = run.reports.iter().map(report_json).collect();
    serde_json::json!({
        "profile": run.profile,
        "ok": run.exit_code() == 0,
        "documents": documents,
    })
}

fn lint_markdown(run: &LintRun) -> String {
    let mut out = String::new();
    for report in &run.reports {
        out.push_str(&format!("<!-- {} -->\n", report.path));
        match &report.attempt {
            Ok(attempt) => out.push_str(&render_validation_report_md(&attempt.result)),
            Err(err) => out.push_str(&format!("Could not load document: {err}\n")),
        }
        out.push('\n');
    }
    out
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<u8> {
    let result = run_diff(&args.old, &args.new)
        .with_context(|| format!("diff {} against {}", args.old, args.new))?;
    match args.format {
        OutputFormat::Text => println!("{}", to_text(&result)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&to_structured(&result))?)
        }
    }
    info!("{} change(s)", result.total_changes);
    Ok(0)
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<u8> {
    use explain::{available_keys, lookup_subject, render_explanation};

    let Some(subject) = lookup_subject(&args.rule) else {
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available_keys()
        );
    };
    print!("{}", render_explanation(subject));
    Ok(0)
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<u8> {
    use explain::format_profiles;

    let rules: Vec<_> = match args.profile {
        Some(profile) => rules_for_profile(profile.into()),
        None => RULE_REGISTRY.iter().collect(),
    };

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<24} {:<20} TITLE", "KEY", "PROFILES");
            println!("  {:<24} {:<20} -----", "---", "--------");
            for rule in &rules {
                println!(
                    "  {:<24} {:<20} {}",
                    rule.key,
                    format_profiles(rule.profiles),
                    rule.title
                );
            }
            println!();
            println!("Use 'blueprint explain <key>' for details.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(0)
}
