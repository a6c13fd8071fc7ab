//! `speccheck` command-line interface

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use speccheck_core::{
    demo, load_checks, load_spec, telemetry, SessionReport, SpecCheckConfig, SpecVerifier,
};
use speccheck_laws::TransformRegistry;
use speccheck_model::{VerificationGraphResult, VerificationStatus};
use speccheck_ports::JsonDirStore;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("speccheck")
        .version(speccheck_core::VERSION)
        .about("Derivation-graph analysis and categorical law verification")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory to persist results in"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("graph")
                .about("Build and analyze a derivation graph")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Spec input (.json, .yaml)"),
                ),
        )
        .subcommand(
            Command::new("laws")
                .about("Verify categorical laws")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("List of law checks (.json, .yaml)"),
                ),
        )
        .subcommand(Command::new("demo").about(
            "Run the built-in example; exits 0 when only its conflicting sheaf check fails",
        ))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<SpecCheckConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SpecCheckConfig::load(path)?,
        None => SpecCheckConfig::default().with_env_overrides()?,
    };
    Ok(config)
}

fn verifier(config: &SpecCheckConfig, matches: &ArgMatches) -> anyhow::Result<SpecVerifier> {
    let mut verifier = SpecVerifier::new(config, TransformRegistry::with_builtins());
    if let Some(dir) = matches.get_one::<PathBuf>("store") {
        let store = JsonDirStore::open(dir)
            .with_context(|| format!("opening result store {}", dir.display()))?;
        verifier = verifier.with_store(Arc::new(store));
    }
    #[cfg(feature = "http")]
    if let Some(url) = &config.session.analyzer_url {
        verifier = verifier.with_analyzer(Arc::new(speccheck_ports::HttpTextAnalyzer::new(url)));
    }
    #[cfg(not(feature = "http"))]
    if config.session.analyzer_url.is_some() {
        tracing::warn!("analyzer_url ignored: built without the http feature");
    }
    Ok(verifier)
}

fn print_graph(result: &VerificationGraphResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("Derivation Graph {}", result.graph_id);
    println!("  Status: {:?}", result.status);
    println!("  Nodes: {}", result.nodes.len());
    println!("  Edges: {}", result.edges.len());
    println!(
        "  Paths: {}/{} complete",
        result.derivation_paths.len() - result.incomplete_path_count(),
        result.derivation_paths.len()
    );
    for orphan in &result.orphaned_nodes {
        println!("  Orphan: {orphan}");
    }
    for c in &result.contradictions {
        println!("  [{:?}] {}: {}", c.severity, c.kind, c.description);
    }
    for (category, advice) in &result.resolution_strategies {
        println!("  {category}:");
        for line in advice {
            println!("    - {line}");
        }
    }
    Ok(())
}

fn print_laws(report: &SessionReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("Law Verification");
    for entry in &report.entries {
        let result = &entry.result;
        let mark = if result.success() { "PASS" } else { "FAIL" };
        println!(
            "  #{} {} {} ({} inputs)",
            entry.index,
            mark,
            result.law_name(),
            result.test_results().len()
        );
        if let Some(ce) = result.counter_example() {
            println!(
                "      input {} gave {} vs {}",
                ce.test_input.value, ce.expected_result, ce.actual_result
            );
        }
        if let Some(fix) = result.suggested_fix() {
            println!("      fix: {fix}");
        }
    }
    for failure in &report.failures {
        println!("  #{} LOST {}", failure.index, failure.message);
    }
    println!("  Passed: {}  Failed: {}", report.passed(), report.failed());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    telemetry::init(&config.session)?;
    let json = matches.get_flag("json");
    let verifier = verifier(&config, &matches)?;

    let ok = match matches.subcommand() {
        Some(("graph", args)) => {
            let path = args
                .get_one::<PathBuf>("input")
                .context("--input is required")?;
            let result = verifier.verify_graph(&load_spec(path)?);
            print_graph(&result, json)?;
            result.status == VerificationStatus::Success
        }
        Some(("laws", args)) => {
            let path = args
                .get_one::<PathBuf>("input")
                .context("--input is required")?;
            let report = verifier.verify_laws(load_checks(path)?).await;
            print_laws(&report, json)?;
            report.all_passed()
        }
        Some(("demo", _)) => {
            let result = verifier.verify_graph(&demo::demo_spec());
            print_graph(&result, json)?;
            let report = verifier.verify_laws(demo::demo_checks()?).await;
            print_laws(&report, json)?;
            demo::went_as_expected(&report)
        }
        _ => true,
    };

    std::process::exit(if ok { 0 } else { 1 });
}
