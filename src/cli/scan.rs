use crate::config::{load_config, ConfigOverrides};
use crate::core::{Orchestrator, ScanSession};
use crate::models::{AnalysisClass, Finding};
use crate::output;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct ScanArgs {
    pub artifact: PathBuf,
    pub class: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub exclude_adapters: Option<Vec<String>>,
    pub scratch_dir: Option<PathBuf>,
}

/// `None` or `all` selects both classes, static first.
fn parse_classes(class: Option<&str>) -> Result<Vec<AnalysisClass>, String> {
    match class {
        None => Ok(AnalysisClass::ALL.to_vec()),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(AnalysisClass::ALL.to_vec()),
        Some(value) => value.parse().map(|class| vec![class]),
    }
}

fn print_findings(class: AnalysisClass, findings: &[Finding]) {
    println!("\n{} completed: {} findings", class.title(), findings.len());
    for finding in findings {
        println!("  [{}] {}", finding.severity_label(), finding.name);
    }
}

pub async fn handle_scan_command(args: ScanArgs) {
    let classes = match parse_classes(args.class.as_deref()) {
        Ok(classes) => classes,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Acceptable values: static, dynamic, all");
            std::process::exit(1);
        }
    };

    let config = match load_config(
        args.config_path,
        ConfigOverrides {
            format: args.format,
            scratch_dir: args.scratch_dir,
            exclude_adapters: args.exclude_adapters,
        },
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = match fs::read(&args.artifact) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.artifact.display(), e);
            std::process::exit(1);
        }
    };

    let mut session = ScanSession::new(&config.scratch_dir);
    let filename = args.artifact.to_string_lossy();
    match session.upload(&filename, &bytes) {
        Ok(metadata) => println!(
            "Uploaded {} ({}, {})",
            metadata.filename, metadata.artifact_type, metadata.size_display
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    info!(session = %session.id(), "Session started");

    let mut orchestrator = Orchestrator::new(&config);
    orchestrator.register_built_in_adapters();

    for class in classes {
        match session.run(&orchestrator, class).await {
            Ok(findings) => print_findings(class, findings),
            Err(e) => eprintln!("Error during {} analysis: {}", class, e),
        }
    }

    let report = session.report();
    drop(session);
    println!("\n{}", report.summary().summary_line());

    match output::generate_report(&report, &config.format, args.output) {
        Ok(Some(path)) => println!("Report written to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error generating report: {}", e);
            std::process::exit(1);
        }
    }
}
