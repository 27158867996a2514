use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use modcheck::analysis::{is_source_file, GlobalRoot};
use modcheck::config::{validate_patterns, Config, ConfigFile, ConfigSource, DEFAULT_CONFIG_FILE};
use modcheck::diagnostic::{Finding, Severity};
use modcheck::export::{export, ExportData, ExportFormat};
use modcheck::parser::{is_manifest_path, MANIFEST_FILE_NAME};
use modcheck::remedy::{
    create_missing_files, detect_global_root, install_packages, uninstall_packages, InstallScope,
    RemediationPlan, ShellRunner,
};
use modcheck::scan::{
    scan_folder, unused_package_findings, Document, FindingFilter, Publisher, Scanner, Session,
};

#[derive(Parser)]
#[command(name = "modcheck")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Finds missing modules, undeclared packages and unused dependencies in JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    /// Configuration file (defaults to .modcheck.json in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Global package install root (defaults to `npm root -g`)
    #[arg(long, global = true)]
    global_root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check individual files
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Scan every source file under a folder
    Scan {
        /// Folder to scan (a file scans its folder)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Which findings to report: packages, files or all
        #[arg(long, default_value = "all")]
        only: FindingFilter,

        /// Output format: text, json or markdown
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Install missing packages and create missing files
        #[arg(long)]
        fix: bool,
    },
    /// Report dependencies no source file imports
    Unused {
        /// Project folder containing package.json
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Uninstall the unused packages
        #[arg(long)]
        uninstall: bool,
    },
    /// Check that the ignore patterns in the configuration compile
    ValidateIgnore,
    /// Rescan files as they change
    Watch {
        /// Folder to watch
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("modcheck={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Path of the configuration file in effect, if any.
fn config_path(cli: &Cli) -> Option<PathBuf> {
    match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match config_path(cli) {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

fn scanner(cli: &Cli) -> Scanner {
    let root = cli.global_root.clone().or_else(detect_global_root);
    match root {
        Some(path) => Scanner::new(GlobalRoot::new(path)),
        None => Scanner::new(GlobalRoot::unknown()),
    }
}

fn has_errors<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> bool {
    findings.into_iter().any(|f| f.severity == Severity::Error)
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_check(cli: &Cli, files: &[PathBuf]) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let scanner = scanner(cli);
    let root = std::env::current_dir().context("Failed to read working directory")?;

    let mut results = BTreeMap::new();
    for file in files {
        let doc = Document::from_path(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let findings = scanner.scan_document(&doc, &config).into_findings();
        results.insert(file.clone(), findings);
    }

    let data = ExportData::new(&root, results);
    export(ExportFormat::Text, &data, &mut io::stdout().lock())?;
    Ok(exit_code(has_errors(data.files.values().flatten())))
}

fn cmd_scan(
    cli: &Cli,
    path: &Path,
    only: FindingFilter,
    format: ExportFormat,
    fix: bool,
) -> Result<ExitCode> {
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }
    let config = load_config(cli)?;
    let scanner = scanner(cli);

    let scan = scan_folder(&scanner, path, &config).filtered(only);
    let data = ExportData::from_scan(scan);
    export(format, &data, &mut io::stdout().lock())?;

    if fix {
        let runner = ShellRunner;
        if let Err(e) = install_packages(
            &runner,
            &data.plan.missing_packages,
            InstallScope::Project,
            &data.root,
        ) {
            eprintln!("Failed to install packages: {}", e);
        }
        if !data.plan.missing_files.is_empty() {
            let summary = create_missing_files(&data.plan.missing_files);
            eprintln!("{}", summary);
            for (path, error) in &summary.failed {
                eprintln!("  {}: {}", path.display(), error);
            }
        }
    }

    Ok(exit_code(has_errors(data.files.values().flatten())))
}

fn cmd_unused(cli: &Cli, path: &Path, uninstall: bool) -> Result<ExitCode> {
    let manifest_path = if is_manifest_path(path) {
        path.to_path_buf()
    } else {
        path.join(MANIFEST_FILE_NAME)
    };
    let text = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let project_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let config = load_config(cli)?;
    let findings = unused_package_findings(&text, project_dir, &config.severities());
    if findings.is_empty() {
        println!("All dependencies in {} are used", manifest_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("\t{} ({} issues)", manifest_path.display(), findings.len());
    for finding in &findings {
        println!("    {}", finding);
    }

    let plan = RemediationPlan::new(project_dir, &findings);
    if uninstall {
        uninstall_packages(&ShellRunner, &plan.unused_packages, project_dir)?;
    } else if let Some(command) = plan.uninstall_command() {
        println!();
        println!("To fix the issues, run the following commands:");
        println!("{}", command);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate_ignore(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let invalid = validate_patterns(&config.ignore_files_or_folders);
    if invalid.is_empty() {
        println!(
            "All {} ignore patterns are valid",
            config.ignore_files_or_folders.len()
        );
        return Ok(ExitCode::SUCCESS);
    }
    for pattern in &invalid {
        println!(
            "ignoreFilesOrFolders[{}]: invalid regex pattern \"{}\": {}",
            pattern.index, pattern.pattern, pattern.error
        );
    }
    Ok(ExitCode::from(1))
}

/// Prints findings as the session publishes them.
struct StdoutPublisher;

impl Publisher for StdoutPublisher {
    fn publish(&self, path: &Path, findings: &[Finding]) {
        if findings.is_empty() {
            println!("\t{} (no issues)", path.display());
            return;
        }
        println!("\t{} ({} issues)", path.display(), findings.len());
        for finding in findings {
            println!("    {}", finding);
        }
    }

    fn clear(&self, path: &Path) {
        println!("\t{} (cleared)", path.display());
    }
}

/// Source files and manifests under `root` with their modification times.
fn watched_files(root: &Path) -> HashMap<PathBuf, SystemTime> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_source_file(e.path()) || is_manifest_path(e.path()))
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().ok()?;
            Some((e.path().to_path_buf(), modified))
        })
        .collect()
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

fn open_documents(files: &HashMap<PathBuf, SystemTime>) -> Vec<Document> {
    files
        .keys()
        .filter_map(|path| Document::from_path(path).ok())
        .collect()
}

async fn watch(cli: &Cli, root: &Path, poll: Duration) -> Result<()> {
    let config_file = config_path(cli);
    let source: Box<dyn ConfigSource> = match &config_file {
        Some(path) => Box::new(ConfigFile::new(path)),
        None => Box::new(Config::default()),
    };
    let mut session = Session::new(scanner(cli), source, Arc::new(StdoutPublisher));

    let mut known = watched_files(root);
    for doc in open_documents(&known) {
        session.scan_now(&doc, true);
    }
    let mut config_mtime = config_file.as_deref().and_then(modified);
    eprintln!("Watching {} ({} files), press Ctrl-C to stop", root.display(), known.len());

    let mut ticker = tokio::time::interval(poll);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {}
        }

        let current = watched_files(root);
        let mut manifest_changed = false;
        for (path, mtime) in &current {
            if known.get(path) != Some(mtime) {
                manifest_changed |= is_manifest_path(path);
                match Document::from_path(path) {
                    Ok(doc) => session.request_scan(doc),
                    Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
                }
            }
        }
        for path in known.keys().filter(|p| !current.contains_key(*p)) {
            session.close(path);
        }
        let files_added_or_removed = current.len() != known.len()
            || current.keys().any(|p| !known.contains_key(p));
        known = current;

        let mtime = config_file.as_deref().and_then(modified);
        if mtime != config_mtime || files_added_or_removed || manifest_changed {
            config_mtime = mtime;
            session.request_rescan_all(open_documents(&known));
        }
    }
    Ok(())
}

fn cmd_watch(cli: &Cli, path: &Path, poll_ms: u64) -> Result<ExitCode> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(watch(cli, path, Duration::from_millis(poll_ms)))?;
    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Check { files } => cmd_check(cli, files),
        Commands::Scan {
            path,
            only,
            format,
            fix,
        } => cmd_scan(cli, path, *only, *format, *fix),
        Commands::Unused { path, uninstall } => cmd_unused(cli, path, *uninstall),
        Commands::ValidateIgnore => cmd_validate_ignore(cli),
        Commands::Watch { path, poll_ms } => cmd_watch(cli, path, *poll_ms),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
