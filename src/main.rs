use clap::{Parser, Subcommand};
use scrivener::config::OutputFormat;
use scrivener::{Analyzer, Config, DiagramGenerator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scrivener")]
#[command(about = "Extract structural facts from codebases")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a codebase and write metrics and diagrams
    Analyze {
        /// Path to the codebase to analyze
        path: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./scrivener-docs")]
        output: PathBuf,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Output format (json or markdown)
        #[arg(long, default_value = "json")]
        format: String,

        /// Max file size in bytes before a file is skipped
        #[arg(long)]
        max_file_size: Option<u64>,

        /// Skip diagram generation
        #[arg(long)]
        no_diagrams: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check whether a reference is a valid repository URL
    ValidateUrl {
        /// The URL to check
        url: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> scrivener::Result<ExitCode> {
    match args.command {
        Command::Analyze {
            path,
            output,
            exclude,
            format,
            max_file_size,
            no_diagrams,
            verbose,
        } => {
            let mut config = Config::load_or_default(Path::new("scrivener.toml"));
            config.merge_cli(
                Some(output),
                exclude,
                Some(format),
                max_file_size,
                no_diagrams,
            );

            if verbose {
                println!("Analyzing: {}", path.display());
                println!("Output: {}", config.output.directory.display());
                println!("Format: {:?}", config.output.format);
                println!("Max file size: {}", config.analysis.max_file_size);
                println!("Diagrams: {}", config.diagrams.enabled);
            }

            if !path.exists() {
                return Err(scrivener::Error::PathNotFound(path));
            }

            let analyzer = Analyzer::new(config.clone())?;
            let result = analyzer.analyze(&path)?;

            println!(
                "Analysis complete: {} files, {} classes, {} functions",
                result.metrics.total_files,
                result.classes.len(),
                result.functions.len()
            );

            if !result.metrics.skipped.is_empty() {
                println!("Skipped {} oversized file(s)", result.metrics.skipped.len());
            }
            if !result.metrics.read_errors.is_empty() {
                println!("{} file(s) could not be read:", result.metrics.read_errors.len());
                for err in result.metrics.read_errors.iter().take(5) {
                    println!("  {}: {}", err.path.display(), err.message);
                }
            }

            std::fs::create_dir_all(&config.output.directory)?;

            match config.output.format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)?;
                    let out = config.output.directory.join("analysis.json");
                    std::fs::write(&out, json)?;
                    println!("Analysis written to: {}", out.display());
                }
                OutputFormat::Markdown => {
                    let md = generate_markdown(&result, &path);
                    let out = config.output.directory.join("ANALYSIS.md");
                    std::fs::write(&out, md)?;
                    println!("Markdown written to: {}", out.display());
                }
            }

            if config.diagrams.enabled {
                let generator = DiagramGenerator::new().with_direction(&config.diagrams.direction);

                let call_graph = generator.generate_call_graph(&result.functions);
                std::fs::write(config.output.directory.join("call_graph.mmd"), call_graph)?;

                let inheritance = generator.generate_inheritance_graph(&result.classes);
                std::fs::write(
                    config.output.directory.join("inheritance.mmd"),
                    inheritance,
                )?;

                let tree = analyzer.build_file_tree(&path)?;
                let structure = generator.generate_file_structure_tree(Some(&tree));
                std::fs::write(config.output.directory.join("structure.mmd"), structure)?;

                println!("Diagrams written to: {}", config.output.directory.display());
            }

            Ok(ExitCode::SUCCESS)
        }

        Command::ValidateUrl { url } => {
            if scrivener::validate::validate_repository_reference(&url) {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn generate_markdown(result: &scrivener::AnalysisResult, root: &Path) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Analysis of {}\n\n", root.display()));
    md.push_str("## Project Metrics\n\n");
    md.push_str(&format!("- **Files:** {}\n", result.metrics.total_files));
    md.push_str(&format!("- **Lines:** {}\n", result.metrics.total_lines));
    md.push_str(&format!("- **Size:** {} bytes\n", result.metrics.total_size));
    md.push_str(&format!("- **Skipped (oversized):** {}\n", result.metrics.skipped.len()));
    md.push('\n');

    md.push_str("## Files by Type\n\n");
    for (ext, files) in &result.metrics.files_by_type {
        let lines: usize = files.iter().map(|f| f.total_lines).sum();
        md.push_str(&format!("- **{}**: {} files, {} lines\n", ext, files.len(), lines));
    }
    md.push('\n');

    md.push_str("## Classes\n\n");
    for (name, class) in &result.classes {
        md.push_str(&format!("### {}\n\n", name));
        if !class.inherits_from.is_empty() {
            md.push_str(&format!("Inherits from: {}\n\n", class.inherits_from.join(", ")));
        }
        if let Some(doc) = &class.docstring {
            md.push_str(&format!("{}\n\n", doc));
        }
    }

    md.push_str("## Functions\n\n");
    for (name, func) in &result.functions {
        md.push_str(&format!(
            "- `{}({})` (line {})\n",
            name,
            func.parameters.join(", "),
            func.line_start
        ));
    }

    md
}
