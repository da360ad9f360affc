//! kubefold CLI - render deployment-manifest templates
//!
//! Usage:
//!   kubefold render deployment.yml -o out.yml -s settings.yaml -e production
//!   kubefold get -s settings.yaml deployment.replicas
//!   kubefold check deployment.yml -s settings.yaml

use clap::{Parser, Subcommand};
use colored::Colorize;
use kubefold_core::subst::MarkerScanner;
use kubefold_core::{Session, SessionOptions, Value, DEFAULT_ENVIRONMENT};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// kubefold - deployment-manifest templating
#[derive(Parser)]
#[command(name = "kubefold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a manifest template against an environment settings tree
    Render {
        /// Template file to render
        template: PathBuf,

        /// Path to write the rendered YAML
        #[arg(short, long)]
        output: PathBuf,

        /// Settings tree (YAML) for the target environment
        #[arg(short, long)]
        settings: PathBuf,

        /// Environment name (single-character names fall back to the default)
        #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
        env: String,
    },

    /// Get a value from the settings tree by dotted path
    Get {
        /// Settings tree (YAML)
        #[arg(short, long)]
        settings: PathBuf,

        /// Dotted path to the value (e.g., deployment.replicas)
        path: String,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check templates: marker syntax plus YAML parse
    Check {
        /// Template file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Settings tree; when given, markers are fully resolved
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            template,
            output,
            settings,
            env,
        } => cmd_render(template, output, settings, env),

        Commands::Get {
            settings,
            path,
            format,
        } => cmd_get(settings, &path, &format),

        Commands::Check { files, settings } => cmd_check(files, settings),
    }
}

fn load_settings(path: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read settings {}: {}", path.display(), e))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse settings {}: {}", path.display(), e))
}

fn build_session(settings_path: &Path, env: String) -> Result<Session, String> {
    let settings = load_settings(settings_path)?;
    let options = SessionOptions {
        // Relative secrets paths resolve next to the settings file
        base_path: settings_path.parent().map(|p| p.to_path_buf()),
    };
    Ok(Session::with_options(env, settings, options))
}

fn cmd_render(template: PathBuf, output: PathBuf, settings: PathBuf, env: String) -> ExitCode {
    let session = match build_session(&settings, env) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match session.render_file(&template, &output) {
        Ok(_) => {
            eprintln!(
                "{} Rendered {} to {}",
                "✓".green(),
                template.display(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} Render failed\n\n{}", "✗".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_get(settings_path: PathBuf, path: &str, format: &str) -> ExitCode {
    let settings = match load_settings(&settings_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match settings.get_path(path) {
        Ok(value) => {
            match format {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&value).unwrap());
                }
                "yaml" => {
                    print!("{}", serde_yaml::to_string(&value).unwrap());
                }
                _ => {
                    // Text format - scalars print bare, complex values as YAML
                    match value {
                        Value::Sequence(_) | Value::Mapping(_) => {
                            print!("{}", serde_yaml::to_string(&value).unwrap());
                        }
                        scalar => println!("{}", scalar),
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(_) => {
            eprintln!("{}: Path '{}' not found", "Error".red(), path);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>, settings_path: Option<PathBuf>) -> ExitCode {
    let session = match settings_path {
        Some(path) => match build_session(&path, DEFAULT_ENVIRONMENT.to_string()) {
            Ok(s) => Some(s),
            Err(e) => {
                eprintln!("{}", e.red());
                return ExitCode::from(2);
            }
        },
        None => None,
    };

    let mut all_valid = true;

    for file in files {
        let content = match std::fs::read_to_string(&file) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
                continue;
            }
        };

        let result = match &session {
            // Full pipeline minus the write: substitution, parse, transform
            Some(session) => session.render_str(&content).map(|_| ()),
            // Without settings, only marker syntax and raw YAML are checkable
            None => MarkerScanner::new(&content)
                .scan()
                .and_then(|_| kubefold_core::parse_documents(&content))
                .map(|_| ()),
        };

        match result {
            Ok(_) => {
                println!("{} {}: valid", "✓".green(), file.display());
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
