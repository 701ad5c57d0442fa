use anyhow::Context;
use clap::{Parser, Subcommand};
use mlviz_validator::{Kind, Result, diagnostics, validate};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "mlviz-validate")]
#[command(about = "Structural validator for ML visualization inputs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document against a chart kind (reports every error found).
    Check {
        /// Chart kind, e.g. pipeline, knowledge-graph, count-tree.
        #[arg(long)]
        kind: String,

        #[arg(long)]
        input: String,

        /// Emit the report as JSON instead of one line per error.
        #[arg(long)]
        json: bool,
    },
    /// List the supported chart kinds.
    Kinds,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    errors: &'a [mlviz_validator::ValidationError],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check { kind, input, json } => {
            // An unknown kind is a configuration error, not a validation
            // failure; it aborts before the document is inspected.
            let kind: Kind = kind.parse()?;

            if !input.ends_with(".json") {
                diagnostics::warn(format!("input file {} does not end in .json", input));
            }

            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read input file {}", input))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).with_context(|| format!("parse JSON in {}", input))?;

            let report = validate(kind, &value);

            if json {
                let out = JsonReport {
                    valid: report.is_valid(),
                    errors: &report.errors,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for err in &report.errors {
                    println!("{err}");
                }
            }

            if !report.is_valid() {
                anyhow::bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "{} failed validation as {} with {} error(s)",
                        input,
                        kind,
                        report.errors.len()
                    ))
                );
            }

            if !json {
                println!("{} is a valid {} document", input, kind);
            }
        }
        Commands::Kinds => {
            for kind in Kind::ALL {
                println!("{kind}");
            }
        }
    }

    Ok(())
}
