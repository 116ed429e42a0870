use clap::{Parser, Subcommand};
use fieldmask::{ConfigError, EngineConfig, FieldKey};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fieldmask", version, about = "Masked text-input formatting and validation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed `input` into a configured field one keystroke at a time.
    /// `\b` and DEL act as backspace.
    Type {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        field: String,
        input: String,
        /// Reveal a masked-with-toggle field before printing.
        #[arg(long)]
        reveal: bool,
    },
    /// List configured fields.
    Fields {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schema of the config format.
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    match cli.command {
        Command::Type {
            config,
            field,
            input,
            reveal,
        } => {
            let fields = EngineConfig::load(config)?.build()?;
            let mut field = fields.field(field.as_str())?;
            for ch in input.chars() {
                let key = match ch {
                    '\u{8}' | '\u{7f}' => FieldKey::Backspace,
                    _ => FieldKey::Char(ch),
                };
                field.handle_key(key);
            }
            if reveal {
                field.toggle_secure();
            }

            let validation = field.validation();
            println!("raw:      {}", field.raw());
            println!("display:  {}", field.rendered());
            println!("caret:    {}", field.caret());
            match &validation.reason {
                Some(reason) if !validation.is_valid => println!("valid:    false ({reason})"),
                _ => println!("valid:    {}", validation.is_valid),
            }
        }
        Command::Fields { config } => {
            let fields = EngineConfig::load(config)?.build()?;
            for name in fields.names() {
                if let Some(spec) = fields.get(name) {
                    println!(
                        "{name}\t{}\t{}",
                        spec.formatter.kind().name(),
                        spec.formatter.rule()
                    );
                }
            }
        }
        Command::Schema => {
            let schema = EngineConfig::json_schema()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}
