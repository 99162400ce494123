mod commands;

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use annuaire_core::DEFAULT_DATA_FILE;
use annuaire_web::{WebConfig, DEFAULT_BIND, DEFAULT_EXPORT_DIR};
use clap::{builder::NonEmptyStringValueParser, ArgAction, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "annuaire", version, about = "Contact directory with a command line and a web interface")]
struct Cli {
    /// JSON file the contacts are loaded from and saved to
    #[arg(long, global = true, env = "ANNUAIRE_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        first: String,
        #[arg(long)]
        phone: String,
    },
    /// List all contacts
    List,
    /// Find a contact by last name, first name or phone (exact match)
    Search {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
    /// Delete a contact by last name
    Delete {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
    /// Change the first name and/or phone of a contact
    Update {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
        /// New first name, unchanged when omitted
        #[arg(long, default_value = "")]
        first: String,
        /// New phone number, unchanged when omitted
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Write all contacts to a JSON file
    Export {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace all contacts with the content of a JSON file
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    /// Start the web interface
    Server {
        #[arg(long, env = "ANNUAIRE_HTTP_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
        /// Directory holding exported files until they are downloaded
        #[arg(long, env = "ANNUAIRE_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
        export_dir: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!("\nContacts are saved to: {}", cli.data_file.display());
        return ExitCode::SUCCESS;
    };

    let result = match command {
        Command::Server { bind, export_dir } => annuaire_web::serve(WebConfig { bind, export_dir })
            .await
            .map_err(anyhow::Error::from),
        command => run(command, &cli.data_file, &mut io::stdout().lock()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, data_file: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let mut dir = commands::load_directory(data_file)?;
    match command {
        Command::Add { name, first, phone } => commands::add(&mut dir, data_file, &name, &first, &phone, out),
        Command::List => commands::list(&dir, out),
        Command::Search { name } => commands::search(&dir, &name, out),
        Command::Delete { name } => commands::delete(&mut dir, data_file, &name, out),
        Command::Update { name, first, phone } => commands::update(&mut dir, data_file, &name, &first, &phone, out),
        Command::Export { file } => commands::export(&dir, &file, out),
        Command::Import { file } => commands::import(&mut dir, data_file, &file, out),
        Command::Server { .. } => anyhow::bail!("the server does not use the data file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["annuaire"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn add_requires_all_three_flags() {
        let err = Cli::try_parse_from(["annuaire", "add", "--name", "Dupont", "--first", "Jean"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn empty_name_is_rejected_for_delete() {
        let err = Cli::try_parse_from(["annuaire", "delete", "--name", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn update_fields_default_to_unchanged() {
        let cli = Cli::try_parse_from(["annuaire", "update", "--name", "Dupont", "--phone", "2"]).unwrap();
        match cli.command {
            Some(Command::Update { name, first, phone }) => {
                assert_eq!(name, "Dupont");
                assert_eq!(first, "");
                assert_eq!(phone, "2");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["annuaire", "list", "--data-file", "x.json", "-vv"]).unwrap();
        assert_eq!(cli.data_file, PathBuf::from("x.json"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn server_parses_bind_address() {
        let cli = Cli::try_parse_from(["annuaire", "server", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Some(Command::Server { bind, .. }) => assert_eq!(bind.port(), 9000),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["annuaire", "server", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = Cli::try_parse_from(["annuaire", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn run_reloads_the_data_file_each_time() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("data").join("contacts.json");
        let add = Command::Add {
            name: "Dupont".into(),
            first: "Jean".into(),
            phone: "0123456789".into(),
        };
        run(add, &data_file, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        run(Command::List, &data_file, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Contact list (1 total):\n- Jean Dupont: 0123456789\n"
        );

        let missing = Command::Add {
            name: "Martin".into(),
            first: String::new(),
            phone: "1".into(),
        };
        let err = run(missing, &data_file, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "required fields missing: first");
    }
}
