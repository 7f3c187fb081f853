use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use scribe_artifact::{Artifact, Direction};
use scribe_reconcile::Viewport;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

fn artifact_arg() -> Arg {
    Arg::new("artifact")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Artifact JSON file")
}

fn cli() -> Command {
    Command::new("scribe")
        .version(scribe_cli::VERSION)
        .about("Inspect and edit co-authored artifacts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("current")
                .about("Print the current version")
                .arg(artifact_arg()),
        )
        .subcommand(
            Command::new("annotate")
                .about("Print the current text with suggestion markers")
                .arg(artifact_arg())
                .arg(
                    Arg::new("html")
                        .long("html")
                        .action(ArgAction::SetTrue)
                        .help("Emit HTML spans instead of diff markers"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Accept a pending suggestion")
                .arg(artifact_arg())
                .arg(
                    Arg::new("index")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Position in the pending list"),
                ),
        )
        .subcommand(
            Command::new("navigate")
                .about("Move through the version history")
                .arg(artifact_arg())
                .arg(
                    Arg::new("direction")
                        .required(true)
                        .value_parser(["back", "forward"])
                        .help("Direction to move"),
                ),
        )
        .subcommand(
            Command::new("layout")
                .about("Compute suggestion card positions")
                .arg(
                    Arg::new("tops")
                        .long("tops")
                        .default_value("")
                        .help("Marker tops, comma separated; '-' for unrendered"),
                )
                .arg(
                    Arg::new("heights")
                        .long("heights")
                        .default_value("")
                        .help("Measured card heights, comma separated; '-' for unmeasured"),
                )
                .arg(
                    Arg::new("selected")
                        .long("selected")
                        .value_parser(value_parser!(usize))
                        .help("Selected card position"),
                )
                .arg(
                    Arg::new("container-top")
                        .long("container-top")
                        .default_value("0")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("scroll-top")
                        .long("scroll-top")
                        .default_value("0")
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("merge-notes")
                .about("Merge an incoming notes record into an existing one")
                .arg(
                    Arg::new("incoming")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Notes record JSON file"),
                )
                .arg(
                    Arg::new("existing")
                        .long("existing")
                        .value_parser(value_parser!(PathBuf))
                        .help("Previously stored notes record"),
                ),
        )
        .subcommand(
            Command::new("board-move")
                .about("Move one board note")
                .arg(artifact_arg())
                .arg(
                    Arg::new("note")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(Arg::new("x").required(true).value_parser(value_parser!(f64)))
                .arg(Arg::new("y").required(true).value_parser(value_parser!(f64))),
        )
        .subcommand(
            Command::new("outline")
                .about("List headings of the current text")
                .arg(artifact_arg()),
        )
}

fn artifact(args: &ArgMatches) -> Result<Artifact> {
    let path = args
        .get_one::<PathBuf>("artifact")
        .context("missing artifact path")?;
    scribe_cli::load_artifact(path)
}

fn print_artifact(artifact: &Artifact) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(artifact)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(scribe_cli::log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let matches = cli().get_matches();
    let config_path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = scribe_cli::load_config(config_path)?;

    match matches.subcommand() {
        Some(("current", args)) => {
            println!("{}", scribe_cli::current(&artifact(args)?)?);
        }
        Some(("annotate", args)) => {
            let annotation = scribe_cli::annotate(&artifact(args)?, args.get_flag("html"))?;
            println!("{}", annotation.text);
            if !annotation.unplaced.is_empty() {
                eprintln!("unplaced suggestions: {:?}", annotation.unplaced);
            }
        }
        Some(("apply", args)) => {
            let index = *args.get_one::<usize>("index").context("missing index")?;
            print_artifact(&scribe_cli::apply(artifact(args)?, &config, index)?)?;
        }
        Some(("navigate", args)) => {
            let direction: Direction = args
                .get_one::<String>("direction")
                .context("missing direction")?
                .parse()?;
            print_artifact(&scribe_cli::navigate(artifact(args)?, direction)?)?;
        }
        Some(("layout", args)) => {
            let tops = measurements(args, "tops")?;
            let heights = measurements(args, "heights")?;
            let viewport = Viewport {
                container_top: args.get_one::<f64>("container-top").copied().unwrap_or_default(),
                scroll_top: args.get_one::<f64>("scroll-top").copied().unwrap_or_default(),
            };
            let selected = args.get_one::<usize>("selected").copied();
            let positions = scribe_cli::layout(&config, &tops, &heights, selected, viewport);
            println!("{}", serde_json::to_string(&positions)?);
        }
        Some(("merge-notes", args)) => {
            let incoming = args
                .get_one::<PathBuf>("incoming")
                .context("missing incoming notes")?;
            let existing = args.get_one::<PathBuf>("existing").map(PathBuf::as_path);
            let merged = scribe_cli::merge_notes_files(existing, incoming)?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Some(("board-move", args)) => {
            let note = *args.get_one::<usize>("note").context("missing note")?;
            let x = *args.get_one::<f64>("x").context("missing x")?;
            let y = *args.get_one::<f64>("y").context("missing y")?;
            print_artifact(&scribe_cli::board_move(artifact(args)?, note, x, y)?)?;
        }
        Some(("outline", args)) => {
            for heading in scribe_cli::headings(&artifact(args)?)? {
                let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
                println!("{indent}{}", heading.text);
            }
        }
        _ => {}
    }
    Ok(())
}

fn measurements(args: &ArgMatches, name: &str) -> Result<Vec<Option<f64>>> {
    let raw = args.get_one::<String>(name).map_or("", String::as_str);
    scribe_cli::parse_measurements(raw)
}
