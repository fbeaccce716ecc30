use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mockstate_cli::{load_config, load_mappings, load_script, template_scenarios, Replayer};
use mockstate_stub::MockstateConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn stubs_arg() -> Arg {
    Arg::new("stubs")
        .long("stubs")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("WireMock-style mappings file ({\"mappings\": [...]})")
}

fn cli() -> Command {
    Command::new("mockstate")
        .version(mockstate_cli::VERSION)
        .about("Replay session-aware scenario flows against stub mappings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
        .subcommand(
            Command::new("replay")
                .about("Run a YAML script of requests and admin steps")
                .arg(stubs_arg())
                .arg(
                    Arg::new("script")
                        .long("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("YAML replay script"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print one JSON object per step"),
                ),
        )
        .subcommand(
            Command::new("scenarios")
                .about("List template scenarios derived from a mappings file")
                .arg(stubs_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing --{name}"))
}

fn replay(args: &ArgMatches) -> Result<bool> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(file) => load_config(file).context("loading configuration")?,
        None => MockstateConfig::default(),
    };
    let mappings = load_mappings(path(args, "stubs")?).context("loading mappings")?;
    let script = load_script(path(args, "script")?).context("loading script")?;

    let mut replayer = Replayer::new(&config, mappings).context("registering mappings")?;
    let report = replayer.run(&script);

    if args.get_flag("json") {
        for outcome in &report.outcomes {
            println!("{}", serde_json::to_string(outcome)?);
        }
    } else {
        for outcome in &report.outcomes {
            println!("{outcome}");
        }
        println!();
        println!("{}", report.summary());
    }
    Ok(report.passed())
}

fn scenarios(args: &ArgMatches) -> Result<bool> {
    let mappings = load_mappings(path(args, "stubs")?).context("loading mappings")?;
    let templates = template_scenarios(mappings).context("registering mappings")?;

    if templates.is_empty() {
        println!("No scenarios");
    }
    for scenario in &templates {
        println!(
            "{}\t{}\t{} stubs",
            scenario.name(),
            scenario.state(),
            scenario.stub_ids().len()
        );
    }
    Ok(true)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let passed = match matches.subcommand() {
        Some(("replay", args)) => replay(args)?,
        Some(("scenarios", args)) => scenarios(args)?,
        _ => true,
    };

    std::process::exit(if passed { 0 } else { 1 });
}
