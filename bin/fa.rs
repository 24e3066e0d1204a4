use finite_automata::prelude::*;

use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("fa")
        .about("Classify words with finite automata and determinize them")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(
            Command::new("classify")
                .about("reads an automaton description and classifies the given word as ACCEPTED, REJECTED or INVALID")
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("epsilon")
                        .short('e')
                        .long("epsilon")
                        .action(ArgAction::SetTrue)
                        .help("take epsilon transitions while classifying"),
                )
                .arg(Arg::new("word").num_args(0..).trailing_var_arg(true)),
        )
        .subcommand(
            Command::new("determinize")
                .about("reads an automaton description and prints an equivalent deterministic automaton")
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("table")
                        .short('t')
                        .long("table")
                        .action(ArgAction::SetTrue)
                        .help("print a transition table instead of a description"),
                ),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_automaton(matches: &ArgMatches) -> Automaton {
    let path = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or_default();
    debug!("loading automaton from {path}");
    match load_path(path) {
        Ok(aut) => aut,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1)
        }
    }
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match matches.subcommand() {
        Some(("classify", sub_matches)) => {
            let aut = read_automaton(sub_matches);
            let word = sub_matches
                .get_many::<String>("word")
                .map(|symbols| symbols.cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            let policy = if sub_matches.get_flag("epsilon") {
                EpsilonPolicy::Follow
            } else {
                EpsilonPolicy::Ignore
            };

            let start = std::time::Instant::now();
            let verdict = Processor::new()
                .with_epsilon_policy(policy)
                .classify(&aut, &word);
            info!("classification took {}µs", start.elapsed().as_micros());

            println!("{verdict}");
        }
        Some(("determinize", sub_matches)) => {
            let aut = read_automaton(sub_matches);

            let start = std::time::Instant::now();
            let dfa = determinize(&aut);
            info!(
                "determinization into {} states took {}µs",
                dfa.size(),
                start.elapsed().as_micros()
            );

            if sub_matches.get_flag("table") {
                println!("{}", dfa.transition_table());
            } else {
                print!("{}", describe(&dfa));
            }
        }
        _ => unreachable!(),
    }
}
