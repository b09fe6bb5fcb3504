//! `students`: query and order a student roster from the command line

use clap::{value_parser, Arg, ArgAction, Command};
use std::io::{self, BufWriter};
use std::process;
use tracing_subscriber::EnvFilter;

use roster_sort::{
    config::{QueryConfig, QueryConfigBuilder},
    error::{RosterError, RosterResult},
    ordering::OrderKey,
    run,
    sample::sample_roster,
    SchoolYear, Student, Students,
};

fn main() {
    let result = run_cli();
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("students: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_cli() -> RosterResult<i32> {
    let matches = build_cli().get_matches();

    let config = parse_config_from_matches(&matches)?;
    init_logging(config.debug);

    if config.parallel_threshold.is_some() {
        build_thread_pool(&config)?;
    }

    let students = parse_students(&matches)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &students, &mut out)
}

/// Size the global rayon pool used by parallel ordering
fn build_thread_pool(config: &QueryConfig) -> RosterResult<()> {
    let threads = config.effective_thread_count();
    tracing::debug!(threads, "building thread pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| RosterError::thread_pool_error(&e.to_string()))
}

/// Log to stderr; `RUST_LOG` applies unless `--debug` forces debug level
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("roster_sort=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    Command::new("students")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query and order a student roster")
        .long_about("Query and order a student roster.\n\nStudents are given as ID,NAME,START,END,CC where START and END are school years such as 2019-2020. Without --student a built-in sample roster is used. With no query options the roster is listed ordered by id.")

        // Input
        .arg(Arg::new("student")
            .short('s')
            .long("student")
            .help("Add a student: ID,NAME,START,END,CC (empty ID or NAME leaves it absent)")
            .value_name("SPEC")
            .action(ArgAction::Append))

        // Ordering
        .arg(Arg::new("order")
            .short('o')
            .long("order")
            .help("Order students by KEY: id, or name (ties broken by id)")
            .value_name("KEY")
            .value_parser(["id", "name"]))
        .arg(Arg::new("reverse")
            .short('r')
            .long("reverse")
            .help("Reverse the ordering")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("check")
            .short('c')
            .long("check")
            .help("Check whether the roster is already ordered; do not order")
            .action(ArgAction::SetTrue))

        // Filters
        .arg(Arg::new("starting-between")
            .long("starting-between")
            .help("Students whose first school year starts between FROM and TO (inclusive)")
            .num_args(2)
            .value_names(["FROM", "TO"])
            .value_parser(value_parser!(i32))
            .allow_negative_numbers(true))
        .arg(Arg::new("finishing-between")
            .long("finishing-between")
            .help("Students whose last school year ends between FROM and TO (inclusive)")
            .num_args(2)
            .value_names(["FROM", "TO"])
            .value_parser(value_parser!(i32))
            .allow_negative_numbers(true))

        // Grouping and counting
        .arg(Arg::new("group-by-start-year")
            .short('g')
            .long("group-by-start-year")
            .help("Group students by start year")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("course-lengths")
            .long("course-lengths")
            .allow_hyphen_values(true)
            .help("Count course lengths among students starting in YEAR (e.g. 2020-2021)")
            .value_name("YEAR"))
        .arg(Arg::new("country-codes")
            .long("country-codes")
            .allow_hyphen_values(true)
            .help("Count country codes among students starting in YEAR (e.g. 2020-2021)")
            .value_name("YEAR"))

        // Performance options
        .arg(Arg::new("parallel")
            .long("parallel")
            .help("Use N threads for parallel ordering (default: number of CPUs)")
            .value_name("N"))
        .arg(Arg::new("parallel-threshold")
            .long("parallel-threshold")
            .help("Order in parallel once the roster has at least N students")
            .value_name("N"))

        .arg(Arg::new("debug")
            .long("debug")
            .help("Log query and sort details to stderr")
            .action(ArgAction::SetTrue))
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> RosterResult<QueryConfig> {
    let mut builder = QueryConfigBuilder::new();

    if let Some(order) = matches.get_one::<String>("order") {
        builder = builder.order(order.parse::<OrderKey>()?);
    }
    if matches.get_flag("reverse") {
        builder = builder.reverse();
    }
    if matches.get_flag("check") {
        builder = builder.check();
    }
    if let Some((from, to)) = year_bounds(matches, "starting-between") {
        builder = builder.starting_between(from, to);
    }
    if let Some((from, to)) = year_bounds(matches, "finishing-between") {
        builder = builder.finishing_between(from, to);
    }
    if matches.get_flag("group-by-start-year") {
        builder = builder.group_by_start_year();
    }
    if let Some(year) = matches.get_one::<String>("course-lengths") {
        builder = builder.course_lengths_for(year.parse::<SchoolYear>()?);
    }
    if let Some(year) = matches.get_one::<String>("country-codes") {
        builder = builder.country_codes_for(year.parse::<SchoolYear>()?);
    }
    if let Some(threshold) = matches.get_one::<String>("parallel-threshold") {
        let threshold: usize = threshold
            .parse()
            .map_err(|_| RosterError::parse_error(&format!("invalid parallel threshold: {}", threshold)))?;
        builder = builder.parallel_threshold(threshold);
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }

    let mut config = builder.build()?;

    // Set parallel threads
    if let Some(parallel_str) = matches.get_one::<String>("parallel") {
        let threads: usize = parallel_str
            .parse()
            .map_err(|_| RosterError::parse_error(&format!("invalid thread count: {}", parallel_str)))?;
        config.parallel_threads = Some(threads);
        if config.parallel_threshold.is_none() {
            config.parallel_threshold = Some(2);
        }
    }

    // Validate the final configuration
    config.validate()?;

    Ok(config)
}

fn year_bounds(matches: &clap::ArgMatches, id: &str) -> Option<(i32, i32)> {
    let values: Vec<i32> = matches.get_many::<i32>(id)?.copied().collect();
    match values.as_slice() {
        [from, to] => Some((*from, *to)),
        _ => None,
    }
}

/// Students from `--student`, or the sample roster when none were given
fn parse_students(matches: &clap::ArgMatches) -> RosterResult<Students> {
    match matches.get_many::<String>("student") {
        Some(specs) => specs.map(|spec| Student::parse_spec(spec)).collect(),
        None => Ok(sample_roster()),
    }
}
