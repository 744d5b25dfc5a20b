use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use turing_engine::types::{DEFAULT_GROWTH_SIZE, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TAPE_SIZE};
use turing_engine::{
    analyze, describe, Checkpoint, Extent, LoadOptions, Mode, Program, ProgramLoader,
    ProgramManager, RunConfig, RunOutcome, Tape, TapeConfig, TransitionTable, TuringMachine,
    TuringMachineError,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine description file to execute
    #[clap(short, long, conflicts_with = "builtin")]
    machine: Option<PathBuf>,

    /// Run a built-in machine by name (see --list)
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(long)]
    list: bool,

    /// Initial tape: comma-separated symbol names placed from position 0
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Write the final tape to this file instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Initial length of a blank tape
    #[clap(short = 't', long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_length: usize,

    /// Number of cells added whenever the tape grows
    #[clap(short, long, default_value_t = DEFAULT_GROWTH_SIZE)]
    growth: usize,

    /// Initial head position. Defaults to the middle of a blank tape, or 0 for a loaded one
    #[clap(long, allow_negative_numbers = true)]
    head: Option<i64>,

    /// Start state name. Defaults to the first declared state
    #[clap(long)]
    start: Option<String>,

    /// Only `HALT` may be used as an undeclared next state
    #[clap(long)]
    strict: bool,

    /// Stop after this many steps
    #[clap(long)]
    max_steps: Option<u64>,

    /// Only output the written part of the tape
    #[clap(long)]
    trim: bool,

    /// Save the final machine and tape as a JSON checkpoint
    #[clap(long)]
    checkpoint: Option<PathBuf>,

    /// Continue from a JSON checkpoint instead of a fresh tape
    #[clap(long, conflicts_with = "input")]
    resume: Option<PathBuf>,

    /// Print the machine and periodic progress
    #[clap(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        for index in 0..ProgramManager::get_program_count() {
            let info = ProgramManager::get_program_info(index)?;
            println!(
                "{:<20} {} states, {} transitions  {}",
                info.name, info.state_count, info.transition_count, info.description
            );
        }
        return Ok(());
    }

    let (table, builtin) = load_table(&cli)?;
    for line in describe(&table).lines() {
        debug!("{}", line);
    }
    for warning in analyze(&table) {
        warn!(%warning, "machine analysis");
    }

    let (mut machine, mut tape) = match &cli.resume {
        Some(path) => Checkpoint::load(path)?.restore(table.clone())?,
        None => new_run(&cli, table.clone(), builtin)?,
    };

    let config = RunConfig {
        max_steps: cli.max_steps,
        progress_interval: cli.verbose.then_some(DEFAULT_PROGRESS_INTERVAL),
    };

    let mut last_report = Instant::now();
    let mut last_steps = machine.step_count();
    let result = machine.run_with(&mut tape, &config, |progress| {
        let elapsed = last_report.elapsed().as_secs_f64();
        let steps = progress.step_count - last_steps;
        if steps > 0 && elapsed > 0.0 {
            info!(
                steps = progress.step_count,
                steps_per_sec = (steps as f64 / elapsed) as u64,
                tape_len = progress.tape_len,
                "progress"
            );
        }
        last_report = Instant::now();
        last_steps = progress.step_count;
        ControlFlow::Continue(())
    });

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(TuringMachineError::UndefinedTransition {
            state,
            symbol,
            step,
        }) => {
            return Err(format!(
                "No transition defined for state {} reading symbol {} at step {}",
                table.state_name(state).unwrap_or("?"),
                table.alphabet().name_of(symbol).unwrap_or("?"),
                step
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        RunOutcome::Halted { steps } => println!("Machine halted after {} steps.", steps),
        RunOutcome::StepLimit { steps } | RunOutcome::Cancelled { steps } => {
            println!("Machine stopped after {} steps without halting.", steps)
        }
    }

    if let Some(path) = &cli.checkpoint {
        machine.checkpoint(&tape).save(path)?;
        info!(path = %path.display(), "checkpoint saved");
    }

    let extent = if cli.trim {
        Extent::Written
    } else {
        Extent::Window
    };
    match &cli.output {
        Some(path) => tape.save(File::create(path)?, table.alphabet(), extent)?,
        None => println!("{}", tape.render(table.alphabet(), extent)?),
    }

    Ok(())
}

/// Installs a stderr subscriber honoring `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the machine selected on the command line.
fn load_table(
    cli: &Cli,
) -> Result<(Arc<TransitionTable>, Option<&'static Program>), Box<dyn Error>> {
    let options = LoadOptions {
        mode: if cli.strict {
            Mode::Strict
        } else {
            Mode::Lenient
        },
        start: cli.start.clone(),
    };

    if let Some(path) = &cli.machine {
        let table = ProgramLoader::load_machine(path, &options)?;
        Ok((Arc::new(table), None))
    } else if let Some(name) = &cli.builtin {
        let program = ProgramManager::get_program_by_name(name)?;
        Ok((program.table.clone(), Some(program)))
    } else {
        Err("No machine selected, use --machine or --builtin".into())
    }
}

/// Creates a fresh machine and its initial tape.
fn new_run(
    cli: &Cli,
    table: Arc<TransitionTable>,
    builtin: Option<&Program>,
) -> Result<(TuringMachine, Tape), TuringMachineError> {
    let (tape, default_head) = if let Some(path) = &cli.input {
        (ProgramLoader::load_tape(path, table.alphabet(), cli.growth)?, 0)
    } else if let Some(program) = builtin {
        (program.tape(cli.growth)?, 0)
    } else {
        let config = TapeConfig {
            initial_size: cli.tape_length,
            growth_size: cli.growth,
        };
        (config.build()?, config.center())
    };

    let head = cli.head.unwrap_or(default_head);
    let machine = match &cli.start {
        Some(name) => {
            let start = table
                .state_id(name)
                .ok_or_else(|| TuringMachineError::UnknownState(name.clone()))?;
            TuringMachine::with_start(table, start, head)?
        }
        None => TuringMachine::new(table, head),
    };

    Ok((machine, tape))
}
