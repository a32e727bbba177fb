use std::{
    io::{self, IsTerminal as _},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context as _;
use crossterm::event::{self, Event};
use xoevo_arena::{MatchResult, TicTacToe};
use xoevo_training::{GenerationReport, Trainer, TrainingConfig};

use crate::{
    model::{checkpoint, config::ConfigFile},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Configuration file (defaults are used when omitted)
    #[arg(long)]
    pub(super) config: Option<PathBuf>,
    /// Number of networks in the population
    #[arg(long)]
    pub(super) population: Option<usize>,
    /// Tournament rounds per generation
    #[arg(long)]
    pub(super) rounds: Option<usize>,
    /// Seed for the master random number generator
    #[arg(long)]
    pub(super) seed: Option<u64>,
    /// Stop after this many generations
    #[arg(long)]
    pub(super) generations: Option<usize>,
    /// Checkpoint file for the best network
    #[arg(long, short)]
    pub(super) output: Option<PathBuf>,
    /// Checkpoint file to start training from
    #[arg(long, short)]
    pub(super) input: Option<PathBuf>,
}

impl TrainArg {
    fn apply(&self, config: &mut TrainingConfig) {
        if let Some(size) = self.population {
            config.population_size = size;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(limit) = self.generations {
            config.max_generations = Some(limit);
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut file = match &arg.config {
        Some(path) => {
            let file = util::read_json_file::<ConfigFile, _>("config", path)?;
            log::debug!("loaded configuration from {}", path.display());
            file
        }
        None => ConfigFile::default(),
    };
    arg.apply(&mut file.training);
    let env = TicTacToe::new(file.rewards);

    let mut trainer = match &arg.input {
        Some(path) => {
            let base = checkpoint::load_network(path)?;
            Trainer::with_base(file.training, &env, &base)
        }
        None => Trainer::new(file.training, &env),
    }
    .context("Failed to set up training")?;

    let stop_key = StopKey::new();
    eprintln!(
        "Training {} networks, {} rounds per generation (seed {})",
        trainer.population().len(),
        trainer.config().rounds,
        trainer.seed()
    );
    if stop_key.enabled {
        eprintln!("Press Enter to stop.");
    }

    let report_interval = trainer.config().report_interval;
    let max_generations = trainer.config().max_generations;
    while max_generations.is_none_or(|max| trainer.generation() < max) {
        let report = trainer.step(&env);
        if report.generation % report_interval == 0 {
            print_report(&report);
            print_demo(&trainer.demo_match(&env)?);
            if let (Some(path), Some(best)) = (&arg.output, trainer.population().best()) {
                checkpoint::save_network(path, best)?;
            }
        }
        if stop_key.pressed()? {
            eprintln!("Stop requested after generation #{}", report.generation);
            break;
        }
    }

    let ranking = trainer.final_ranking(&env);
    eprintln!();
    eprintln!("Leaderboard after {} generations:", trainer.generation());
    for (rank, fitness) in ranking.iter().enumerate() {
        eprintln!("  {:2}: {fitness:.3}", rank + 1);
    }
    print_demo(&trainer.demo_match(&env)?);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    let GenerationReport {
        generation,
        tournament,
        selection,
        chance,
        amplitude,
        fitness,
        top_fitness,
    } = report;
    eprintln!("Generation #{generation}:");
    eprintln!(
        "  Fit: {}  Elite: {}  Replaced: {}  Aborted: {}",
        selection.fit_count, selection.elite_count, selection.replaced, tournament.aborted
    );
    eprintln!("  Mutation: chance {chance:.4}, amplitude {amplitude:.4}");
    eprintln!(
        "  Time: play {:.2?}, mutate {:.2?}",
        tournament.elapsed, selection.elapsed
    );
    eprintln!(
        "  Fitness: min {:.3}, max {:.3}, mean {:.3}, median {:.3}",
        fitness.min, fitness.max, fitness.mean, fitness.median
    );
    eprintln!("  Top: {top_fitness:.3?}");
}

fn print_demo(result: &MatchResult) {
    eprintln!("{}", result.log);
    eprintln!(
        "  Rewards: X {:+.3}, O {:+.3}",
        result.deltas[0], result.deltas[1]
    );
}

/// Detects key presses between generations.
///
/// Only active when stdin is a terminal. In a line-buffered terminal the key
/// events arrive once Enter is pressed.
#[derive(Debug)]
struct StopKey {
    enabled: bool,
}

impl StopKey {
    fn new() -> Self {
        Self {
            enabled: io::stdin().is_terminal(),
        }
    }

    fn pressed(&self) -> anyhow::Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        let mut pressed = false;
        while event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
            if let Event::Key(_) = event::read().context("Failed to read terminal event")? {
                pressed = true;
            }
        }
        Ok(pressed)
    }
}
