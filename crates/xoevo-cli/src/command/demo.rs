use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use xoevo_arena::{FitnessEnvironment as _, TicTacToe};
use xoevo_nn::{Activation, Network, NetworkShape};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    /// Seed for the network weights (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [36, 18])]
    pub(super) hidden: Vec<usize>,
    #[arg(long, default_value = "tanh")]
    pub(super) activation: Activation,
}

pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let env = TicTacToe::default();
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg64::seed_from_u64(seed);
    let shape = NetworkShape::new(
        env.state_vector_size(),
        env.action_space_size(),
        arg.hidden.clone(),
    );
    let function = arg.activation.function();
    let mut x = Network::random(&mut rng, &shape, function).context("Invalid network shape")?;
    let mut o = Network::random(&mut rng, &shape, function).context("Invalid network shape")?;

    let result = env.play_match(&mut x, &mut o)?;
    println!("Seed {seed}, hidden layers {:?}", arg.hidden);
    println!("{}", result.log);
    println!("Rewards: X {:+.3}, O {:+.3}", result.deltas[0], result.deltas[1]);
    Ok(())
}
