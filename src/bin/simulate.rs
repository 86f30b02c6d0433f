use std::error::Error;
use std::process;

use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cardmatch::{
    Bot, GameBuilder, GameError, create_bot_from_spec, describe_action, label_for_spec,
    render_state, render_view,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play rounds of the card-match game between bots and keep a running score."
)]
struct Args {
    /// Seed for shuffling and bot RNGs
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of rounds to play; scores accumulate across rounds
    #[arg(short = 'r', long = "rounds", default_value_t = 1)]
    rounds: usize,

    /// Stop a round after this many actions
    #[arg(long = "max-turns", default_value_t = 5_000)]
    max_turns: usize,

    /// Cards dealt to each player
    #[arg(long = "hand-size", default_value_t = 7)]
    hand_size: usize,

    /// Show the game state and chosen actions each turn
    #[arg(long = "visualize", action = ArgAction::SetTrue)]
    visualize: bool,

    /// Debug-level engine logging
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Player specs: random[:seed], heuristic (2-10 total)
    bots: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let bot_specs = if args.bots.is_empty() {
        vec![String::from("heuristic"), String::from("random")]
    } else {
        args.bots.clone()
    };
    let num_players = bot_specs.len();
    if num_players < 2 {
        return Err(GameError::NotEnoughPlayers { required: 2 }.into());
    }
    let mut game = GameBuilder::new("SIM")
        .with_seed(args.seed)
        .with_max_players(num_players)
        .with_hand_size(args.hand_size)
        .build()?;

    let mut bots: Vec<(String, Box<dyn Bot>)> = Vec::with_capacity(num_players);
    for (index, spec) in bot_specs.iter().enumerate() {
        let player_id = format!("p{index}");
        let name = format!("{} #{index}", label_for_spec(spec));
        game.add_player(player_id.clone(), name)?;
        bots.push((player_id, create_bot_from_spec(spec, index, args.seed)?));
    }

    println!("Starting {} round(s) with {num_players} players.\n", args.rounds);
    for round in 1..=args.rounds {
        game.reset_for_next_round()?;
        game.start_game()?;
        info!(round, "round dealt");
        let mut turns = 0usize;
        while !game.is_finished() {
            if turns >= args.max_turns {
                println!("Max turn limit {} reached. Abandoning round {round}.", args.max_turns);
                break;
            }
            let Some(current) = game.current_player().map(str::to_string) else {
                break;
            };
            let view = game.player_view(&current)?;
            let legal_actions = game.legal_actions(&current)?;
            if legal_actions.is_empty() {
                return Err("no legal actions available for current player".into());
            }
            let Some((_, bot)) = bots.iter_mut().find(|(id, _)| *id == current) else {
                return Err(format!("no bot seated for {current}").into());
            };
            if args.visualize {
                println!("{}", render_view(&view));
            }
            let action = bot.select_action(&view, &legal_actions);
            if args.visualize {
                println!("Chosen action: {}\n", describe_action(&view, &action));
            }
            let outcome = game.apply_action(&current, action)?;
            debug!(player = %current, ?outcome, "action applied");
            turns += 1;
        }

        let state = game.state_projection();
        println!("{}", render_state(&state));
        if !game.is_finished() {
            println!("Round {round} stopped before completion.");
            break;
        }
        println!("Round {round} finished after {turns} actions.");
    }

    println!("Final standings:");
    let mut standings: Vec<(String, u32)> = game
        .state_projection()
        .players
        .into_iter()
        .map(|player| (player.name, player.score))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, score) in standings {
        println!("  {name}: {score}");
    }
    Ok(())
}
