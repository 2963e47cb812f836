use anyhow::Result;
use clap::{Parser, Subcommand};

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use connect4_engine::arena::play_match;
use connect4_engine::board::Piece;
use connect4_engine::config::EngineConfig;
use connect4_engine::game::{Game, Status};
use connect4_engine::policy::Difficulty;
use connect4_engine::WIDTH;

mod display;
use display::*;

/// Play Connect 4 against a computer opponent of adjustable strength
#[derive(Parser)]
#[command(name = "connect4_tiers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Starting tier: easy, medium, hard or very-hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Let the computer open the game
    #[arg(long)]
    computer_first: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game in the terminal
    Play,
    /// Pit two tiers against each other over many games
    Arena {
        #[arg(long, default_value_t = 20)]
        games: usize,
        #[arg(long, default_value = "hard")]
        first: Difficulty,
        #[arg(long, default_value = "medium")]
        second: Difficulty,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }

    match cli.command {
        Some(Commands::Arena {
            games,
            first,
            second,
        }) => {
            let result = play_match(&config, first, second, games, true)?;
            println!(
                "{} vs {} over {} games: {} wins, {} losses, {} draws",
                first,
                second,
                result.games(),
                result.first_wins,
                result.second_wins,
                result.draws
            );
            Ok(())
        }
        Some(Commands::Play) | None => play(&config, cli.computer_first),
    }
}

fn play(config: &EngineConfig, computer_first: bool) -> Result<()> {
    let mut game = Game::from_config(config);
    let human = if computer_first {
        Piece::PlayerB
    } else {
        Piece::PlayerA
    };
    let stdin = stdin();

    println!("Welcome to Connect 4\n");
    println!(
        "You are {}. Enter a column between 1 and {}, or 'd <tier>' to change difficulty.\n",
        player_name(human),
        WIDTH
    );

    // game loop
    loop {
        display(game.board())?;

        match game.status() {
            Status::Playing => {
                if game.current_player() != human {
                    println!("Computer ({}) is thinking...", game.difficulty());
                    stdout().flush()?;
                    game.computer_move()?;
                    continue;
                }

                print!("Move input > ");
                stdout().flush()?;
                let mut input_str = String::new();
                if stdin.read_line(&mut input_str)? == 0 {
                    // stdin closed
                    return Ok(());
                }
                let input = input_str.trim();

                if let Some(tier) = input.strip_prefix('d') {
                    match game.set_difficulty(tier) {
                        Ok(()) => println!("Difficulty set to {}", game.difficulty()),
                        Err(err) => println!("{}", err),
                    }
                    continue;
                }

                let column = match input.parse::<usize>() {
                    Ok(column @ 1..=WIDTH) => column - 1,
                    _ => {
                        println!("Invalid number: {}", input);
                        continue;
                    }
                };
                if let Err(err) = game.make_move(column) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            Status::Won(piece) if piece == human => {
                println!("You win!");
                break;
            }
            Status::Won(_) => {
                println!("Computer wins!");
                break;
            }
            Status::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}
