//! Batches of computer-versus-computer games
//!
//! Every game is an independent [`Game`] instance, so games run in parallel.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use std::sync::mpsc::{channel, Receiver};
use std::thread;

use crate::board::Piece;
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::game::{Game, Status};
use crate::policy::Difficulty;

/// Totals of a match, from the point of view of the `first` tier
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl MatchResult {
    pub fn games(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Outcome {
    FirstWins,
    SecondWins,
    Draw,
}

enum Message {
    Game(Result<Outcome, GameError>),
    Finish,
}

/// Plays `games` games between two tiers, `first` opening the even-numbered games
/// and `second` the odd-numbered ones
pub fn play_match(
    config: &EngineConfig,
    first: Difficulty,
    second: Difficulty,
    games: usize,
    show_progress: bool,
) -> Result<MatchResult, GameError> {
    let progress = if show_progress {
        ProgressBar::new(games as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} {bar:40.cyan/blue} {pos}/{len} games ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );
    progress.set_prefix(&format!("{} vs {}", first, second));

    let config = config.clone();
    let rx = spawn_games(games, move |index| play_one(&config, first, second, index));

    let mut result = MatchResult::default();
    for message in rx {
        match message {
            Message::Game(outcome) => {
                match outcome? {
                    Outcome::FirstWins => result.first_wins += 1,
                    Outcome::SecondWins => result.second_wins += 1,
                    Outcome::Draw => result.draws += 1,
                }
                progress.inc(1);
            }
            Message::Finish => break,
        }
    }
    progress.finish();

    info!(
        "{} vs {}: {} wins, {} losses, {} draws",
        first, second, result.first_wins, result.second_wins, result.draws
    );
    Ok(result)
}

/// Plays games `0..games` on the rayon pool and sends every outcome down the
/// returned channel. No new game starts once the receiver hangs up.
fn spawn_games<F>(games: usize, play: F) -> Receiver<Message>
where
    F: Fn(usize) -> Result<Outcome, GameError> + Send + Sync + 'static,
{
    let (tx, rx) = channel();
    thread::spawn(move || {
        let played = (0..games)
            .into_par_iter()
            .try_for_each_with(tx.clone(), |tx, index| tx.send(Message::Game(play(index))));
        if played.is_ok() {
            tx.send(Message::Finish).ok();
        }
    });
    rx
}

fn play_one(
    config: &EngineConfig,
    first: Difficulty,
    second: Difficulty,
    index: usize,
) -> Result<Outcome, GameError> {
    let mut config = config.clone();
    config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
    let mut game = Game::from_config(&config);

    // swap who opens every other game
    let first_piece = if index % 2 == 0 {
        Piece::PlayerA
    } else {
        Piece::PlayerB
    };

    while game.status() == Status::Playing {
        let tier = if game.current_player() == first_piece {
            first
        } else {
            second
        };
        game.set_difficulty_level(tier);
        game.computer_move()?;
    }

    Ok(match game.status() {
        Status::Won(piece) if piece == first_piece => Outcome::FirstWins,
        Status::Won(_) => Outcome::SecondWins,
        _ => Outcome::Draw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn failed_game_stops_remaining_games() {
        let games = 100_000;
        let played = Arc::new(AtomicUsize::new(0));
        let counter = played.clone();
        let rx = spawn_games(games, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            Err(GameError::GameOver)
        });

        assert!(matches!(
            rx.recv(),
            Ok(Message::Game(Err(GameError::GameOver)))
        ));
        drop(rx);

        thread::sleep(Duration::from_millis(200));
        assert!(played.load(Ordering::SeqCst) < games);
    }

    #[test]
    fn every_game_is_counted() {
        let rx = spawn_games(9, |index| {
            Ok(match index % 3 {
                0 => Outcome::FirstWins,
                1 => Outcome::SecondWins,
                _ => Outcome::Draw,
            })
        });
        let outcomes: Vec<_> = rx
            .iter()
            .take_while(|message| matches!(message, Message::Game(_)))
            .collect();
        assert_eq!(outcomes.len(), 9);
    }
}
