extern crate minimax_ttt;

use minimax_ttt::game::GameState;
use minimax_ttt::minimax::Engine;
use minimax_ttt::random::StandardRandomGenerator;
use minimax_ttt::{Outcome, Player};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The engine opens as O with a random cell, then both sides search
    let mut engine = Engine::builder()
        .with_random_generator(StandardRandomGenerator)
        .build();
    let mut game = GameState::new(Player::O);

    while game.outcome() == Outcome::InProgress {
        let side = game.side_to_move();
        let reply = match engine.choose_move(&game) {
            Ok(reply) => reply,
            Err(err) => {
                eprintln!("engine failed: {err}");
                std::process::exit(1);
            }
        };
        if let Err(err) = game.play(reply.mv) {
            eprintln!("engine played an illegal move: {err}");
            std::process::exit(1);
        }

        println!(
            "{:?} plays {} (value {:+})\n{}\n",
            side,
            reply.mv,
            reply.value,
            game.board()
        );
    }

    match game.outcome() {
        Outcome::Draw => println!("It's a draw!"),
        outcome => {
            println!("{:?} on line {:?}", outcome, game.winning_line());
            // optimal play on both sides cannot produce a winner
            std::process::exit(1);
        }
    }
}
