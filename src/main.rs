use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdin, stdout, Write};
use std::time::Duration;

use connect4_search::*;

mod display;

/// Play Connect 4 against a minimax / alpha-beta search
#[derive(Parser, Debug)]
#[command(name = "connect4", version)]
struct Args {
    /// Search strategy of the AI: random, minimax, alpha-beta or ab-cutoff
    #[arg(short, long, default_value = "alpha-beta")]
    algorithm: Algorithm,

    /// Plies to search, defaults to 4 for minimax and 6 for alpha-beta
    #[arg(short, long)]
    depth: Option<usize>,

    /// Cutoff depth of ab-cutoff, defaults to 5
    #[arg(short, long)]
    cutoff: Option<usize>,

    /// Stop widening the search after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Who moves first
    #[arg(long, value_enum, default_value_t = First::Random)]
    first: First,

    /// Seed for the random strategy, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Compare all strategies on one position and exit
    #[arg(long)]
    compare: bool,

    /// Position for --compare as 1-indexed columns, human first
    #[arg(long, default_value = "")]
    moves: String,

    /// Print the board as plain text instead of drawing it
    #[arg(long)]
    plain: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum First {
    Human,
    Ai,
    Random,
}

impl First {
    fn turn(self) -> Option<Turn> {
        match self {
            First::Human => Some(Turn::Human),
            First::Ai => Some(Turn::Ai),
            First::Random => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Play(usize),
    Restart,
    NewGame,
    Switch(Algorithm),
    Quit,
}

fn parse_command(input: &str, columns: usize) -> Result<Command> {
    let input = input.trim();
    let mut words = input.split_whitespace();
    match words.next() {
        Some("q") | Some("quit") => Ok(Command::Quit),
        Some("r") | Some("restart") => Ok(Command::Restart),
        Some("n") | Some("new") => Ok(Command::NewGame),
        Some("a") | Some("algorithm") => {
            let name = words
                .next()
                .ok_or_else(|| anyhow!("Missing algorithm name"))?;
            Ok(Command::Switch(name.parse()?))
        }
        Some(word) => match word.parse::<usize>() {
            Ok(column) if (1..=columns).contains(&column) => Ok(Command::Play(column - 1)),
            Ok(column) => Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column,
                columns
            )),
            Err(_) => Err(anyhow!("Invalid number: {}", word)),
        },
        None => Err(anyhow!("No input given")),
    }
}

fn search_config(args: &Args, algorithm: Algorithm) -> SearchConfig {
    let mut config = SearchConfig::from(algorithm);
    if let Some(depth) = args.depth {
        config.depth = depth;
        config.cutoff_depth = depth;
    }
    if let Some(cutoff) = args.cutoff {
        config.cutoff_depth = cutoff;
    }
    if let Some(ms) = args.time_limit_ms {
        config = config.with_time_limit(Duration::from_millis(ms));
    }
    config
}

fn compare(args: &Args) -> Result<()> {
    let board: Board = Board::from_moves(&args.moves, Piece::Human)?;
    println!("{}\n", board);

    let configs = Algorithm::ALL
        .iter()
        .map(|&algorithm| search_config(args, algorithm))
        .collect::<Vec<_>>();
    for config in configs.iter() {
        config.validate()?;
    }

    let results = compare_strategies(&board, &configs, args.seed.unwrap_or(0))?;

    println!(
        "{:<12} {:>6} {:>16} {:>10} {:>10}",
        "Algorithm", "Column", "Score", "Nodes", "Time (ms)"
    );
    for (algorithm, result) in results {
        let column = result
            .column
            .map(|column| (column + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:>6} {:>16} {:>10} {:>10.3}",
            algorithm.to_string(),
            column,
            result.score,
            result.nodes_visited,
            result.elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn render(board: &Board, plain: bool) -> Result<()> {
    if plain {
        display::print(board);
        Ok(())
    } else {
        display::draw(board)
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    stdout().flush()?;
    let mut buffer = String::new();
    if stdin().read_line(&mut buffer)? == 0 {
        return Err(anyhow!("Input closed"));
    }
    Ok(buffer)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.compare {
        return compare(&args);
    }

    let config = search_config(&args, args.algorithm);
    config.validate()?;

    let searcher = match args.seed {
        Some(seed) => Searcher::with_seed(seed),
        None => Searcher::new(),
    };
    let mut game = Game::with_searcher(config, args.first.turn(), searcher);

    println!("Welcome to Connect 4\n");
    println!("You play red (X), the AI ({}) plays yellow (O).", config.algorithm);
    println!(
        "Commands: 1-{} drop a disc, r restart, n new game, a <algorithm> switch, q quit\n",
        WIDTH
    );

    // game loop
    loop {
        render(game.board(), args.plain)?;

        match game.state() {
            GameState::Playing => match game.turn() {
                // AI player
                Turn::Ai => {
                    let spinner = ProgressBar::new_spinner();
                    spinner.set_style(
                        ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}"),
                    );
                    spinner.set_message(&format!(
                        "AI ({}) is thinking...",
                        game.config().algorithm
                    ));
                    spinner.enable_steady_tick(100);

                    let (result, _) = game.play_ai()?;
                    spinner.finish_and_clear();

                    if let Some(message) = game.log().last() {
                        println!("{}", message);
                    }
                    if !result.completed {
                        println!("Time limit reached, the search was cut short.");
                    }
                    match result.column {
                        Some(column) => {
                            println!("AI plays column {} (score {})", column + 1, result.score)
                        }
                        None => println!("AI has no move to play"),
                    }
                }

                // human player
                Turn::Human => {
                    let input = read_line("Move input > ")?;
                    match parse_command(&input, game.board().columns()) {
                        Ok(Command::Play(column)) => {
                            if let Err(err) = game.play_human(column) {
                                println!("{}", err);
                            }
                        }
                        Ok(Command::Restart) => game.restart(),
                        Ok(Command::NewGame) => game.new_game(args.first.turn()),
                        Ok(Command::Switch(algorithm)) => {
                            game.set_config(search_config(&args, algorithm));
                            println!("AI switched to {}", algorithm);
                        }
                        Ok(Command::Quit) => break,
                        Err(err) => println!("{}", err),
                    }
                }
            },

            // end states
            state => {
                match state {
                    GameState::HumanWin => println!("You win!"),
                    GameState::AiWin => println!("AI wins!"),
                    _ => println!("It's a draw!"),
                }

                loop {
                    let answer = read_line("Play again? y/n: ")?;
                    match answer.to_lowercase().chars().next() {
                        Some('y') => {
                            game.new_game(args.first.turn());
                            break;
                        }
                        Some('n') => return Ok(()),
                        _ => println!("Unknown answer given"),
                    }
                }
            }
        }
    }
    Ok(())
}
