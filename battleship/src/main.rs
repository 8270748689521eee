use std::{
    env,
    io::{self, BufRead, Write},
};

use clap::{value_t, App, Arg, ArgMatches, Error as ClapError, ErrorKind};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use tracing_subscriber::filter::LevelFilter;

use battleboard::{
    random, Board, BoardConfig, BoardState, Coordinate, Dimensions, EffectError, EffectSink,
    HitOutcome, InvalidConfig, ShipSpec, ShipStatus, Trigger,
};

/// Environment variable holding the maximum log level.
const LOG_ENV: &str = "BATTLESHIP_LOG";

/// Lowest MIDI pitch handed out to tiles. Tile `i` gets pitch `PITCH_BASE + i`.
const PITCH_BASE: usize = 36;

/// First MIDI pitch past the range the controller listens on.
const PITCH_LIMIT: usize = 58;

fn main() -> io::Result<()> {
    init_logging();

    let matches = App::new("Battleship")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Interactive battleship board setup.")
        .arg(
            Arg::with_name("size")
                .short("n")
                .long("size")
                .value_name("SIZE")
                .help("width and height of the board")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name("ships")
                .short("s")
                .long("ships")
                .value_name("SHIPS")
                .help("fleet as comma separated SIZExQUANTITY pairs, e.g. 4x1,3x1,2x1,1x2")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for random placement")
                .takes_value(true),
        )
        .get_matches();

    let config = parse_config(&matches);
    if let Err(err) = config.validate() {
        ClapError::with_description(&format!("invalid board: {}", err), ErrorKind::InvalidValue)
            .exit();
    }
    let mut rng = match matches.value_of("seed") {
        Some(_) => StdRng::seed_from_u64(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit())),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut board = new_board(&config)?;

    println!("Place ships. Type help or ? for commands.");
    loop {
        println!();
        show_board(&board);
        println!();

        let cmd = input.read_input_lower(">", |line| parse_command(line, board.dimensions()))?;
        match cmd {
            Command::Add(idx) => {
                if let Err(err) = board.add(idx) {
                    println!("Cannot add deck at {}: {}.", idx, err);
                }
            }
            Command::Remove(idx) => {
                if let Err(err) = board.remove(idx) {
                    println!("Cannot remove deck at {}: {}.", idx, err);
                }
            }
            Command::Fire(idx) => fire(&mut board, idx),
            Command::Randomize => {
                if let Err(err) = random::fill(&mut board, &mut rng) {
                    println!("Cannot randomize: {}.", err);
                }
            }
            Command::Clear => {
                board.silence();
                board = new_board(&config)?;
            }
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }
    board.silence();
    Ok(())
}

/// Install the stderr log subscriber, with the level taken from [`LOG_ENV`].
fn init_logging() {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

/// Build the [`BoardConfig`] from the command line, exiting with a usage error if it
/// cannot be parsed.
fn parse_config(matches: &ArgMatches) -> BoardConfig {
    /// Matcher for one fleet entry.
    static SHIP: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(?P<size>[0-9]+)\s*[xX]\s*(?P<quantity>[0-9]+)\s*$").unwrap());

    let size = value_t!(matches, "size", usize).unwrap_or_else(|e| e.exit());
    let ships = match matches.value_of("ships") {
        None => return BoardConfig::new(size, BoardConfig::default().ships),
        Some(ships) => ships,
    };
    let mut fleet = Vec::new();
    for entry in ships.split(',') {
        let spec = SHIP.captures(entry).and_then(|captures| {
            let size = captures.name("size")?.as_str().parse().ok()?;
            let quantity = captures.name("quantity")?.as_str().parse().ok()?;
            Some(ShipSpec::new(size, quantity))
        });
        match spec {
            Some(spec) => fleet.push(spec),
            None => ClapError::with_description(
                &format!("invalid ship entry \"{}\", expected SIZExQUANTITY", entry.trim()),
                ErrorKind::InvalidValue,
            )
            .exit(),
        }
    }
    BoardConfig::new(size, fleet)
}

/// Create a board that reports its effects to a [`LogSink`]. Tiles past the pitch range
/// get no trigger.
fn new_board(config: &BoardConfig) -> io::Result<Board> {
    let mut board = Board::with_effects(config, LogSink)
        .map_err(|err: InvalidConfig| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    for idx in PITCH_LIMIT.saturating_sub(PITCH_BASE)..board.dimensions().total_size() {
        if let Err(err) = board.bind_trigger(idx, None) {
            tracing::warn!(idx, %err, "could not unbind trigger");
        }
    }
    Ok(board)
}

/// Commands accepted at the prompt.
enum Command {
    Add(usize),
    Remove(usize),
    Fire(usize),
    Randomize,
    Clear,
    Help,
    Quit,
}

/// Parse one line of input, printing a message and returning `None` if it is not valid.
fn parse_command(line: &str, dim: &Dimensions) -> Option<Command> {
    /// Matcher for commands that take a cell.
    static CELL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?P<cmd>add|place|put|remove|rm|fire|shoot)\s+
            (?:(?P<row>[0-9]+)\s*,\s*(?P<col>[0-9]+)|(?P<idx>[0-9]+))$",
        )
        .unwrap()
    });

    match line {
        "?" | "help" | "h" => return Some(Command::Help),
        "randomize" | "rand" | "random" => return Some(Command::Randomize),
        "clear" => return Some(Command::Clear),
        "quit" | "exit" | "q" => return Some(Command::Quit),
        _ => {}
    }
    let captures = match CELL.captures(line) {
        Some(captures) => captures,
        None => {
            println!("Invalid command \"{}\". Use '?' for help", line);
            return None;
        }
    };
    let number = |name: &str| captures.name(name).and_then(|m| m.as_str().parse::<usize>().ok());
    let idx = match (number("idx"), number("row"), number("col")) {
        (Some(idx), _, _) => idx,
        (None, Some(row), Some(col)) => match dim.try_linearize(&Coordinate::new(row, col)) {
            Some(idx) => idx,
            None => {
                let max = dim.size() - 1;
                println!("row and column must be in range [0,{}], got {},{}", max, row, col);
                return None;
            }
        },
        _ => {
            println!("Invalid cell in \"{}\"", line);
            return None;
        }
    };
    match captures.name("cmd").map(|m| m.as_str()) {
        Some("add") | Some("place") | Some("put") => Some(Command::Add(idx)),
        Some("remove") | Some("rm") => Some(Command::Remove(idx)),
        _ => Some(Command::Fire(idx)),
    }
}

/// Shoot at `idx` and report what happened.
fn fire(board: &mut Board, idx: usize) {
    match board.fire(idx) {
        Ok(HitOutcome::Miss) => println!("Miss."),
        Ok(HitOutcome::Hit) => {
            if board.ship_status(idx) == Some(ShipStatus::Sunk) {
                println!("Hit, ship sunk!");
            } else {
                println!("Hit!");
            }
            if board.defeated() {
                println!("Every ship has been sunk. Type clear to start over.");
                board.silence();
            }
        }
        Ok(HitOutcome::AlreadyResolved) => println!("Already shot at {}.", idx),
        Err(err) => println!("Invalid shot: {}.", err),
    }
}

/// Print the board together with its state and the ships still missing from the fleet.
fn show_board(board: &Board) {
    println!("{}", board);
    match board.state() {
        BoardState::Complete => println!("All ships placed."),
        state => {
            let tracker = board.tracker();
            let mut missing: Vec<String> = tracker
                .iter()
                .map(|(size, _)| (size, tracker.missing(size)))
                .filter(|&(_, missing)| missing > 0)
                .map(|(size, missing)| format!("{}x{}", size, missing))
                .collect();
            // Largest first, as in --ships.
            missing.reverse();
            println!("Board is {}. Missing ships: {}", state, missing.join(", "));
        }
    }
    if board.locked() {
        println!("A ship has been hit, placement is locked.");
    }
}

fn print_help() {
    println!(
        "Available Commands:
    add <cell>        place a deck on the cell.
    remove <cell>     take the deck off the cell.
    fire <cell>       shoot at the cell. Placement is locked after the first hit.
    randomize         place the missing ships at random.
    clear             start over with an empty board.
    quit              leave.

Cells are given either as an index counting from 0 at the top left, row by row,
or as <row>,<col>. Decks that touch form one ship, which must be a straight line.
Symbols: ~ sea, # deck, o miss, x hit."
    );
}

/// Effect sink that logs the note messages a MIDI light and sound controller would get.
struct LogSink;

impl LogSink {
    fn pitch(trigger: Trigger) -> Result<usize, EffectError> {
        let pitch = PITCH_BASE + trigger.raw();
        if pitch < PITCH_LIMIT {
            Ok(pitch)
        } else {
            Err(EffectError::new(format!("no pitch for {}", trigger)))
        }
    }
}

impl EffectSink for LogSink {
    fn deck_start(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        let pitch = Self::pitch(trigger)?;
        tracing::info!(pitch, "loop start");
        Ok(())
    }

    fn deck_stop(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        let pitch = Self::pitch(trigger)?;
        tracing::info!(pitch, "loop stop");
        Ok(())
    }

    fn hit_intensify(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        let pitch = Self::pitch(trigger)?;
        tracing::info!(pitch, "crush");
        Ok(())
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
