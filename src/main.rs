use clap::Parser;
use knight_trail::animation::BusyPolicy;
use knight_trail::scoring::ArithmeticPolicy;
use knight_trail::ui::GameController;
use knight_trail::{PuzzleConfig, UndoStrategy};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
/// Guide a knight from b1 to an exit square, collecting points on the way.
struct Args {
    /// How undo restores state: replay or snapshot.
    #[clap(long, default_value = "replay")]
    undo: UndoStrategy,

    /// Score arithmetic: exact or integer.
    #[clap(long, default_value = "exact")]
    arithmetic: ArithmeticPolicy,

    /// What the later squares of a chained move line (`c3 e4 a8`) do while
    /// the piece is still moving: reject drops them, queue plays them in turn.
    #[clap(long, default_value = "reject")]
    busy: BusyPolicy,

    /// Length of one move animation.
    #[clap(long, default_value_t = 300)]
    animation_ms: u64,

    /// Append submitted results to this JSON-lines file instead of only
    /// logging them.
    #[clap(long)]
    outbox: Option<PathBuf>,

    /// Name used when a submission gives none.
    #[clap(long, default_value = "Anonymous")]
    name: String,

    /// Seed for demo autoplay.
    #[clap(long, default_value_t = 2024)]
    seed: u64,

    /// Play this many random moves and exit.
    #[clap(long)]
    demo: Option<usize>,

    /// Log at debug level.
    #[clap(short, long)]
    verbose: bool,

    /// Draw pieces as letters instead of chess glyphs.
    #[clap(long)]
    ascii: bool,
}

impl Args {
    fn config(&self) -> PuzzleConfig {
        PuzzleConfig {
            arithmetic: self.arithmetic,
            undo: self.undo,
            busy: self.busy,
            move_duration: Duration::from_millis(self.animation_ms),
            outbox: self.outbox.clone(),
            default_name: self.name.clone(),
            seed: self.seed,
            use_unicode: !self.ascii,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut controller = GameController::new(args.config());

    if let Some(moves) = args.demo {
        controller.run_demo(moves);
        return ExitCode::SUCCESS;
    }

    match controller.run() {
        Ok(()) => {
            println!("\n👋 Thank you for playing! Goodbye!\n");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
