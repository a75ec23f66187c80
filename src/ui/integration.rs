// Integration layer between the terminal UI and the puzzle session

use crate::animation::{Frame, MoveDriver, Request};
use crate::board::Position;
use crate::config::PuzzleConfig;
use crate::error::PuzzleError;
use crate::session::MoveOutcome;
use crate::submission::{ResultSink, Submission, submit};
use crate::ui::{
    AsciiArt, Command, ConfirmDialog, GameInterface, InputValidator, Notification, NotificationKind,
    create_main_menu,
};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::io::{self, BufRead};
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ============================================================================
// GAME CONTROLLER
// ============================================================================

pub struct GameController {
    driver: MoveDriver,
    interface: GameInterface,
    config: PuzzleConfig,
    sink: Box<dyn ResultSink>,
    clock: Instant,
    rng: StdRng,
    /// Redraw the board between commands.
    interactive: bool,
}

impl GameController {
    pub fn new(config: PuzzleConfig) -> Self {
        let sink = config.result_sink();
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: PuzzleConfig, sink: Box<dyn ResultSink>) -> Self {
        Self {
            driver: config.new_driver(),
            interface: GameInterface::new(config.use_unicode),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            sink,
            clock: Instant::now(),
            interactive: true,
        }
    }

    pub fn driver(&self) -> &MoveDriver {
        &self.driver
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        self.run_with(&mut stdin.lock())
    }

    /// Main menu loop reading from `input`. Returns on exit or end of input.
    pub fn run_with(&mut self, input: &mut impl BufRead) -> io::Result<()> {
        AsciiArt::show_welcome_banner();

        loop {
            let menu = create_main_menu();
            menu.display()?;

            match menu.get_selection(input)? {
                Some(action) => match action.as_str() {
                    "new_game" => {
                        self.driver.reset().ok();
                        self.play(input)?;
                    }
                    "demo" => {
                        self.driver.reset().ok();
                        self.run_demo(10);
                    }
                    "tutorial" => self.interface.show_tutorial(),
                    "legend" => self.interface.show_legend(),
                    "exit" => {
                        if ConfirmDialog::confirm("Are you sure you want to exit?", input)? {
                            return Ok(());
                        }
                    }
                    _ => {}
                },
                None => self.interface.show_error("Invalid choice"),
            }
        }
    }

    /// Command loop for one game. Returns on `quit` or end of input.
    pub fn play(&mut self, input: &mut impl BufRead) -> io::Result<()> {
        let hello = Notification::new(
            "Trail started from b1. Good luck!".to_string(),
            NotificationKind::Success,
        );
        if self.interactive {
            hello.show_timed(800);
        } else {
            hello.show();
        }

        loop {
            if self.interactive {
                self.redraw();
            }
            if self.driver.session().can_submit() {
                AsciiArt::show_finished(self.driver.session().score());
                self.interface
                    .show_info("Type 'submit [name]' to send your result, or 'undo' to keep playing");
            }

            let Some(line) = self.interface.prompt_input("trail", input)? else {
                return Ok(());
            };
            if line.is_empty() {
                continue;
            }

            match InputValidator::parse_command(&line) {
                Ok(cmd) => {
                    if !self.handle_command(cmd) {
                        return Ok(());
                    }
                }
                Err(e) => self.interface.show_error(&e),
            }
        }
    }

    /// Execute one command. Returns `false` when the player quits.
    pub fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Move(to) => self.play_moves(&[to]),
            Command::Trail(moves) => self.play_moves(&moves),
            Command::Moves => self.show_moves(),
            Command::Undo => match self.driver.undo() {
                Ok(true) => self.interface.show_info("Move taken back"),
                Ok(false) => self.interface.show_warning("Nothing to undo"),
                Err(e) => self.interface.show_error(&e.to_string()),
            },
            Command::Reset => match self.driver.reset() {
                Ok(()) => {
                    self.interface.history.clear();
                    self.interface.show_info("Back to b1");
                }
                Err(e) => self.interface.show_error(&e.to_string()),
            },
            Command::Submit(name) => self.handle_submit(name.as_deref().unwrap_or("")),
            Command::Status => {
                let session = self.driver.session();
                self.interface.show_status(&session.status(), session.score());
            }
            Command::Legend => self.interface.show_legend(),
            Command::History => println!("{}", self.driver.session().history().text()),
            Command::Demo(n) => self.run_demo(n),
            Command::Help => self.interface.show_help(),
            Command::Quit => return false,
        }
        true
    }

    fn redraw(&mut self) {
        let session = self.driver.session();
        self.interface
            .history
            .update(session.history().text(), session.history().len());
        self.interface
            .show_game_screen(&session.render_view(), &session.status(), session.score());
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Hand one request to the driver. `false` when it was refused.
    fn request(&mut self, to: Position) -> bool {
        match self.driver.request_move(to, self.now()) {
            Ok(Request::Started) => true,
            Ok(Request::Queued) => {
                self.interface.show_info(&format!("{} queued", to));
                true
            }
            // Illegal targets are ignored without touching the session.
            Err(PuzzleError::IllegalMove { .. }) => {
                debug!("ignored illegal move to {}", to);
                self.interface
                    .show_warning(&format!("{} is not reachable from here", to));
                false
            }
            Err(PuzzleError::Busy) => {
                self.interface
                    .show_warning(&format!("Still moving, {} dropped", to));
                false
            }
            Err(e) => {
                self.interface.show_error(&e.to_string());
                false
            }
        }
    }

    /// Start the first move, then offer each following one to the driver
    /// while the piece is still in flight. The busy policy decides whether
    /// those are queued or refused.
    fn play_moves(&mut self, moves: &[Position]) {
        let mut upcoming = moves.iter().copied();
        let Some(first) = upcoming.next() else {
            return;
        };
        if !self.request(first) {
            return;
        }

        let mut next = upcoming.next();
        while self.driver.is_animating() {
            if let Some(to) = next {
                if self.driver.queued().is_none() {
                    next = if self.request(to) { upcoming.next() } else { None };
                }
            }

            let tick = self.driver.tick(self.now());
            if let Some(Frame::Moving { row, col, .. }) = tick.frame {
                if self.interactive {
                    let view = self.driver.session().render_view();
                    self.interface.display.print_in_flight(&view, row, col);
                }
            }
            if let Some(outcome) = tick.committed {
                self.report(&outcome);
            }
            if self.driver.is_animating() {
                std::thread::sleep(FRAME_INTERVAL);
            }
        }

        if let Some(to) = next {
            self.interface
                .show_warning(&format!("Trail stopped, {} and later moves skipped", to));
        }
    }

    fn report(&self, outcome: &MoveOutcome) {
        let breakdown = &outcome.score;
        let mut notes = Vec::new();
        if let Some(points) = breakdown.special_points {
            match breakdown.multiplier_used {
                Some(m) => notes.push(format!("+{} (x{})", points, m)),
                None => notes.push(format!("+{}", points)),
            }
        }
        if let Some(factor) = breakdown.bonus_factor {
            notes.push(format!("x{}", factor));
        }
        if let Some(shield) = breakdown.shield_granted {
            notes.push(format!("shield {}", shield));
        }
        if let Some(m) = breakdown.multiplier_armed {
            notes.push(format!("next x{}", m));
        }
        if notes.is_empty() {
            self.interface.show_info(&outcome.to_string());
        } else {
            self.interface
                .show_success(&format!("{} [{}]", outcome, notes.join(", ")));
        }
    }

    fn show_moves(&self) {
        let moves: Vec<String> = self
            .driver
            .session()
            .legal_moves()
            .iter()
            .map(|p| p.to_string())
            .collect();
        if moves.is_empty() {
            self.interface.show_warning("No moves from here");
        } else {
            self.interface.show_info(&format!("Legal moves: {}", moves.join(" ")));
        }
    }

    fn handle_submit(&mut self, name: &str) {
        match Submission::from_session(self.driver.session(), name, &self.config.default_name) {
            Ok(submission) => {
                submit(self.sink.as_mut(), &submission);
                self.interface.show_success(&format!(
                    "Result sent: {} points for {}",
                    submission.score, submission.display_name
                ));
            }
            Err(PuzzleError::NotTerminal) => self
                .interface
                .show_warning("Reach an exit square (a8, c8, e8, g8) before submitting"),
            Err(e) => self.interface.show_error(&e.to_string()),
        }
    }

    /// Let the piece wander for up to `moves` random legal moves, stopping on
    /// an exit square.
    pub fn run_demo(&mut self, moves: usize) {
        for _ in 0..moves {
            let session = self.driver.session();
            if session.can_submit() {
                break;
            }
            let Some(&to) = session.legal_moves().choose(&mut self.rng) else {
                break;
            };
            self.play_moves(&[to]);
        }
        if self.interactive {
            self.redraw();
        }
        let session = self.driver.session();
        self.interface.show_info(&format!(
            "Demo: {} after {}",
            session.score(),
            session.history().sequence()
        ));
    }

    /// Skip board redraws, for scripted runs.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::BusyPolicy;
    use crate::error::Result;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<Submission>>>);

    impl ResultSink for RecordingSink {
        fn send(&mut self, submission: &Submission) -> Result<()> {
            self.0.borrow_mut().push(submission.clone());
            Ok(())
        }
    }

    fn controller() -> (GameController, RecordingSink) {
        controller_with(BusyPolicy::Reject)
    }

    fn controller_with(busy: BusyPolicy) -> (GameController, RecordingSink) {
        let config = PuzzleConfig {
            move_duration: Duration::ZERO,
            busy,
            ..PuzzleConfig::default()
        };
        let sink = RecordingSink::default();
        let mut c = GameController::with_sink(config, Box::new(sink.clone()));
        c.set_interactive(false);
        (c, sink)
    }

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn moves_commit_through_animation() {
        let (mut c, _) = controller();
        assert!(c.handle_command(Command::Move(sq("d2"))));
        assert_eq!(c.driver().session().position(), sq("d2"));
        assert_eq!(c.driver().session().score(), 100);
        assert!(!c.driver().is_animating());
    }

    #[test]
    fn illegal_move_leaves_session_untouched() {
        let (mut c, _) = controller();
        let before = c.driver().session().clone();
        c.handle_command(Command::Move(sq("b3")));
        assert_eq!(c.driver().session(), &before);
    }

    #[test]
    fn submit_requires_exit_square() {
        let (mut c, sink) = controller();
        c.handle_command(Command::Submit(None));
        assert!(sink.0.borrow().is_empty());

        for m in ["c3", "e4", "a8"] {
            c.handle_command(Command::Move(sq(m)));
        }
        c.handle_command(Command::Submit(None));
        let sent = sink.0.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].display_name, "Anonymous");
        assert_eq!(sent[0].move_sequence, "b1-c3-e4-a8");
    }

    #[test]
    fn undo_and_reset_commands() {
        let (mut c, _) = controller();
        c.handle_command(Command::Move(sq("c3")));
        c.handle_command(Command::Undo);
        assert_eq!(c.driver().session().position(), sq("b1"));
        c.handle_command(Command::Move(sq("a3")));
        c.handle_command(Command::Reset);
        assert!(c.driver().session().history().at_start());
        assert!(!c.handle_command(Command::Quit));
    }

    #[test]
    fn demo_is_reproducible_for_a_seed() {
        let (mut a, _) = controller();
        let (mut b, _) = controller();
        a.run_demo(12);
        b.run_demo(12);
        assert_eq!(a.driver().session(), b.driver().session());
        assert!(a.driver().session().history().len() > 1);
    }

    #[test]
    fn chained_moves_follow_the_busy_policy() {
        let trail = vec![sq("c3"), sq("e4"), sq("a8")];

        let (mut queued, _) = controller_with(BusyPolicy::QueueOne);
        queued.handle_command(Command::Trail(trail.clone()));
        assert_eq!(queued.driver().session().history().sequence(), "b1-c3-e4-a8");
        assert!(queued.driver().session().can_submit());

        let (mut rejected, _) = controller_with(BusyPolicy::Reject);
        rejected.handle_command(Command::Trail(trail));
        assert_eq!(rejected.driver().session().history().sequence(), "b1-c3");
        assert!(!rejected.driver().is_animating());
    }

    #[test]
    fn menu_loop_ends_with_input() {
        let (mut c, _) = controller();
        c.run_with(&mut "".as_bytes()).unwrap();

        let (mut c, _) = controller();
        c.run_with(&mut "1\nc3\nq\n".as_bytes()).unwrap();
        assert_eq!(c.driver().session().position(), sq("c3"));

        // End of input inside a game also leaves the menu loop.
        let (mut c, _) = controller();
        c.run_with(&mut "1\nd2\n".as_bytes()).unwrap();
        assert_eq!(c.driver().session().score(), 100);
    }
}
