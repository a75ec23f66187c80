// Terminal front end for the trail puzzle.
// Features: colored board, legal-move markers, collected squares dimmed,
// status line, move history, notifications and a command prompt.

pub mod integration;
use crate::board::{BOARD_SIZE, PieceVariant, Position};
use crate::session::{RenderView, StatusView};
use crate::squares::{SquareRule, rule_of};
pub use integration::GameController;
use std::io::{self, BufRead, Write};

// ============================================================================
// COLOR CODES & STYLING
// ============================================================================

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const WHITE: &str = "\x1b[37m";
    pub const BRIGHT_BLACK: &str = "\x1b[90m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
    pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";

    pub const BG_LIGHT: &str = "\x1b[48;5;252m"; // Light square
    pub const BG_DARK: &str = "\x1b[48;5;240m"; // Dark square
    pub const BG_VISITED: &str = "\x1b[48;5;236m"; // Collected square
    pub const BG_TARGET: &str = "\x1b[48;5;117m"; // Legal destination
    pub const BG_PIECE: &str = "\x1b[48;5;226m"; // Piece square
}

// ============================================================================
// PIECE GLYPHS
// ============================================================================

pub mod symbols {
    use crate::board::PieceVariant;

    pub const KNIGHT: &str = "♘";
    pub const ROOK: &str = "♖";
    pub const BISHOP: &str = "♗";

    pub fn piece_symbol(variant: PieceVariant) -> &'static str {
        match variant {
            PieceVariant::Knight => KNIGHT,
            PieceVariant::Rook => ROOK,
            PieceVariant::Bishop => BISHOP,
        }
    }
}

// ============================================================================
// BOARD DISPLAY
// ============================================================================

pub struct BoardDisplay {
    pub use_unicode: bool,
    pub show_targets: bool,
}

impl Default for BoardDisplay {
    fn default() -> Self {
        Self {
            use_unicode: true,
            show_targets: true,
        }
    }
}

impl BoardDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, view: &RenderView, status: &StatusView, score: i64) {
        self.clear_screen();
        self.print_header();
        self.print_board(view);
        self.print_status(status, score);
    }

    fn clear_screen(&self) {
        print!("\x1b[2J\x1b[H");
    }

    fn print_header(&self) {
        use colors::*;
        println!();
        println!(
            "{}{}╔════════════════════════════════════════════╗{}",
            BOLD, BRIGHT_CYAN, RESET
        );
        println!(
            "{}{}║            ♘  KNIGHT TRAIL  ♘              ║{}",
            BOLD, BRIGHT_CYAN, RESET
        );
        println!(
            "{}{}╚════════════════════════════════════════════╝{}",
            BOLD, BRIGHT_CYAN, RESET
        );
        println!();
    }

    pub fn print_board(&self, view: &RenderView) {
        for line in self.board_lines(view) {
            println!("{}", line);
        }
        println!();
    }

    /// The board as printable lines, rank 8 first.
    pub fn board_lines(&self, view: &RenderView) -> Vec<String> {
        use colors::*;

        let mut lines = Vec::with_capacity(BOARD_SIZE as usize + 3);
        lines.push("    ╔════════════════════════════════════════╗".to_string());
        for row in 0..BOARD_SIZE {
            let mut line = format!("  {} ║", BOARD_SIZE - row);
            for col in 0..BOARD_SIZE {
                let pos = Position::at(row, col);
                let bg = self.square_color(view, pos);
                let cell = self.cell_text(view, pos);
                line.push_str(&format!("{}{}{}{}", bg, BOLD, cell, RESET));
            }
            line.push('║');
            lines.push(line);
        }
        lines.push("    ╚════════════════════════════════════════╝".to_string());
        lines.push("       a    b    c    d    e    f    g    h   ".to_string());
        lines
    }

    fn square_color(&self, view: &RenderView, pos: Position) -> &'static str {
        use colors::*;

        if pos == view.position {
            return BG_PIECE;
        }
        if self.show_targets && view.legal_moves.contains(&pos) {
            return BG_TARGET;
        }
        if view.visited.contains(&pos) {
            return BG_VISITED;
        }
        if pos.is_light() { BG_LIGHT } else { BG_DARK }
    }

    // Every cell is five columns wide.
    fn cell_text(&self, view: &RenderView, pos: Position) -> String {
        use colors::*;

        if pos == view.position {
            let glyph = if self.use_unicode {
                symbols::piece_symbol(view.variant).to_string()
            } else {
                view.variant.to_char().to_string()
            };
            return format!("{}  {}  ", BRIGHT_WHITE, glyph);
        }
        if view.visited.contains(&pos) {
            return format!("{}  ·  ", DIM);
        }
        let marker = square_marker(pos);
        let color = match rule_of(pos) {
            SquareRule::Terminal => BRIGHT_GREEN,
            SquareRule::Special(_) => BRIGHT_YELLOW,
            SquareRule::Bonus(_) => BRIGHT_MAGENTA,
            SquareRule::Multiplier(_) => BRIGHT_RED,
            SquareRule::Shield(_) => BRIGHT_BLUE,
            SquareRule::Transform(_) => BRIGHT_CYAN,
            SquareRule::Plain => BRIGHT_BLACK,
        };
        format!("{}{:^5}", color, marker)
    }

    pub fn print_status(&self, status: &StatusView, score: i64) {
        use colors::*;

        println!(
            "{}┌────────────────────────────────────────────────┐{}",
            BRIGHT_BLUE, RESET
        );
        println!(
            "│ {}Score:{} {:<8} │ {}{:<22}{} {}{:<4}{} {}{:<3}{}",
            BOLD,
            RESET,
            score,
            BOLD,
            status.piece_label(),
            RESET,
            BRIGHT_BLUE,
            status.shield_label(),
            RESET,
            BRIGHT_RED,
            status.multiplier_label(),
            RESET
        );
        println!(
            "{}└────────────────────────────────────────────────┘{}",
            BRIGHT_BLUE, RESET
        );
        println!();
    }

    /// Piece in flight between two squares, drawn on the nearest square.
    pub fn print_in_flight(&self, view: &RenderView, row: f64, col: f64) {
        let nearest = Position::new(row.round() as u8, col.round() as u8).unwrap_or(view.position);
        let flying = RenderView {
            position: nearest,
            legal_moves: Vec::new(),
            ..view.clone()
        };
        self.clear_screen();
        self.print_header();
        self.print_board(&flying);
    }
}

/// Short board marker for a square's rule.
pub fn square_marker(pos: Position) -> String {
    match rule_of(pos) {
        SquareRule::Terminal => "EXIT".to_string(),
        SquareRule::Special(points) => points.to_string(),
        SquareRule::Bonus(factor) => format!("x{}", factor),
        SquareRule::Multiplier(m) => format!("M{}", m),
        SquareRule::Shield(s) => format!("S{}", s),
        SquareRule::Transform(PieceVariant::Rook) => "→R".to_string(),
        SquareRule::Transform(_) => "→B".to_string(),
        SquareRule::Plain => String::new(),
    }
}

// ============================================================================
// INTERACTIVE MENU SYSTEM
// ============================================================================

pub struct Menu {
    title: String,
    options: Vec<MenuOption>,
}

pub struct MenuOption {
    pub label: String,
    pub description: String,
    pub action: String,
}

impl Menu {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            options: Vec::new(),
        }
    }

    pub fn add_option(&mut self, label: &str, description: &str, action: &str) {
        self.options.push(MenuOption {
            label: label.to_string(),
            description: description.to_string(),
            action: action.to_string(),
        });
    }

    pub fn display(&self) -> io::Result<()> {
        use colors::*;

        println!();
        println!(
            "{}{}╔════════════════════════════════════════════╗{}",
            BOLD, BRIGHT_CYAN, RESET
        );
        println!(
            "{}{}║  {}  ║{}",
            BOLD,
            BRIGHT_CYAN,
            center_text(&self.title, 40),
            RESET
        );
        println!(
            "{}{}╚════════════════════════════════════════════╝{}",
            BOLD, BRIGHT_CYAN, RESET
        );
        println!();

        for (i, option) in self.options.iter().enumerate() {
            println!(
                "   {}{}{}. {}{} - {}{}{}",
                BOLD,
                WHITE,
                i + 1,
                RESET,
                option.label,
                DIM,
                option.description,
                RESET
            );
        }

        println!();
        print!(
            "{}Select option (1-{}): {}",
            BRIGHT_CYAN,
            self.options.len(),
            RESET
        );
        io::stdout().flush()
    }

    /// Action of the chosen option, `None` for a bad choice. End of input
    /// selects "exit".
    pub fn get_selection(&self, input: &mut impl BufRead) -> io::Result<Option<String>> {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Some("exit".to_string()));
        }
        Ok(self.select(line.trim()))
    }

    fn select(&self, input: &str) -> Option<String> {
        let num = input.parse::<usize>().ok()?;
        if num == 0 {
            return None;
        }
        self.options.get(num - 1).map(|o| o.action.clone())
    }
}

fn center_text(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len >= width {
        return text.to_string();
    }

    let padding = (width - text_len) / 2;
    let mut result = " ".repeat(padding);
    result.push_str(text);
    result.push_str(&" ".repeat(width - text_len - padding));
    result
}

pub fn create_main_menu() -> Menu {
    let mut menu = Menu::new("MAIN MENU");

    menu.add_option("New Game", "Start a fresh trail from b1", "new_game");
    menu.add_option("Demo", "Watch a random trail", "demo");
    menu.add_option("How to Play", "Rules of the board", "tutorial");
    menu.add_option("Legend", "What every marked square does", "legend");
    menu.add_option("Exit", "Quit application", "exit");

    menu
}

// ============================================================================
// GAME INTERFACE
// ============================================================================

pub struct GameInterface {
    pub display: BoardDisplay,
    pub history: MoveHistoryDisplay,
}

impl GameInterface {
    pub fn new(use_unicode: bool) -> Self {
        Self {
            display: BoardDisplay {
                use_unicode,
                ..BoardDisplay::default()
            },
            history: MoveHistoryDisplay::new(),
        }
    }

    pub fn show_game_screen(&self, view: &RenderView, status: &StatusView, score: i64) {
        self.display.render(view, status, score);
        self.history.display();
        self.print_command_bar();
    }

    fn print_command_bar(&self) {
        use colors::*;

        let commands = [
            ("<square>", "Move, e.g. c3"),
            ("moves", "List legal moves"),
            ("undo / u", "Take back a move"),
            ("reset", "Start over"),
            ("submit [name]", "Send result"),
            ("help", "All commands"),
        ];

        for chunk in commands.chunks(2) {
            for &(cmd, desc) in chunk {
                print!("│ {}{:<14}{} {:<18}", BRIGHT_GREEN, cmd, RESET, desc);
            }
            println!("│");
        }
        println!();
    }

    pub fn show_help(&self) {
        use colors::*;

        println!();
        println!("{}{}═══ HELP & COMMANDS ═══{}", BOLD, BRIGHT_YELLOW, RESET);
        println!();

        let help_text = [
            ("<square> / move <square>", "Move the piece, e.g. c3 or move c3"),
            ("<square> <square> ...", "Chain moves, e.g. c3 e4 a8 (see --busy)"),
            ("moves / m", "List the legal destinations"),
            ("undo / u", "Take back the last move"),
            ("reset", "Back to b1 with score 0"),
            ("submit [name]", "Send your result from an exit square"),
            ("status / s", "Show piece, shields and multiplier"),
            ("legend / l", "Explain the square markers"),
            ("history", "Show the full trail"),
            ("demo [n]", "Let the piece wander for n moves"),
            ("quit / q", "Leave the game"),
        ];

        for (cmd, desc) in help_text {
            println!("  {}{:<26}{} {}", BRIGHT_GREEN, cmd, RESET, desc);
        }
        println!();
    }

    pub fn show_tutorial(&self) {
        use colors::*;

        println!();
        println!("{}{}═══ HOW TO PLAY ═══{}", BOLD, BRIGHT_YELLOW, RESET);
        println!();
        for line in TUTORIAL {
            println!("  {}", line);
        }
        println!();
    }

    pub fn show_legend(&self) {
        let mut table = Table::new(vec!["Marker".to_string(), "Meaning".to_string()]);
        for (marker, meaning) in LEGEND {
            table.add_row(vec![marker.to_string(), meaning.to_string()]);
        }
        table.render();
        println!();
    }

    pub fn show_status(&self, status: &StatusView, score: i64) {
        self.display.print_status(status, score);
    }

    /// `None` once input has ended.
    pub fn prompt_input(&self, prompt: &str, input: &mut impl BufRead) -> io::Result<Option<String>> {
        use colors::*;

        print!("{}{} > {}", BRIGHT_CYAN, prompt, RESET);
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn show_error(&self, message: &str) {
        Notification::new(message.to_string(), NotificationKind::Error).show();
    }

    pub fn show_success(&self, message: &str) {
        Notification::new(message.to_string(), NotificationKind::Success).show();
    }

    pub fn show_info(&self, message: &str) {
        Notification::new(message.to_string(), NotificationKind::Info).show();
    }

    pub fn show_warning(&self, message: &str) {
        Notification::new(message.to_string(), NotificationKind::Warning).show();
    }
}

const TUTORIAL: [&str; 9] = [
    "Your knight starts on b1. Reach one of the EXIT squares (a8, c8, e8, g8).",
    "Every move costs 10% of your score, except on the penalty-free squares",
    "b1 b5 c2 c4 c6 e2 f5 g2 h3 and the exits.",
    "Numbered squares add their points the first time you land on them.",
    "xN squares multiply your whole score, once.",
    "MN squares double or triple the points of the next move's numbered square.",
    "SN squares raise a shield: the next N moves cost nothing.",
    "→B and →R squares turn the knight into a bishop or rook for one move.",
    "Undo as often as you like. Submit your score from an exit square.",
];

const LEGEND: [(&str, &str); 7] = [
    ("EXIT", "Exit square: game over, result can be submitted"),
    ("100..600", "Points, awarded once"),
    ("x1.2..x1.7", "Score multiplier, applied once"),
    ("M2 / M3", "Next move's points are doubled / tripled"),
    ("S2 / S3", "Shield: no decay for the next 2 / 3 moves"),
    ("→B / →R", "Bishop / rook for the next move"),
    ("·", "Already collected"),
];

// ============================================================================
// TABLE RENDERER
// ============================================================================

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths
    }

    fn border(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
        let inner: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, inner.join(mid), right)
    }

    fn row_line(widths: &[usize], cells: &[String]) -> String {
        let mut line = String::from("│");
        for (i, &width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = width - cell.chars().count().min(width);
            line.push_str(&format!(" {}{} │", cell, " ".repeat(pad)));
        }
        line
    }

    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        let mut lines = vec![
            Self::border(&widths, "┌", "┬", "┐"),
            Self::row_line(&widths, &self.headers),
            Self::border(&widths, "├", "┼", "┤"),
        ];
        for row in &self.rows {
            lines.push(Self::row_line(&widths, row));
        }
        lines.push(Self::border(&widths, "└", "┴", "┘"));
        lines
    }

    pub fn render(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

// ============================================================================
// NOTIFICATION SYSTEM
// ============================================================================

pub struct Notification {
    message: String,
    kind: NotificationKind,
}

#[derive(Debug, Clone, Copy)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn new(message: String, kind: NotificationKind) -> Self {
        Self { message, kind }
    }

    pub fn show(&self) {
        use colors::*;

        let (icon, color) = match self.kind {
            NotificationKind::Info => ("ℹ️", BRIGHT_BLUE),
            NotificationKind::Success => ("✅", BRIGHT_GREEN),
            NotificationKind::Warning => ("⚠️", BRIGHT_YELLOW),
            NotificationKind::Error => ("❌", BRIGHT_RED),
        };

        println!("{}{} {}{}", color, icon, self.message, RESET);
    }

    pub fn show_timed(&self, duration_ms: u64) {
        self.show();
        std::thread::sleep(std::time::Duration::from_millis(duration_ms));
    }
}

// ============================================================================
// INPUT VALIDATOR
// ============================================================================

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Position),
    /// Several squares in one line, played back to back.
    Trail(Vec<Position>),
    Moves,
    Undo,
    Reset,
    Submit(Option<String>),
    Status,
    Legend,
    History,
    Demo(usize),
    Help,
    Quit,
}

pub struct InputValidator;

impl InputValidator {
    pub fn parse_command(input: &str) -> Result<Command, String> {
        let input = input.trim();
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("Empty input".to_string());
        };

        let command = match head.to_lowercase().as_str() {
            "move" => {
                let target = parts.next().ok_or("Usage: move c3")?;
                Command::Move(Self::parse_square(target)?)
            }
            "moves" | "m" => Command::Moves,
            "undo" | "u" => Command::Undo,
            "reset" | "new" => Command::Reset,
            "submit" | "send" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                return Ok(Command::Submit(if name.is_empty() { None } else { Some(name) }));
            }
            "status" | "s" => Command::Status,
            "legend" | "l" => Command::Legend,
            "history" | "h" => Command::History,
            "demo" => {
                let n = match parts.next() {
                    Some(n) => n.parse::<usize>().map_err(|_| format!("Bad move count: {}", n))?,
                    None => 10,
                };
                Command::Demo(n)
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => {
                let first = Self::parse_square(head)?;
                let rest = parts
                    .by_ref()
                    .map(Self::parse_square)
                    .collect::<Result<Vec<_>, _>>()?;
                if rest.is_empty() {
                    Command::Move(first)
                } else {
                    let mut trail = vec![first];
                    trail.extend(rest);
                    Command::Trail(trail)
                }
            }
        };

        match parts.next() {
            Some(extra) => Err(format!("Unexpected input: {}", extra)),
            None => Ok(command),
        }
    }

    pub fn parse_square(sq: &str) -> Result<Position, String> {
        if !Self::is_valid_square(sq) {
            return Err(format!("Invalid square: {}", sq));
        }
        sq.parse::<Position>().map_err(|e| e.to_string())
    }

    fn is_valid_square(sq: &str) -> bool {
        let sq = sq.to_lowercase();
        if sq.len() != 2 {
            return false;
        }

        let bytes = sq.as_bytes();
        let file = bytes[0] as char;
        let rank = bytes[1] as char;

        ('a'..='h').contains(&file) && ('1'..='8').contains(&rank)
    }
}

// ============================================================================
// MOVE HISTORY DISPLAY
// ============================================================================

pub struct MoveHistoryDisplay {
    text: String,
    moves: usize,
}

impl MoveHistoryDisplay {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            moves: 0,
        }
    }

    /// Refresh from the session's history text and move count.
    pub fn update(&mut self, text: String, moves: usize) {
        self.text = text;
        self.moves = moves;
    }

    pub fn display(&self) {
        use colors::*;

        if self.text.is_empty() {
            println!("{}No moves yet{}", DIM, RESET);
            return;
        }

        println!(
            "{}{}═══ Trail ({} moves) ═══{}",
            BOLD,
            BRIGHT_MAGENTA,
            self.moves.saturating_sub(1),
            RESET
        );
        println!("{}", self.text);
        println!();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.moves = 0;
    }
}

// ============================================================================
// CONFIRMATION DIALOG
// ============================================================================

pub struct ConfirmDialog;

impl ConfirmDialog {
    /// End of input counts as yes; nobody is left to answer.
    pub fn confirm(message: &str, input: &mut impl BufRead) -> io::Result<bool> {
        use colors::*;

        print!(
            "{}{} {} (y/n): {}",
            BRIGHT_YELLOW, message, RESET, BRIGHT_CYAN
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(true);
        }

        Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

// ============================================================================
// ASCII ART & BANNERS
// ============================================================================

pub struct AsciiArt;

impl AsciiArt {
    pub fn show_welcome_banner() {
        use colors::*;

        println!("{}{}", BOLD, BRIGHT_CYAN);
        println!(
            r"
    ╔══════════════════════════════════════════════╗
    ║                                              ║
    ║      ♘   K N I G H T    T R A I L   ♘        ║
    ║                                              ║
    ║   collect points, dodge the decay, escape    ║
    ║                                              ║
    ╚══════════════════════════════════════════════╝
        "
        );
        println!("{}", RESET);
    }

    pub fn show_finished(score: i64) {
        use colors::*;
        println!(
            "{}{}╔════════════════════════════════╗\n║  {}  ║\n╚════════════════════════════════╝{}",
            BOLD,
            BRIGHT_GREEN,
            center_text(&format!("EXIT REACHED: {} points", score), 28),
            RESET
        );
    }
}

// ============================================================================
// MODULE TESTS
// ============================================================================
