//! Terminal presentation
//!
//! Renders DISPLAY snapshots, committed blocks and wallet summaries as
//! framed text boxes. The interpreter never prints; callers hand its events
//! to a `Presenter`. Box borders are coloured per panel when colour is on;
//! the text inside a box is always plain.

use crate::core::{Block, Status};
use crate::interpreter::{Diagnostic, DisplaySnapshot, Event};
use crate::wallet::Wallet;
use crossterm::style::{Color, Stylize};
use std::io::{self, IsTerminal, Write};

const CONTRACT_COLOR: Color = Color::Blue;
const SENSOR_COLOR: Color = Color::Cyan;
const HASH_COLOR: Color = Color::Magenta;
const WALLET_COLOR: Color = Color::Yellow;

pub trait Presenter {
    fn display(&mut self, snapshot: &DisplaySnapshot) -> io::Result<()>;

    fn committed(&mut self, block: &Block) -> io::Result<()>;

    fn wallet(&mut self, wallet: &Wallet) -> io::Result<()>;

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()>;

    /// Render a run's events in the order they happened
    fn events(&mut self, events: &[Event]) -> io::Result<()> {
        for event in events {
            match event {
                Event::Committed(block) => self.committed(block)?,
                Event::Displayed(snapshot) => self.display(snapshot)?,
                Event::Diagnostic(diagnostic) => self.diagnostic(diagnostic)?,
            }
        }
        Ok(())
    }
}

/// Writes boxes to any `Write`, stdout by default
pub struct TerminalPresenter<W: Write> {
    out: W,
    color: bool,
}

impl TerminalPresenter<io::Stdout> {
    /// Colour is on only when stdout is a terminal
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        TerminalPresenter { out, color }
    }
}

impl<W: Write> TerminalPresenter<W> {
    /// Plain output, no escape codes
    pub fn new(out: W) -> Self {
        TerminalPresenter { out, color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_box<S: AsRef<str>>(
        &mut self,
        title: &str,
        lines: &[S],
        color: Color,
    ) -> io::Result<()> {
        let rendered = render_box(title, lines);
        if self.color {
            write!(self.out, "{}", paint_borders(&rendered, color))
        } else {
            write!(self.out, "{rendered}")
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn display(&mut self, snapshot: &DisplaySnapshot) -> io::Result<()> {
        let contract = [
            format!("Contract: {}", snapshot.contract),
            format!("Contractor: {}", snapshot.contractor),
            format!("Work: {}, Qty: {}", snapshot.work, snapshot.qty),
        ];
        let sensor = [
            format!("Moisture: {}", snapshot.sensor.moisture),
            format!("Ultrasonic: {}", snapshot.sensor.ultrasonic),
            format!("Temperature: {}", snapshot.sensor.temperature),
        ];
        let hashes: Vec<String> = if snapshot.hashes.is_empty() {
            vec!["(none)".to_string()]
        } else {
            snapshot
                .hashes
                .iter()
                .map(|(name, digest)| format!("{name}: {digest}"))
                .collect()
        };
        let mut tx = vec![
            format!("Transaction ID: {}", snapshot.tx.id),
            format!("Gas Value: \u{20b9}{}", snapshot.tx.gas),
            format!("Status: {} {}", status_icon(snapshot.tx.status), snapshot.tx.status),
        ];
        if let Some(verdict) = snapshot.validation {
            tx.push(format!("Validation: {verdict}"));
        }

        self.write_box("Contract Info", &contract, CONTRACT_COLOR)?;
        self.write_box("Sensor Data", &sensor, SENSOR_COLOR)?;
        self.write_box("Hash Details", &hashes, HASH_COLOR)?;
        self.write_box("Blockchain / TX", &tx, status_color(snapshot.tx.status))
    }

    fn committed(&mut self, block: &Block) -> io::Result<()> {
        let status = block.get_status();
        let icon = if self.color {
            status_icon(status).with(status_color(status)).to_string()
        } else {
            status_icon(status).to_string()
        };
        writeln!(
            self.out,
            "{icon} block #{} committed: {} ({status})",
            block.get_index(),
            block.get_transaction_id(),
        )
    }

    fn wallet(&mut self, wallet: &Wallet) -> io::Result<()> {
        let lines = [
            format!("Balance: \u{20b9}{}", wallet.balance),
            format!("Gas Spent: \u{20b9}{}", wallet.gas_spent),
            format!("Transactions: {}", wallet.transaction_count),
        ];
        self.write_box("Wallet", &lines, WALLET_COLOR)
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        match diagnostic {
            Diagnostic::UnknownCommand { line, keyword } => {
                writeln!(self.out, "! line {line}: unknown command {keyword} (skipped)")
            }
            Diagnostic::MissingArgument {
                line,
                keyword,
                argument,
            } => writeln!(
                self.out,
                "! line {line}: {keyword} needs a {argument} argument (skipped)"
            ),
        }
    }
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Released => "[OK]",
        Status::Locked => "[LOCKED]",
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Released => Color::Green,
        Status::Locked => Color::Red,
    }
}

/// Colour the frame of a box from `render_box`, leaving the text inside plain
fn paint_borders(rendered: &str, color: Color) -> String {
    let mut out = String::with_capacity(rendered.len() * 2);
    for line in rendered.lines() {
        let mut chars = line.chars();
        match (chars.next(), chars.next_back()) {
            (Some('\u{2502}'), Some(right)) => {
                out.push_str(&"\u{2502}".with(color).to_string());
                out.push_str(chars.as_str());
                out.push_str(&right.to_string().with(color).to_string());
            }
            _ => out.push_str(&line.with(color).to_string()),
        }
        out.push('\n');
    }
    out
}

/// Frame `lines` in a rounded box with `title` in the top border
pub fn render_box<S: AsRef<str>>(title: &str, lines: &[S]) -> String {
    let title_width = title.chars().count() + 2;
    let inner = lines
        .iter()
        .map(|l| l.as_ref().chars().count())
        .max()
        .unwrap_or(0)
        .max(title_width)
        + 2;

    let mut out = String::new();
    let fill = inner - title_width;
    let left = fill / 2;
    out.push('\u{256d}');
    out.push_str(&"\u{2500}".repeat(left));
    out.push_str(&format!(" {title} "));
    out.push_str(&"\u{2500}".repeat(fill - left));
    out.push_str("\u{256e}\n");

    for line in lines {
        let line = line.as_ref();
        let pad = inner - 2 - line.chars().count();
        out.push_str(&format!("\u{2502} {line}{} \u{2502}\n", " ".repeat(pad)));
    }

    out.push('\u{2570}');
    out.push_str(&"\u{2500}".repeat(inner));
    out.push_str("\u{256f}\n");
    out
}
