use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use runo_client::runtime::{Frontend, Runtime};
use runo_client::ui::element::ElementState;
use runo_client::ui::flash::FlashId;
use runo_client::ui::actions::Control;
use runo_client::{ClientConfig, Engine, GameContext, HttpGateway, Msg, TableView, ViewChange};
use runo_protocol::{CardId, CardRef, Color, FlashKind};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// What the input thread needs to turn a typed command into a message.
#[derive(Debug, Default, Clone)]
pub struct Seen {
    pub hand: Vec<CardId>,
    pub awaiting: Option<CardId>,
    pub flashes: Vec<FlashId>,
}

pub struct TerminalFrontend {
    seen: Arc<Mutex<Seen>>,
}

impl TerminalFrontend {
    pub fn new(seen: Arc<Mutex<Seen>>) -> Self {
        Self { seen }
    }
}

impl Frontend for TerminalFrontend {
    fn render(&mut self, view: &TableView, _changes: &[ViewChange]) {
        *self.seen.lock() = Seen {
            hand: view.hand.iter().map(|s| s.card.id.clone()).collect(),
            awaiting: view.awaiting_color().map(|c| c.id.clone()),
            flashes: view.flashes.iter().map(|f| f.id).collect(),
        };
        print_table(view);
    }

    fn prompt_color(&mut self, card: &CardRef) {
        println!("🎨 Pick a color for {}: color <red|blue|green|yellow>, or cancel", card_label(card));
    }
}

fn card_label(card: &CardRef) -> String {
    match card.color {
        Some(color) => format!("{} {}", card.value, color),
        None => card.value.to_string(),
    }
}

fn state_label(state: ElementState) -> &'static str {
    match state {
        ElementState::Disabled => "",
        ElementState::Enabled => " ✅",
        ElementState::Pending(_) => " ⏳",
        ElementState::AwaitingColorChoice => " 🎨",
    }
}

fn flash_icon(kind: FlashKind) -> &'static str {
    match kind {
        FlashKind::Success => "✅",
        FlashKind::Info => "ℹ️ ",
        FlashKind::Warning => "⚠️ ",
        FlashKind::Danger => "❌",
    }
}

pub fn print_table(view: &TableView) {
    let header = &view.header;
    let status = if header.ended {
        "finished"
    } else if header.started {
        "in progress"
    } else {
        "waiting for players"
    };
    println!("\n🎲 === {} ({}) ===", header.name.as_deref().unwrap_or("runo"), status);
    if header.reverse {
        println!("🔄 Play order is reversed");
    }
    if let Some(points) = header.points_to_win {
        println!("🏁 First to {points} points wins");
    }

    match &view.discard {
        Some(card) => println!("🗑️  Discard: {} ({} in pile)", card_label(card), view.discard_pile_size),
        None => println!("🗑️  Discard: empty"),
    }
    println!("🂠 Draw pile: {} cards{}", view.draw_pile_size, state_label(view.draw_pile));

    println!("👥 Players ({}):", view.rows.len());
    for row in &view.rows {
        let you = if row.is_viewer { " (you)" } else { "" };
        let turn = if row.active { " 👈 TO PLAY" } else { "" };
        let admin = if row.is_admin { " 👑" } else { "" };
        let winner = if row.is_game_winner { " 🏆" } else { "" };
        let draw = if row.draw_required { " must draw" } else { "" };
        println!(
            "  {}{}: {} pts, {} rounds, {} cards{}{}{}{}",
            row.name, you, row.points, row.rounds_won, row.hand_size, turn, admin, winner, draw
        );
    }

    if !view.hand.is_empty() {
        println!("🃏 Your hand:");
        for (i, slot) in view.hand.iter().enumerate() {
            println!("  {}) {}{}", i + 1, card_label(&slot.card), state_label(slot.state));
        }
    }

    for flash in &view.flashes {
        println!("{} {}", flash_icon(flash.kind), flash.message);
    }

    if !view.controls.is_empty() {
        let names: Vec<&str> = view
            .controls
            .iter()
            .map(|c| match c {
                Control::Start => "start",
                Control::Quit => "quit",
            })
            .collect();
        println!("🕹️  {}", names.join(" | "));
    }
    println!("==================\n");
}

pub fn print_help() {
    println!("\n📋 Commands available:");
    println!("  play <n>     - Play the n-th card of your hand");
    println!("  color <c>    - Answer the color prompt (red, blue, green, yellow)");
    println!("  cancel       - Dismiss the color prompt");
    println!("  draw         - Draw from the pile");
    println!("  start        - Start the game (admin only)");
    println!("  dismiss      - Clear notices");
    println!("  quit         - Quit the game");
    println!("  leave        - Stop watching, keep your seat");
    println!("\nType commands and press Enter:");
}

/// Turn one typed line into messages for the engine. `None` for unknown input.
pub fn parse_command(input: &str, seen: &Seen) -> Option<Vec<Msg>> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (cmd, args) = parts.split_first()?;

    match cmd.to_lowercase().as_str() {
        "play" | "p" => {
            let n: usize = args.first()?.parse().ok()?;
            let card = seen.hand.get(n.checked_sub(1)?)?.clone();
            Some(vec![Msg::CardClicked(card)])
        }
        "color" | "c" => {
            let card = seen.awaiting.clone()?;
            let color: Color = args.first()?.parse().ok()?;
            Some(vec![Msg::ColorChosen { card, color: Some(color) }])
        }
        "cancel" => {
            let card = seen.awaiting.clone()?;
            Some(vec![Msg::ColorChosen { card, color: None }])
        }
        "draw" | "d" => Some(vec![Msg::DrawClicked]),
        "start" => Some(vec![Msg::StartClicked]),
        "dismiss" => Some(seen.flashes.iter().map(|id| Msg::DismissFlash(*id)).collect()),
        "quit" => Some(vec![Msg::QuitClicked]),
        "leave" => Some(vec![Msg::Close]),
        _ => None,
    }
}

/// Blocking stdin reader; end of input leaves the table.
fn spawn_input(tx: UnboundedSender<Msg>, seen: Arc<Mutex<Seen>>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "help" {
                print_help();
                continue;
            }
            let parsed = parse_command(line, &seen.lock());
            match parsed {
                Some(msgs) => {
                    for msg in msgs {
                        if tx.send(msg).is_err() {
                            return;
                        }
                    }
                }
                None => println!("❓ Unknown command: {}", line),
            }
        }
        let _ = tx.send(Msg::Close);
    });
}

/// Seat the terminal at a table and play until quit or end of input.
pub async fn play(ctx: GameContext, config: ClientConfig) -> Result<()> {
    info!(game_id = %ctx.game_id, player_id = %ctx.player_id, endpoint = %ctx.endpoint, "joining table");
    println!("🎮 Game {} | player {}", ctx.game_id, ctx.player_id);

    let gateway = HttpGateway::new(ctx.clone(), config.request_timeout).context("building HTTP client")?;
    let runtime = Runtime::new(Engine::new(ctx, config), Arc::new(gateway));

    let seen = Arc::new(Mutex::new(Seen::default()));
    spawn_input(runtime.handle(), Arc::clone(&seen));
    print_help();

    let mut frontend = TerminalFrontend::new(seen);
    runtime.run(&mut frontend).await;

    println!("👋 Goodbye!");
    Ok(())
}
