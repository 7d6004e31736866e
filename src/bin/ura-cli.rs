use std::io::{self, Write};
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ura_chat::client::{
    BubbleId, ChatController, ChatView, HttpTransport, Role, Speaker, SpeechControl,
};

/// Terminal front end for the URA chat relay.
#[derive(Parser, Debug)]
#[command(name = "ura-cli", version)]
struct Args {
    /// Base URL of a running relay
    #[arg(long, env = "URA_SERVER", default_value = "http://127.0.0.1:3001")]
    server: String,

    /// Per-character typing delay in milliseconds (0 prints replies at once)
    #[arg(long, default_value_t = 5)]
    typing_delay_ms: u64,
}

struct Bubble {
    id: BubbleId,
    role: Role,
    html: String,
    timestamp: String,
}

/// Prints bubbles to stdout. The newest bot bubble stays on an open line so
/// the placeholder can be erased and the typed reply redrawn in place.
#[derive(Default)]
struct TerminalView {
    next_id: u64,
    bubbles: Vec<Bubble>,
    open_line: Option<BubbleId>,
}

impl TerminalView {
    fn finish_line(&mut self) {
        if self.open_line.take().is_some() {
            println!();
        }
    }

    fn draw(&self, id: BubbleId) {
        let Some(b) = self.bubbles.iter().find(|b| b.id == id) else {
            return;
        };
        let who = match b.role {
            Role::User => "you",
            Role::Bot => "ura",
        };
        print!("\r\x1b[2K[{}] {} › {}", b.timestamp, who, ansi(&b.html));
        let _ = io::stdout().flush();
    }
}

fn ansi(html: &str) -> String {
    html.replace("<b>", "\x1b[1m").replace("</b>", "\x1b[22m")
}

impl ChatView for TerminalView {
    fn append_bubble(&mut self, role: Role, html: &str, timestamp: &str) -> BubbleId {
        self.finish_line();
        self.next_id += 1;
        let id = BubbleId(self.next_id);
        self.bubbles.push(Bubble {
            id,
            role,
            html: html.to_string(),
            timestamp: timestamp.to_string(),
        });
        self.draw(id);
        match role {
            Role::User => println!(),
            Role::Bot => self.open_line = Some(id),
        }
        id
    }

    fn set_bubble_html(&mut self, id: BubbleId, html: &str) {
        if let Some(b) = self.bubbles.iter_mut().find(|b| b.id == id) {
            b.html = html.to_string();
        }
        // Multi-line replies are drawn once, when they are finished.
        if self.open_line == Some(id) && !html.contains('\n') {
            self.draw(id);
        }
    }

    fn remove_bubble(&mut self, id: BubbleId) {
        self.bubbles.retain(|b| b.id != id);
        if self.open_line == Some(id) {
            print!("\r\x1b[2K");
            let _ = io::stdout().flush();
            self.open_line = None;
        }
    }

    fn last_bot_bubble(&self) -> Option<(BubbleId, String)> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| b.role == Role::Bot)
            .map(|b| (b.id, b.html.clone()))
    }

    fn add_speak_button(&mut self, id: BubbleId, _text: &str) {
        if self.open_line == Some(id) {
            self.draw(id);
            self.finish_line();
        }
    }

    fn set_input(&mut self, _text: &str) {}

    fn set_status(&mut self, text: &str) {
        eprintln!("[{}]", text);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let transport = HttpTransport::new(&args.server);
    println!("Relay: {} (Ctrl-D to quit)", transport.endpoint());

    let mut controller =
        ChatController::new(TerminalView::default(), transport, Speaker::silent(), None)
            .with_typing_delay(Duration::from_millis(args.typing_delay_ms));

    if let SpeechControl::Disabled { label } = controller.speech_control() {
        println!("Voice input off: {}", label);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        controller.refresh_status(Instant::now());
        controller.submit_text(&line).await;
        controller.view_mut().finish_line();
    }

    println!();
    Ok(())
}
