//! Console front end for Mystic Quest.
//!
//! Usage: `mystic-quest [SAVE_DIR]`. Saves default to `./saves`.

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use game_rules::Catalog;
use narrative_core::{
    parse_selection, Input, NarrativeError, NarrativeResult, Pacing, Presentation, SaveStore,
    Selection, Session,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SAVE_DIR: &str = "saves";

/// Writes to stdout, pausing between passages on a real terminal.
struct Screen {
    paced: bool,
}

impl Presentation for Screen {
    fn present(&mut self, text: &str, pacing: Option<Pacing>) {
        println!("{}", text);
        if !self.paced {
            return;
        }
        let pause = match pacing {
            Some(Pacing::Dramatic) => Duration::from_millis(900),
            Some(Pacing::Narration) => Duration::from_millis(350),
            Some(Pacing::Instant) | None => return,
        };
        std::thread::sleep(pause);
    }
}

/// Reads one line of stdin per prompt.
struct Keyboard {
    stdin: io::StdinLock<'static>,
}

impl Input for Keyboard {
    fn select(&mut self, prompt: &str, _choices: &[String]) -> Selection {
        match self.read_line(prompt) {
            Some(line) => parse_selection(&line),
            None => Selection::Closed,
        }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}: ", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.stdin.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end().to_string()),
        }
    }
}

fn play(save_dir: String) -> NarrativeResult<()> {
    let catalog = Catalog::builtin()?;
    let mut screen = Screen {
        paced: io::stdout().is_terminal(),
    };
    let mut keyboard = Keyboard {
        stdin: io::stdin().lock(),
    };

    screen.present("MYSTIC QUEST", Some(Pacing::Dramatic));
    let name = keyboard
        .read_line("What is your name, adventurer?")
        .ok_or(NarrativeError::InputClosed)?;

    let mut session = Session::new(&name, catalog, SaveStore::new(save_dir))?;
    match session.run(&mut screen, &mut keyboard)? {
        Some(_) => screen.present("Thank you for playing.", Some(Pacing::Instant)),
        None => screen.present("Farewell, traveller.", Some(Pacing::Instant)),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrative_core=info,game_rules=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let save_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string());

    match play(save_dir) {
        Ok(()) | Err(NarrativeError::InputClosed) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "mystic quest stopped");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
