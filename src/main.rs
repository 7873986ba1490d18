use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tallypad::calculator::{AnimationIntent, Calculator, copy_to_clipboard};
use tallypad::config::Config;
use tallypad::input::parse_keys;
use tallypad::presentation::{Effect, Presenter, Surface, Target};
use tallypad::theme::{FileThemeStore, SystemScheme, Theme, ThemeManager};

#[derive(Parser)]
#[command(name = "tallypad", version, about = "A keypad calculator for the terminal")]
struct Cli {
    /// Play every effect instantly.
    #[arg(long, global = true)]
    reduced_motion: bool,

    /// Only swap text; do not report effects.
    #[arg(long, global = true)]
    no_animations: bool,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read key sequences from stdin, one line at a time.
    Run,
    /// Run a key sequence such as `12+3{Backspace}4=` and print the display.
    Eval {
        keys: String,
        /// Print every update as a JSON line.
        #[arg(long)]
        json: bool,
    },
    /// Show or change the theme.
    Theme {
        /// `dark`, `light`, `violet` (or `1`-`3`), or `system` to follow the system.
        selection: Option<String>,
        /// The system color scheme to fall back to.
        #[arg(long, value_enum, default_value_t = SchemeArg::Dark)]
        system: SchemeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Dark,
    Light,
}

impl From<SchemeArg> for SystemScheme {
    fn from(arg: SchemeArg) -> Self {
        SystemScheme::from_prefers_light(matches!(arg, SchemeArg::Light))
    }
}

/// Prints the display to stdout whenever a line changes.
struct TerminalSurface {
    show_effects: bool,
    lines: Mutex<(String, String)>,
}

impl TerminalSurface {
    fn new(show_effects: bool) -> Self {
        Self {
            show_effects,
            lines: Mutex::new((String::new(), String::new())),
        }
    }
}

impl Surface for TerminalSurface {
    fn set_text(&self, target: Target, text: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let line = match target {
            Target::Current => &mut lines.0,
            Target::Previous => &mut lines.1,
        };
        if line.as_str() == text {
            return;
        }
        *line = text.to_string();
        println!("{:>28}\n{:>28}", lines.1, lines.0);
    }

    fn animate(&self, target: Target, effect: &Effect) {
        if self.show_effects {
            println!("  ~ {:?}: {} ({} ms)", target, effect.name, effect.duration.as_millis());
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.reduced_motion |= cli.reduced_motion;
    config.no_animations |= cli.no_animations;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&config).await,
        Command::Eval { keys, json } => eval(&keys, json),
        Command::Theme { selection, system } => theme(&config, selection.as_deref(), system.into()),
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let surface = Arc::new(TerminalSurface::new(!config.no_animations));
    let mut presenter = Presenter::new(surface, config.effects());

    let (tx, rx) = flume::unbounded::<String>();
    std::thread::spawn(move || forward_lines(io::stdin().lock(), &tx));

    while let Ok(line) = rx.recv_async().await {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "copy" => {
                let text = presenter.calculator().clipboard_text();
                match copy_to_clipboard(&text) {
                    Ok(()) => eprintln!("copied {}", text),
                    Err(err) => eprintln!("{}", err),
                }
            }
            keys => match parse_keys(keys) {
                Ok(inputs) => {
                    for input in inputs {
                        if let Err(err) = presenter.handle(input) {
                            debug!(%err, "input rejected");
                        }
                    }
                }
                Err(err) => eprintln!("{}", err),
            },
        }
    }

    presenter.settle().await;
    Ok(())
}

/// Send each line of `reader` until it ends, fails, or the receiver is gone.
fn forward_lines(reader: impl BufRead, tx: &flume::Sender<String>) {
    for line in reader.lines().map_while(Result::ok) {
        if tx.send(line).is_err() {
            break;
        }
    }
}

fn eval(keys: &str, json: bool) -> anyhow::Result<()> {
    let inputs = parse_keys(keys)?;
    let mut calculator = Calculator::new();

    for input in inputs {
        let update = calculator.dispatch(input).unwrap_or_else(|err| {
            eprintln!("! {}", err);
            calculator.snapshot(AnimationIntent::Reset)
        });
        if json {
            println!("{}", serde_json::to_string(&update)?);
        }
    }

    if !json {
        let display = calculator.snapshot(AnimationIntent::None);
        if !display.previous.is_empty() {
            println!("{}", display.previous);
        }
        println!("{}", display.current);
    }
    Ok(())
}

fn theme(config: &Config, selection: Option<&str>, scheme: SystemScheme) -> anyhow::Result<()> {
    let store = match &config.theme_file {
        Some(path) => FileThemeStore::new(path),
        None => FileThemeStore::in_config_dir()?,
    };
    let mut manager = ThemeManager::new(store, scheme);

    match selection {
        None => {}
        Some("system") => {
            manager.follow_system()?;
        }
        Some(value) => {
            let theme: Theme = value.parse()?;
            manager.select(theme)?;
        }
    }

    println!(
        "{} (data-theme={}{})",
        manager.current(),
        manager.current().attribute(),
        if manager.is_manual() { "" } else { ", system" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lines() {
        let (tx, rx) = flume::unbounded();
        forward_lines(io::Cursor::new("12+3\ncopy\n\nquit"), &tx);
        drop(tx);
        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines, ["12+3", "copy", "", "quit"]);
    }

    #[test]
    fn test_forward_lines_stops_when_receiver_is_gone() {
        let (tx, rx) = flume::unbounded::<String>();
        drop(rx);
        forward_lines(io::Cursor::new("1\n2\n"), &tx);
        assert!(tx.is_disconnected());
    }
}
