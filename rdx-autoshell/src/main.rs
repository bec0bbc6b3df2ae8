use anyhow::Result;
use autoplay::prelude::*;
use autoplay::{ENGINE_NAME, VERSION as LIB_VERSION};
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct ShellHighlighter;

impl Highlighter for ShellHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            Cow::Owned(format!("{} {}", command.yellow().bold(), rest.yellow()))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Prints the toggle button's state as the shell's "rendering".
struct ShellToggle;

impl ToggleButton for ShellToggle {
    fn link_controls(&self) {}

    fn update(&self, state: ToggleState) {
        let label = match state.label {
            ToggleLabel::Play => "Start autoplay".green(),
            ToggleLabel::Pause => "Pause autoplay".yellow(),
        };
        println!("<-- [TOGGLE] {}", label);
    }
}

/// Prints progress in tenths, only while the user is watching it.
struct ShellBar {
    watching: Arc<AtomicBool>,
}

impl ProgressBar for ShellBar {
    fn set_progress(&self, rate: f64) {
        if !self.watching.load(Ordering::Relaxed) {
            return;
        }
        let filled = (rate * 10.0).floor() as usize;
        if (rate * 10.0).fract() < 0.05 {
            println!(
                "<-- [BAR] [{}{}] {:>3.0}%",
                "#".repeat(filled).cyan(),
                ".".repeat(10 - filled.min(10)).dimmed(),
                rate * 100.0
            );
        }
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", ENGINE_NAME.cyan().bold());
    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", "-".repeat(64).dimmed());
    println!("{}", version_string);
    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";
    println!("{}", license_blurb.dimmed());
    println!("{}", "-".repeat(64).dimmed());
}

/// Spawns a task that prints play/pause transitions and system events.
fn spawn_event_listeners(engine: &AutoplayEngine) {
    let mut event_rx = engine.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            if !matches!(event, AutoplayEvent::Playing { .. }) {
                println!("\n<-- [AUTOPLAY] {:?}", event);
            }
        }
    });

    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            if matches!(event, SystemEvent::EngineStarted { .. } | SystemEvent::EngineShutdown) {
                println!("\n<-- [SYSTEM] {:?}", event);
            }
        }
    });
}

fn print_help() {
    println!("Available commands:");
    println!("  hover | leave         - Pointer enters or leaves the carousel.");
    println!("  focus | blur          - Focus moves into or out of the carousel.");
    println!("  click                 - Clicks the play/pause toggle.");
    println!("  play | pause | stop   - Calls the API directly (pause is transient).");
    println!("  go <N>                - Navigates to slide N.");
    println!("  scroll | refresh      - Raises a carousel scroll or refresh.");
    println!("  status                - Shows state, progress and interval.");
    println!("  watch on|off          - Toggles the progress bar output.");
    println!("  exit                  - Quits the shell.");
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .init();

    let path = env::args().nth(1).map(PathBuf::from);
    let mut config = AutoplayConfig::load(path.as_deref())?;
    if !config.autoplay.is_enabled() {
        config.autoplay = AutoplayMode::On;
    }

    let carousel = Arc::new(MemoryCarousel::new(vec![
        Slide::default(),
        Slide::with_interval("8000"),
        Slide::default(),
        Slide::with_interval("not-a-number"),
    ]));
    let watching = Arc::new(AtomicBool::new(false));
    let parts = AutoplayParts::new(carousel.clone())
        .with_toggle(Arc::new(ShellToggle))
        .with_bar(Arc::new(ShellBar {
            watching: watching.clone(),
        }));

    let engine = AutoplayEngine::new(config, parts)?;
    let handle = engine.handle();
    spawn_event_listeners(&engine);

    info!("Spawning {} in the background...", ENGINE_NAME);
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let engine_task = tokio::spawn(async move {
        if let Err(e) = engine
            .run_until(async {
                stop_rx.await.ok();
            })
            .await
        {
            eprintln!("\nEngine stopped with an error: {}", e);
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHighlighter));

    println!(
        "{} is running over {} slides. Type 'help' for commands or 'exit' to quit.",
        ENGINE_NAME.cyan(),
        carousel.len()
    );

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();
                let Some(command) = args.first() else {
                    continue;
                };
                let sent = match *command {
                    "hover" => handle.input(InputEvent::PointerEnter),
                    "leave" => handle.input(InputEvent::PointerLeave),
                    "focus" => handle.input(InputEvent::FocusIn),
                    "blur" => handle.input(InputEvent::FocusOut),
                    "click" => handle.input(InputEvent::ToggleClick),
                    "play" => handle.play(),
                    "pause" => handle.pause(false),
                    "stop" => handle.pause(true),
                    "go" => {
                        match args.get(1).map(|index| index.parse::<usize>()) {
                            Some(Ok(index)) if carousel.go(index) => {
                                println!("--> Moved to slide #{}.", index)
                            }
                            Some(Ok(index)) => println!("Error: there is no slide #{}.", index),
                            Some(Err(_)) => println!("Error: slide index must be a number."),
                            None => println!("Usage: go <N>"),
                        }
                        Ok(())
                    }
                    "scroll" => {
                        carousel.scroll();
                        Ok(())
                    }
                    "refresh" => {
                        carousel.refresh();
                        Ok(())
                    }
                    "status" => {
                        let status = handle.status().await?;
                        println!(
                            "--> {:?} on slide #{} | progress {:.0}% | interval {:?}",
                            status.state,
                            carousel.index(),
                            status.progress * 100.0,
                            status.interval
                        );
                        Ok(())
                    }
                    "watch" => {
                        match args.get(1) {
                            Some(&"on") => watching.store(true, Ordering::Relaxed),
                            Some(&"off") => watching.store(false, Ordering::Relaxed),
                            _ => println!("Usage: watch on|off"),
                        }
                        Ok(())
                    }
                    "help" => {
                        print_help();
                        Ok(())
                    }
                    "exit" => break,
                    _ => {
                        println!("Unknown command: '{}'. Type 'help'.", line.trim());
                        Ok(())
                    }
                };
                if let Err(e) = sent {
                    println!("Error: {}", e);
                    break;
                }
            }
            Err(_) => break,
        }
    }

    println!("Exiting autoshell...");
    stop_tx.send(()).ok();
    engine_task.await?;
    Ok(())
}
