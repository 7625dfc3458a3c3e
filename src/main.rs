use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use murmur::recognizer::{PipelineOutput, RecognizerAdapter, RecognizerEvent, VoicePipeline};
use murmur::session::{ListeningMode, ListeningSessionManager};
use murmur::{AppConfig, CommandParser};

/// Stdin stands in for the speech engine. `!kill` simulates an engine that
/// died silently so the keep-alive path can be exercised by hand.
struct ConsoleRecognizer {
    listening: AtomicBool,
}

impl ConsoleRecognizer {
    fn new() -> Self {
        Self {
            listening: AtomicBool::new(false),
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn kill(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }
}

impl RecognizerAdapter for ConsoleRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&self) -> anyhow::Result<()> {
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Config + catalog
    let config = AppConfig::from_env().context("loading config")?;
    let commands = config.load_catalog().context("loading command catalog")?;
    tracing::info!("Murmur starting: {} commands, language '{}'", commands.len(), config.language);

    let parser = Arc::new(CommandParser::with_config(commands, config.matcher.clone()));
    let session = ListeningSessionManager::new(config.session.clone());
    let recognizer = Arc::new(ConsoleRecognizer::new());

    if !recognizer.is_available() {
        anyhow::bail!("no speech engine available");
    }

    // 3. Wire supervision to the engine
    let health_probe = recognizer.clone();
    session.set_health_check_callback(move || health_probe.is_listening());

    let restart_target = recognizer.clone();
    session.set_restart_callback(move || {
        let engine = restart_target.clone();
        async move {
            engine.stop()?;
            engine.start()
        }
    });

    let mut session_events = session.subscribe();
    tokio::spawn(async move {
        loop {
            match session_events.recv().await {
                Ok(event) => println!("[SESSION] {:?} (attempts: {}, error: {:?})",
                    event.change, event.state.restart_attempts, event.state.last_error),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Session observer lagged by {} events", n)
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // 4. Pipeline
    let (event_tx, event_rx) = mpsc::channel(100);
    let (output_tx, mut output_rx) = mpsc::channel(100);
    let pipeline = VoicePipeline::new(parser, session.clone(), &config.language)
        .with_confirmation_threshold(config.confirmation_threshold);
    tokio::spawn(async move { pipeline.run(event_rx, output_tx).await });

    tokio::spawn(async move {
        while let Some(output) = output_rx.recv().await {
            match output {
                PipelineOutput::Partial(text) => println!("[PARTIAL] {}", text),
                PipelineOutput::Command { command, needs_confirmation, .. } => {
                    let verb = if needs_confirmation { "CONFIRM?" } else { "EXECUTE" };
                    println!("[{}] {} {:?} {:?} ({:.2}, {:?})", verb, command.intent,
                        command.action, command.slot, command.confidence, command.stage);
                }
                PipelineOutput::Unrecognized { text } => println!("[NO MATCH] '{}'", text),
                PipelineOutput::Error(e) => println!("[ERROR] {} -> {}", e, e.kind.user_action()),
            }
        }
    });

    // 5. Start listening
    recognizer.start()?;
    session.start(ListeningMode::Continuous);

    println!("Speak by typing. '!partial <text>', '!error <code> [message]', '!kill', '!stop', '!start', '!quit'.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match line.split_once(' ').unwrap_or((line, "")) {
            ("!quit", _) => break,
            ("!kill", _) => {
                recognizer.kill();
                continue;
            }
            ("!stop", _) => {
                session.stop();
                recognizer.stop()?;
                continue;
            }
            ("!start", _) => {
                recognizer.start()?;
                session.start(ListeningMode::Continuous);
                continue;
            }
            ("!partial", rest) => RecognizerEvent::interim(rest),
            ("!error", rest) => {
                let (code, message) = rest.split_once(' ').unwrap_or((rest, rest));
                RecognizerEvent::error(code, message)
            }
            _ => RecognizerEvent::final_text(line, None),
        };

        if !recognizer.is_listening() {
            println!("(recognizer is not listening)");
            continue;
        }
        if event_tx.send(event).await.is_err() {
            tracing::error!("Pipeline stopped; exiting");
            break;
        }
    }

    session.stop();
    recognizer.stop()?;
    tracing::info!("Murmur stopped");
    Ok(())
}
