//! `memochat chat`: Terminal conversation through the turn pipeline.

use std::io::Write;
use std::sync::Arc;

use memochat_agent::{ConversationState, TurnOutcome, TurnRunner};
use memochat_config::AppConfig;
use memochat_providers::OpenAiConnector;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early: give a clear error
    let Some(params) = config.connection.to_params() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    MEMOCHAT_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY   = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file under [connection]:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let runner = TurnRunner::from_config(Arc::new(OpenAiConnector::new()), &config.conversation);
    let mut state = ConversationState::new(params);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = runner.submit_turn(&mut state, &msg).await;
        eprint!("\r              \r");
        print_outcome(&outcome?);
        return Ok(());
    }

    // Interactive mode
    let model = state
        .connection()
        .map(|c| c.model_name.clone())
        .unwrap_or_default();
    println!();
    println!("  memochat: interactive mode");
    println!();
    println!("  Model:     {model}");
    println!("  Window:    last {} turns", runner.prompt().window());
    println!();
    println!("  Type your message and press Enter.");
    println!("  /memory shows what has been remembered, /reset starts over.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "exit" | "quit" => break,
            "/memory" => {
                print_memory(&state);
                continue;
            }
            "/reset" => {
                state.reset(true);
                println!("  History and memory cleared.\n");
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        let outcome = runner.submit_turn(&mut state, &line).await;
        eprint!("\r     \r");

        match outcome {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => eprintln!("\n  ❌ {e}\n"),
        }
    }

    println!("\n  Goodbye!");
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    let TurnOutcome::Completed {
        reply,
        memories_added,
        ..
    } = outcome
    else {
        return;
    };

    println!();
    for line in reply.lines() {
        println!("  Assistant > {line}");
    }
    for memory in memories_added {
        println!("  🧠 remembered: {memory}");
    }
    println!();
}

fn print_memory(state: &ConversationState) {
    if state.memory().is_empty() {
        println!("  (nothing remembered yet)\n");
        return;
    }
    println!();
    for (i, entry) in state.memory().iter().enumerate() {
        println!("  {:>3}. {entry}", i + 1);
    }
    println!();
}
