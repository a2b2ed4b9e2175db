//! CLI argument parsing and subcommand dispatch.

use crate::app_config;

/// Parse CLI arguments and dispatch to the appropriate subcommand.
///
/// Returns `Ok(true)` if a subcommand was handled, `Ok(false)` if `serve`
/// should be started (handled by the caller).
pub async fn dispatch(config: &relay_core::Config, args: &[String]) -> anyhow::Result<bool> {
    match args.get(1).map(|s| s.as_str()) {
        Some("classify") => {
            let question = args[2..].join(" ");
            if question.trim().is_empty() {
                anyhow::bail!("Usage: relay-server classify <question>");
            }
            let classifier = app_config::build_classifier(config)?;
            let outcome = classifier.classify(&question).await;
            println!("{}", outcome);
            Ok(true)
        }
        Some("routes") => {
            let routes = relay_agent::AgentRoutes::from_config(&config.routes);
            for (label, agent_id) in routes.entries() {
                println!("{:<10} {}", label, agent_id.unwrap_or("(none)"));
            }
            Ok(true)
        }
        None | Some("serve") => Ok(false),
        _ => {
            print_usage();
            Ok(true)
        }
    }
}

fn print_usage() {
    println!("relay-server v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage: relay-server <command>");
    println!("  serve                 Start HTTP server (default)");
    println!("  classify <question>   Classify a question and print the label");
    println!("  routes                Print the label -> agent id table");
}
