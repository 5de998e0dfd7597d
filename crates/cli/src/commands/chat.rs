//! `vedaguru chat`: Interactive conversation, one topic per session.

use std::io::Write;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use vedaguru_chat::{ChatError, ChatRequest};
use vedaguru_prompts::catalog;

use crate::TopicArgs;

pub async fn run(target: TopicArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, service) = super::load_service()?;
    let provider = target
        .provider
        .clone()
        .unwrap_or_else(|| config.default_provider.clone());

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Vedaguru — Interactive Session        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Category:  {}", catalog::category_name(&target.category));
    println!("  Topic:     {}", catalog::topic_name(&target.category, &target.topic));
    println!("  Provider:  {provider}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut conversation_id: Option<String> = None;

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let mut request = ChatRequest::new(line, target.category.clone(), target.topic.clone());
        request.provider = target.provider.clone();
        request.conversation_id = conversation_id.clone();

        eprint!("  ...");
        match service.respond(request).await {
            Ok(reply) => {
                eprint!("\r     \r");
                if let Some(c) = &reply.conversation {
                    conversation_id = Some(c.id.clone());
                }
                println!();
                super::print_reply(&reply);
                println!();
            }
            Err(ChatError::Validation(msg)) => {
                eprint!("\r     \r");
                eprintln!("  {msg}");
                // Category/topic are fixed for the session, so nothing will succeed.
                if msg.starts_with("Invalid") {
                    break;
                }
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  Error: {e}");
            }
        }
    }

    print_stats(&service);
    Ok(())
}

fn print_stats(service: &vedaguru_chat::ChatService) {
    let summary = service.analytics_summary();
    let cache = service.cache_stats();

    println!();
    println!("  Session stats");
    println!("  ─────────────");
    println!(
        "  Requests:      {} ({} ok, {:.0}% success)",
        summary.total_requests, summary.successful_requests, summary.success_rate
    );
    println!("  Avg time:      {:.2}s", summary.avg_response_time_secs);
    println!("  Tokens:        {}", summary.total_tokens);
    println!(
        "  Cache:         {}/{} entries ({:.1}%)",
        cache.size, cache.max_entries, cache.utilization_percent
    );
    for (code, count) in &summary.top_errors {
        println!("  Error {code}: {count}");
    }
    println!();
}
