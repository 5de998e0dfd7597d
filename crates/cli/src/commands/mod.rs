pub mod ask;
pub mod chat;
pub mod doctor;
pub mod prompt;
pub mod topics;

use vedaguru_chat::{ChatReply, ChatService};
use vedaguru_config::AppConfig;

/// Load configuration and wire a chat service from it.
pub fn load_service() -> vedaguru_core::Result<(AppConfig, ChatService)> {
    let config = AppConfig::load()?;
    let service = ChatService::from_config(&config);
    tracing::debug!(
        default_provider = %config.default_provider,
        configured = ?service.router().configured(),
        "Chat service ready"
    );
    Ok((config, service))
}

/// Human-readable rendering of one reply.
pub fn print_reply(reply: &ChatReply) {
    println!("{}", reply.response);
    println!();

    let mut meta = vec![format!("provider: {}", reply.provider)];
    if let Some(model) = &reply.model {
        meta.push(format!("model: {model}"));
    }
    if let Some(score) = reply.complexity_score {
        meta.push(format!("complexity: {score}/5"));
    }
    if reply.cached {
        meta.push("cached".to_string());
    }
    if let Some(usage) = &reply.token_usage {
        meta.push(format!("tokens: {}", usage.total_tokens));
    }
    if let Some(tag) = &reply.error {
        meta.push(format!("error: {tag}"));
    }
    meta.push(format!("{:.2}s", reply.response_time));
    eprintln!("  [{}]", meta.join(" · "));
}
