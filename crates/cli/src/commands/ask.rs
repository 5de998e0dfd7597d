//! `vedaguru ask`: Single-question mode.

use vedaguru_chat::ChatRequest;

use crate::TopicArgs;

pub async fn run(target: TopicArgs, message: String, json: bool) -> vedaguru_core::Result<()> {
    let (_config, service) = super::load_service()?;

    let mut request = ChatRequest::new(message, target.category, target.topic);
    request.provider = target.provider;

    if !json {
        eprint!("  Thinking...");
    }
    let reply = service.respond(request).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        eprint!("\r              \r");
        super::print_reply(&reply);
    }

    Ok(())
}
