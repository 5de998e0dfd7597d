//! `vedaguru prompt`: Print the assembled system prompt.

use vedaguru_config::AppConfig;
use vedaguru_prompts::{QueryAnalysis, build_system_prompt, catalog};

pub fn run(category: &str, topic: &str, short: bool) -> Result<(), Box<dyn std::error::Error>> {
    let matching = AppConfig::load()
        .map(|c| c.prompts.topic_matching)
        .unwrap_or_default();

    if catalog::category(category).is_none() {
        eprintln!("  note: '{category}' is not a known category, using the generic persona");
    }

    let prompt = build_system_prompt(category, topic, short, matching);
    println!("{prompt}");

    let analysis = QueryAnalysis::analyze("", &prompt);
    eprintln!();
    eprintln!(
        "  [{} chars · matching: {} · classifier sees category: {}]",
        prompt.chars().count(),
        matching.as_str(),
        analysis.category
    );
    Ok(())
}
