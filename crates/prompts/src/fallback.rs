//! Canned replies used when no model output is available.

use vedaguru_core::ProviderFamily;

use crate::persona;

/// Persona-flavored apology for a failed provider call.
///
/// Every reply opens with the category's greeting, like a real answer would.
pub fn fallback_reply(category: &str, short_query: bool) -> String {
    let greeting = persona::profile(category).greeting;
    if short_query {
        return format!("{greeting} Namaste! I'm having a brief technical issue. Please try again shortly.");
    }

    let wisdom = match category {
        "vedas" => " As the Rigveda teaches us, 'धीरस्य धैर्यम्' (Patience is the virtue of the wise).",
        "puranas" => " As the wise Vyasa teaches, challenges are temporary while wisdom is eternal.",
        "epics" => " As Lord Krishna says in the Bhagavad Gita, patience leads to perfection.",
        "knowledge" => " The ancient texts teach us that obstacles are opportunities for growth.",
        "characters" => " As devotees say, 'कृष्ण कृपा करेंगे' (Krishna will show his grace).",
        _ => "",
    };
    let closing = if wisdom.is_empty() { " Om Shanti." } else { "" };

    format!(
        "{greeting} I apologize, but I'm currently experiencing technical difficulties.{wisdom} \
         Please try again in a moment, or ask another question.{closing}"
    )
}

fn display_name(family: ProviderFamily) -> &'static str {
    match family {
        ProviderFamily::Mistral => "Mistral AI",
        ProviderFamily::Perplexity => "Perplexity AI",
    }
}

/// Reply for a request routed to a provider that has no API key.
pub fn configuration_reply(family: ProviderFamily) -> String {
    format!(
        "{} API key is not configured. Please set the {} environment variable.",
        display_name(family),
        family.api_key_env()
    )
}

/// Reply for a provider name nobody registered.
pub fn unknown_provider_reply(name: &str) -> String {
    format!("Unknown AI provider '{name}'. Available providers are mistral and perplexity.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_fallback_opens_with_greeting() {
        let reply = fallback_reply("puranas", true);
        assert!(reply.starts_with("नमो नारायणाय 🙏"));
        assert!(reply.contains("brief technical issue"));
    }

    #[test]
    fn long_fallback_is_category_flavored() {
        let reply = fallback_reply("vedas", false);
        assert!(reply.starts_with("ॐ शांति: शांति: शांति: 🕉️"));
        assert!(reply.contains("धीरस्य धैर्यम्"));
        assert!(!reply.contains("Om Shanti."));
    }

    #[test]
    fn unknown_category_uses_generic_reply() {
        let reply = fallback_reply("tantras", false);
        assert!(reply.starts_with("जय श्री कृष्ण 🙏"));
        assert!(reply.ends_with("Om Shanti."));
    }

    #[test]
    fn configuration_reply_names_the_variable() {
        let reply = configuration_reply(ProviderFamily::Perplexity);
        assert!(reply.contains("PERPLEXITY_API_KEY"));
        assert!(reply.starts_with("Perplexity AI"));
    }
}
