//! System prompt assembly.

use vedaguru_core::TopicMatching;

use crate::guidance;
use crate::persona;

/// Build the system prompt for one request.
///
/// Persona block, then a brevity or depth block, then topic guidance when the
/// topic resolves to any. Unknown categories get the generic persona and
/// unknown topics add nothing.
pub fn build_system_prompt(
    category: &str,
    topic: &str,
    short_query: bool,
    matching: TopicMatching,
) -> String {
    let profile = persona::profile(category);
    let greeting = profile.greeting;

    let mut prompt = format!(
        "You are {name}, {persona}\n\n\
         Keep your responses informative, reverential and accessible. Use Sanskrit terms where \
         they fit, always with a translation.\n\
         If asked about controversial topics, give balanced, scholarly perspectives while \
         respecting Hindu traditions.\n\n\
         If you don't know the answer, say so and suggest related topics you can discuss \
         instead of inventing information.\n\n\
         {citation_style}\n\n\
         Begin your response with \"{greeting}\" and include at least one appropriate Sanskrit \
         quote in each detailed response.",
        name = profile.name,
        persona = profile.persona,
        citation_style = profile.citation_style,
    );

    if short_query {
        prompt.push_str(&format!(
            "\n\nThe user has sent a greeting or a short question. Reply briefly and warmly, in \
             2-3 sentences at most. Still begin with '{greeting}', and keep the reverent tone of \
             the Hindu traditions."
        ));
    } else {
        prompt.push_str(
            "\n\nThe user has asked a detailed question. Give a thorough answer across several \
             paragraphs with explanations and relevant examples, organised into clear sections \
             where that helps.",
        );
    }

    if let Some(g) = guidance::resolve(category, topic, matching) {
        prompt.push_str("\n\n");
        prompt.push_str(&g.render());
    }

    prompt
}
