//! Query classification and generation profiles.
//!
//! A message gets two cheap judgements: whether it is a short query (a
//! greeting or a handful of words), and a 1–5 complexity score from word and
//! sentence counts, domain keywords and question marks. Together with the
//! provider family they pick a row of a fixed decision table.

use std::time::Duration;

use serde_json::{Map, Value, json};
use vedaguru_core::{ProviderFamily, SamplingParams};

/// Messages that always get a brief reply.
pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "namaste",
    "ram ram",
    "jai shree krishna",
    "jai shree ram",
    "how are you",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "om namah shivaya",
    "hare krishna",
];

/// Terms that suggest a philosophically dense question.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "philosophy", "metaphysics", "consciousness", "reality", "existence", "brahman", "atman",
    "moksha", "dharma", "karma", "reincarnation", "enlightenment", "liberation", "advaita",
    "dvaita", "vishishtadvaita", "samkhya", "vedanta", "nyaya", "vaisheshika", "mimamsa",
    "monism", "dualism", "non-dualism", "epistemology", "ontology", "cosmology", "eschatology",
    "purusharthas", "purusha", "prakriti", "gunas", "sattva", "rajas", "tamas", "samsara",
    "nirvana", "yoga", "meditation", "samadhi", "chakras", "kundalini", "tantra", "mantra",
    "yantra", "yagna", "sacrifice", "ritual", "sadhana", "jnana", "bhakti", "karma yoga",
    "raja yoga", "spiritual", "transcendental",
];

/// Category ids in the order the prompt is scanned for them.
const PROMPT_CATEGORIES: [&str; 5] = ["vedas", "puranas", "epics", "knowledge", "characters"];

/// Categories that lean on the bigger Mistral models.
const DENSE_CATEGORIES: [&str; 2] = ["vedas", "knowledge"];

const MAX_SCORE: u8 = 5;

/// Whether `message` only warrants a brief reply.
///
/// True for greetings, questions of at most three words, and anything of at
/// most two words.
pub fn is_short_query(message: &str) -> bool {
    let cleaned = message.trim().to_lowercase();
    let words = cleaned.split_whitespace().count();
    GREETINGS.contains(&cleaned.as_str()) || (cleaned.ends_with('?') && words <= 3) || words <= 2
}

/// Heuristic read of one message.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnalysis {
    /// Category recovered from the system prompt, or "general"
    pub category: &'static str,
    pub word_count: usize,
    pub avg_sentence_length: f64,
    pub question_count: usize,
    pub has_questions: bool,
    pub is_multi_question: bool,
    pub has_domain_keyword: bool,
    /// 1 to 5
    pub complexity: u8,
}

impl QueryAnalysis {
    pub fn analyze(message: &str, system_prompt: &str) -> Self {
        let prompt = system_prompt.to_lowercase();
        let category = PROMPT_CATEGORIES
            .iter()
            .copied()
            .find(|c| prompt.contains(c))
            .unwrap_or("general");

        let word_count = message.split_whitespace().count();
        let avg_sentence_length = average_sentence_length(message);
        let question_count = message.matches('?').count();
        let lower = message.to_lowercase();
        let has_domain_keyword = DOMAIN_KEYWORDS.iter().any(|k| lower.contains(k));

        let mut score = 1u8;
        if avg_sentence_length > 15.0 {
            score += 1;
        }
        if word_count > 30 {
            score += 1;
        }
        if has_domain_keyword {
            score += 1;
        }
        if question_count > 1 {
            score += 1;
        }

        Self {
            category,
            word_count,
            avg_sentence_length,
            question_count,
            has_questions: question_count > 0,
            is_multi_question: question_count > 1,
            has_domain_keyword,
            complexity: score.min(MAX_SCORE),
        }
    }
}

/// Words per sentence, splitting on `.`, `!` and `?`.
fn average_sentence_length(text: &str) -> f64 {
    let lengths: Vec<usize> = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.split_whitespace().count())
        .collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Small,
    Medium,
    Large,
}

impl ModelTier {
    pub fn model(&self, family: ProviderFamily) -> &'static str {
        match (family, self) {
            (ProviderFamily::Mistral, Self::Small) => "mistral-small-latest",
            (ProviderFamily::Mistral, Self::Medium) => "mistral-medium-latest",
            (ProviderFamily::Mistral, Self::Large) => "mistral-large-latest",
            (ProviderFamily::Perplexity, Self::Small) => "llama-3.1-sonar-small-128k-online",
            (ProviderFamily::Perplexity, Self::Medium) => "llama-3.1-sonar-medium-128k-online",
            (ProviderFamily::Perplexity, Self::Large) => "llama-3.1-sonar-large-128k-online",
        }
    }
}

/// Model and request parameters for one chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationProfile {
    pub family: ProviderFamily,
    pub tier: ModelTier,
    pub model: &'static str,
    pub sampling: SamplingParams,
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub backoff_factor: f64,
    /// Per-attempt timeout
    pub timeout: Duration,
}

struct Row {
    tier: ModelTier,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    max_attempts: u32,
    backoff_factor: f64,
    timeout_secs: u64,
}

impl GenerationProfile {
    /// Pick the decision-table row for this request.
    pub fn select(family: ProviderFamily, analysis: &QueryAnalysis, short_query: bool) -> Self {
        let row = match family {
            ProviderFamily::Mistral => mistral_row(analysis, short_query),
            ProviderFamily::Perplexity => perplexity_row(analysis, short_query),
        };
        let (presence_penalty, frequency_penalty) = match family {
            ProviderFamily::Mistral => (0.1, 0.5),
            ProviderFamily::Perplexity => (0.3, 0.7),
        };

        Self {
            family,
            tier: row.tier,
            model: row.tier.model(family),
            sampling: SamplingParams {
                temperature: row.temperature,
                max_tokens: row.max_tokens,
                top_p: row.top_p,
                presence_penalty,
                frequency_penalty,
            },
            max_attempts: row.max_attempts,
            backoff_factor: row.backoff_factor,
            timeout: Duration::from_secs(row.timeout_secs),
        }
    }

    /// Family-specific request body fields.
    pub fn extra_body(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        match self.family {
            ProviderFamily::Mistral => {
                extra.insert("response_format".into(), json!({ "type": "text" }));
            }
            ProviderFamily::Perplexity => {
                extra.insert("return_citations".into(), Value::Bool(true));
            }
        }
        extra
    }
}

fn mistral_row(analysis: &QueryAnalysis, short_query: bool) -> Row {
    let dense = DENSE_CATEGORIES.contains(&analysis.category);
    if short_query {
        Row {
            tier: ModelTier::Small,
            max_tokens: 250,
            temperature: 0.67,
            top_p: 0.82,
            max_attempts: 2,
            backoff_factor: 1.5,
            timeout_secs: 15,
        }
    } else if (analysis.complexity >= 4 && dense) || analysis.is_multi_question {
        Row {
            tier: ModelTier::Large,
            max_tokens: 1500,
            temperature: 0.73,
            top_p: 0.91,
            max_attempts: 3,
            backoff_factor: 2.0,
            timeout_secs: 35,
        }
    } else if analysis.complexity >= 3 || dense {
        Row {
            tier: ModelTier::Medium,
            max_tokens: 1200,
            temperature: 0.70,
            top_p: 0.88,
            max_attempts: 3,
            backoff_factor: 1.75,
            timeout_secs: 30,
        }
    } else {
        Row {
            tier: ModelTier::Small,
            max_tokens: 800,
            temperature: 0.68,
            top_p: 0.85,
            max_attempts: 2,
            backoff_factor: 1.5,
            timeout_secs: 25,
        }
    }
}

fn perplexity_row(analysis: &QueryAnalysis, short_query: bool) -> Row {
    if short_query {
        Row {
            tier: ModelTier::Small,
            max_tokens: 200,
            temperature: 0.45,
            top_p: 0.9,
            max_attempts: 2,
            backoff_factor: 1.5,
            timeout_secs: 12,
        }
    } else if analysis.complexity >= 4 {
        Row {
            tier: ModelTier::Large,
            max_tokens: 1500,
            temperature: 0.55,
            top_p: 0.92,
            max_attempts: 3,
            backoff_factor: 2.0,
            timeout_secs: 35,
        }
    } else {
        Row {
            tier: ModelTier::Medium,
            max_tokens: 1000,
            temperature: 0.5,
            top_p: 0.9,
            max_attempts: 2,
            backoff_factor: 1.75,
            timeout_secs: 25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(category: &'static str, complexity: u8, multi: bool) -> QueryAnalysis {
        QueryAnalysis {
            category,
            word_count: 10,
            avg_sentence_length: 10.0,
            question_count: if multi { 2 } else { 1 },
            has_questions: true,
            is_multi_question: multi,
            has_domain_keyword: false,
            complexity,
        }
    }

    #[test]
    fn greetings_and_tiny_messages_are_short() {
        assert!(is_short_query("Namaste"));
        assert!(is_short_query("  Jai Shree Krishna "));
        assert!(is_short_query("how are you"));
        assert!(is_short_query("who is Hanuman?"));
        assert!(is_short_query("tell more"));
        assert!(is_short_query(""));
    }

    #[test]
    fn real_questions_are_not_short() {
        assert!(!is_short_query("what is the meaning of dharma?"));
        assert!(!is_short_query("tell me about Arjuna"));
    }

    #[test]
    fn score_starts_at_one() {
        let a = QueryAnalysis::analyze("tell me a story", "");
        assert_eq!(a.complexity, 1);
        assert_eq!(a.category, "general");
        assert!(!a.has_questions);
    }

    #[test]
    fn each_signal_adds_one() {
        let keyword = QueryAnalysis::analyze("explain moksha briefly", "");
        assert_eq!(keyword.complexity, 2);

        let questions = QueryAnalysis::analyze("who? why?", "");
        assert_eq!(questions.question_count, 2);
        assert!(questions.is_multi_question);
        assert_eq!(questions.complexity, 2);

        let long_sentence = "word ".repeat(16);
        let a = QueryAnalysis::analyze(&long_sentence, "");
        assert!(a.avg_sentence_length > 15.0);
        assert_eq!(a.complexity, 2);

        let many_short = "one two three. ".repeat(11);
        let a = QueryAnalysis::analyze(&many_short, "");
        assert_eq!(a.word_count, 33);
        assert_eq!(a.complexity, 2);
    }

    #[test]
    fn score_caps_at_five() {
        let msg = format!("{} about dharma? and karma? and moksha?", "word ".repeat(40));
        let a = QueryAnalysis::analyze(&msg, "");
        assert_eq!(a.complexity, 5);
    }

    #[test]
    fn keywords_in_prompt_do_not_count() {
        let a = QueryAnalysis::analyze("tell me a story", "you explain dharma and yoga");
        assert!(!a.has_domain_keyword);
        assert_eq!(a.complexity, 1);
    }

    #[test]
    fn category_is_first_id_found_in_prompt() {
        let a = QueryAnalysis::analyze("hi", "You know the Puranas and the epics");
        assert_eq!(a.category, "puranas");
    }

    #[test]
    fn mistral_short_query_row() {
        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("vedas", 5, true), true);
        assert_eq!(p.model, "mistral-small-latest");
        assert_eq!(p.sampling.max_tokens, 250);
        assert_eq!(p.max_attempts, 2);
        assert_eq!(p.timeout, Duration::from_secs(15));
        assert!((p.sampling.presence_penalty - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn mistral_large_for_dense_or_multi_question() {
        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("knowledge", 4, false), false);
        assert_eq!(p.tier, ModelTier::Large);
        assert_eq!(p.model, "mistral-large-latest");

        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("epics", 2, true), false);
        assert_eq!(p.tier, ModelTier::Large);
        assert_eq!(p.sampling.max_tokens, 1500);
        assert!((p.backoff_factor - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mistral_medium_and_small() {
        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("epics", 4, false), false);
        assert_eq!(p.tier, ModelTier::Medium);

        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("vedas", 1, false), false);
        assert_eq!(p.tier, ModelTier::Medium);
        assert_eq!(p.timeout, Duration::from_secs(30));

        let p = GenerationProfile::select(ProviderFamily::Mistral, &analysis("epics", 2, false), false);
        assert_eq!(p.tier, ModelTier::Small);
        assert_eq!(p.sampling.max_tokens, 800);
    }

    #[test]
    fn perplexity_rows() {
        let short = GenerationProfile::select(ProviderFamily::Perplexity, &analysis("epics", 5, true), true);
        assert_eq!(short.model, "llama-3.1-sonar-small-128k-online");
        assert_eq!(short.timeout, Duration::from_secs(12));

        let large = GenerationProfile::select(ProviderFamily::Perplexity, &analysis("epics", 4, false), false);
        assert_eq!(large.tier, ModelTier::Large);

        let medium = GenerationProfile::select(ProviderFamily::Perplexity, &analysis("vedas", 3, true), false);
        assert_eq!(medium.tier, ModelTier::Medium);
        assert_eq!(medium.max_attempts, 2);
        assert!((medium.sampling.frequency_penalty - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn family_extras() {
        let mistral = GenerationProfile::select(ProviderFamily::Mistral, &analysis("epics", 1, false), false);
        assert_eq!(mistral.extra_body()["response_format"]["type"], "text");

        let pplx = GenerationProfile::select(ProviderFamily::Perplexity, &analysis("epics", 1, false), false);
        assert_eq!(pplx.extra_body()["return_citations"], true);
    }
}
