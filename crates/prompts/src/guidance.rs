//! Topic guidance: long-form instructions for well-known topics.
//!
//! Raw topic strings arrive in many spellings (`rigveda-general`, `Rig Veda`,
//! `bhagwat`), so resolution goes through an alias table onto canonical ids
//! before the `(category, canonical)` guidance lookup.

use vedaguru_core::TopicMatching;

pub const SPECIALIZED_HEADING: &str = "SPECIALIZED GUIDANCE FOR THIS SPECIFIC TOPIC:";
pub const RELATED_HEADING: &str = "RELATED TOPIC GUIDANCE:";

/// How a topic reached its guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidanceMatch {
    /// Alias or canonical id resolved exactly
    Exact,
    /// Substring containment against a canonical id of the same category
    Related,
}

/// Resolved guidance for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicGuidance {
    pub canonical: &'static str,
    pub matched: GuidanceMatch,
    pub text: &'static str,
}

impl TopicGuidance {
    /// The block appended to the system prompt.
    pub fn render(&self) -> String {
        let heading = match self.matched {
            GuidanceMatch::Exact => SPECIALIZED_HEADING,
            GuidanceMatch::Related => RELATED_HEADING,
        };
        format!("{heading}\n{}", self.text)
    }
}

/// Raw spelling → canonical topic id.
static ALIASES: &[(&str, &str)] = &[
    // vedas
    ("rigveda", "rigveda"),
    ("rig_veda", "rigveda"),
    ("rig", "rigveda"),
    ("samaveda", "samaveda"),
    ("sama_veda", "samaveda"),
    ("sama", "samaveda"),
    ("yajurveda", "yajurveda"),
    ("yajur_veda", "yajurveda"),
    ("yajur", "yajurveda"),
    ("atharvaveda", "atharvaveda"),
    ("atharva_veda", "atharvaveda"),
    ("atharva", "atharvaveda"),
    ("upanishads", "upanishads"),
    ("upanishad", "upanishads"),
    // puranas
    ("bhagwat", "bhagavata_purana"),
    ("bhagwat_puran", "bhagavata_purana"),
    ("bhagavata", "bhagavata_purana"),
    ("bhagavata_purana", "bhagavata_purana"),
    ("srimad_bhagavatam", "bhagavata_purana"),
    ("bhagavatam", "bhagavata_purana"),
    ("dashavatara", "dashavatara"),
    ("dasavatar", "dashavatara"),
    ("dashavatar", "dashavatara"),
    ("avataras", "dashavatara"),
    ("avatars", "dashavatara"),
    ("vishnu_avatars", "dashavatara"),
    // epics
    ("ramayana", "ramayana"),
    ("ramayan", "ramayana"),
    ("ram_charit_manas", "ramayana"),
    ("mahabharata", "mahabharata"),
    ("mahabharat", "mahabharata"),
    ("bhagavad_gita", "bhagavad_gita"),
    ("bhagavad", "bhagavad_gita"),
    ("bhagwat_geeta", "bhagavad_gita"),
    ("gita", "bhagavad_gita"),
    ("bhagavadgita", "bhagavad_gita"),
    // knowledge
    ("yoga", "yoga"),
    ("yoga_sutras", "yoga"),
    ("patanjali", "yoga"),
    ("hatha_yoga", "yoga"),
    ("ashtanga_yoga", "yoga"),
    ("vedanta", "vedanta"),
    ("advaita", "vedanta"),
    ("advaita_vedanta", "vedanta"),
    ("dvaita", "vedanta"),
    ("vishishtadvaita", "vedanta"),
    // characters
    ("krishna", "krishna"),
    ("krshna", "krishna"),
    ("shrikrishna", "krishna"),
    ("shri_krishna", "krishna"),
    ("krsna", "krishna"),
    ("kanhaiya", "krishna"),
    ("shiva", "shiva"),
    ("mahadev", "shiva"),
    ("rudra", "shiva"),
    ("bholenath", "shiva"),
    ("lord_shiva", "shiva"),
];

/// `(category, canonical topic, guidance)`.
///
/// Text under one category never names another category id.
static GUIDANCE: &[(&str, &str, &str)] = &[
    (
        "vedas",
        "upanishads",
        "\
For questions about the Upanishads, treat them as the jnana-kanda of the Vedic corpus and the root of Vedanta. Cover:

• The difference between shruti (revealed) and smriti (remembered) texts
• The principal Upanishads: Brihadaranyaka, Chandogya, Aitareya, Taittiriya, Isha, Kena, Katha, Prashna, Mundaka, Mandukya
• Later Upanishads such as Shvetashvatara, Kaushitaki and Mahanarayana
• The identity of Atman and Brahman, and neti-neti as a way of pointing at the ineffable
• The four mahavakyas: Prajnanam Brahma, Aham Brahmasmi, Tat Tvam Asi, Ayam Atma Brahma
• The states of consciousness: jagrat, svapna, sushupti and turiya
• Maya and its relation to ultimate reality

Cite the specific Upanishad with verse numbers and give the Sanskrit for key passages.
",
    ),
    (
        "vedas",
        "rigveda",
        "\
For questions about the Rigveda, the oldest Vedic text, balance its history with its spiritual meaning. Cover:

• Structure: 10 mandalas, 1,028 suktas and roughly 10,600 mantras
• Layers: the family books (2-7), the early books (1, 8, 9) and the late book (10)
• Principal deities: Indra, Agni, Soma, Varuna, Mitra, the Ashvins, Ushas, Surya, Vayu
• Key hymns: Purusha Sukta (10.90), Nasadiya Sukta (10.129), Hiranyagarbha Sukta (10.121)
• The saptarishis and the hymns attributed to them
• Rita (cosmic order), yajna (sacrifice) and Brahman

Cite hymns as mandala.sukta.mantra (Rigveda 1.1.1) with the Sanskrit and a faithful translation. Give both the literal reading and the inner meaning found in commentators such as Sayana and Dayananda Saraswati.
",
    ),
    (
        "vedas",
        "samaveda",
        "\
For questions about the Samaveda, stress its musical and liturgical role. Cover:

• About 1,875 verses, nearly all of them drawn from the Rigveda
• The samans: melodies for singing Rigvedic hymns during ritual
• The Purvarchika and Uttararchika divisions
• Its place as the Veda of melody (गानवेद) and a source of Indian classical music
• The three recitation tones: udatta, anudatta and svarita
• Its use in the Soma sacrifice and the role of the Udgatar priests

Bring out why sacred sound matters and how melody deepens the force of a mantra.
",
    ),
    (
        "puranas",
        "bhagavata_purana",
        "\
For questions about the Bhagavata Purana (Srimad Bhagavatam), emphasise its central place in the bhakti tradition. Cover:

• Structure: 12 skandhas, 335 adhyayas and about 18,000 shlokas
• Its focus on Krishna as the fullest manifestation of Vishnu
• The tenth skandha: Krishna's childhood lilas and the rasa-lila
• Kapila's Sankhya (third skandha) and the Chatur-shloki Bhagavata (2.9.32-35)
• Its weight in Vaishnava schools, Gaudiya Vaishnavism above all
• Commentators: Sridhara Svami, Sanatana Gosvami, Jiva Gosvami, Visvanatha Chakravarti
• Uttama-bhakti, pure devotional service

Tie every philosophical point back to devotional practice, and quote key verses such as the definition of bhakti (3.29.12-13) with an accurate translation.
",
    ),
    (
        "puranas",
        "dashavatara",
        "\
For questions about the Dashavatara, the ten principal avatars of Vishnu, treat each one in turn:

1. Matsya: the flood and the rescue of the sacred texts
2. Kurma: the churning of the ocean (Samudra Manthan)
3. Varaha: raising the Earth and the defeat of Hiranyaksha
4. Narasimha: Prahlada and the end of Hiranyakashipu
5. Vamana: King Bali and the three strides
6. Parashurama: the conflict with the warrior class
7. Rama: the ideal king and the embodiment of dharma
8. Krishna: the purna-avatara and his many lilas
9. Buddha: how the Puranic account differs from the Buddhist one
10. Kalki: the avatar still to come at the end of the Kali Yuga

Also give the scriptural source for each avatar, the evolutionary reading of the sequence, regional variations in the list, and the meaning of divine descent itself. Quote the Bhagavata, Vishnu and Garuda Puranic texts where relevant.
",
    ),
    (
        "epics",
        "bhagavad_gita",
        "\
For questions about the Bhagavad Gita, give a thorough analysis. Cover:

• Its setting in the Bhishma Parva of the Mahabharata, on the field of Kurukshetra
• 18 chapters and 700 verses, read as three groups of six
• Karma Yoga (chapters 2-6), Bhakti Yoga (7-12) and Jnana Yoga (13-18)
• Dharma, the three gunas, the field and its knower, divine and demonic natures
• The universal form revealed in chapter 11
• Key verses: 2.47, 4.7-8, 9.22 and 18.66

For any verse, give the Sanskrit with diacritics, the reference (BG 2.47), a word-by-word gloss where useful, and readings from at least two commentarial schools: Advaita (Shankara), Vishishtadvaita (Ramanuja), Dvaita (Madhva) or Achintya Bheda Abheda.

Connect the teaching to daily life without losing its transcendent context.
",
    ),
    (
        "epics",
        "ramayana",
        "\
For questions about the Ramayana, cover the whole epic:

• Valmiki, the adikavi, as its traditional author
• Seven kandas and about 24,000 verses: Bala, Ayodhya, Aranya, Kishkindha, Sundara, Yuddha and Uttara (which some scholars consider later)
• Rama as ideal son, husband, brother and king; Sita's strength and purity; Hanuman's selfless devotion; Lakshmana's loyalty; Ravana as a complex antagonist
• Regional retellings: Tulsidas' Ramcharitmanas, the Kamba Ramayanam, the Krittivasi Ramayana
• Readings as history, as spiritual allegory and as an inner journey

Quote Valmiki with kanda, sarga and shloka numbers, and explain both the story and its symbolism.
",
    ),
    (
        "knowledge",
        "yoga",
        "\
For questions about Yoga, present it as a complete spiritual and philosophical system:

• Vedic roots in tapas and dhyana; Patanjali's Yoga Sutras; the Hatha texts (Hatha Yoga Pradipika, Gheranda Samhita, Shiva Samhita); its modern revival
• The paths: Raja, Hatha, Karma, Bhakti, Jnana, Mantra and Kundalini Yoga
• The eight limbs: yama, niyama, asana, pranayama, pratyahara, dharana, dhyana, samadhi
• Subtle anatomy: nadis, chakras and the pranas
• The shatkarmas and the purpose of different meditation techniques

Quote the Yoga Sutras, the Hatha Yoga Pradipika and the Bhagavad Gita with exact references, and cover both theory and practice.
",
    ),
    (
        "knowledge",
        "vedanta",
        "\
For questions about Vedanta, cover the system as a whole:

• The prasthanatrayi: the Upanishads, the Brahma Sutras and the Bhagavad Gita
• The schools and their positions: Advaita (Shankara), Vishishtadvaita (Ramanuja), Dvaita (Madhva), Achintya Bheda Abheda (Chaitanya), Shuddhadvaita (Vallabha), Dvaitadvaita (Nimbarka)
• Brahman, Atman and the jiva, maya and avidya, moksha and sadhana

Quote primary texts and commentaries with exact citations, and show what each position means in practice.
",
    ),
    (
        "characters",
        "krishna",
        "\
For questions about Lord Krishna, cover:

• His standing as Svayam Bhagavan in Gaudiya Vaishnavism and as the purna-avatara of Vishnu elsewhere
• His forms: Bala Krishna, Govinda, Parthasarathi
• His life: the early wonders (Putana, Kaliya), the Vrindavan lilas (rasa lila, lifting Govardhana, the butter thief), Mathura and the end of Kamsa, Dwaraka, his counsel to the Pandavas, and his final days in the Mausala Parva
• His teaching in the Bhagavad Gita and the Uddhava Gita, and the ideals of bhakti and prema
• Worship: Vrindavan, Mathura, Dwaraka, Puri and Udupi; bhajan, kirtan and arati; Janmashtami, Holi and Ratha Yatra; the Gaudiya, Pushti Marg and Nimbarka sampradayas

Quote the Bhagavata Purana, the Mahabharata, the Bhagavad Gita and the Harivamsa with exact references.
",
    ),
    (
        "characters",
        "shiva",
        "\
For questions about Lord Shiva, cover:

• Mahadeva of the Trimurti, Adiyogi and Dakshinamurti; Nataraja, Ardhanarishvara and Bhairava
• Iconography: the third eye, the crescent moon, the Ganga, the serpent, the trishula and the damaru
• Stories: his marriage to Parvati, the fall of Tripura, drinking the Halahala poison, the births of Kartikeya and Ganesha, the devotees Markandeya and Kannappa
• Philosophy: Shiva beyond qualities (nirguna), the five acts (panchakritya), and his union with Shakti
• Worship: Kashmir Shaivism, Shaiva Siddhanta and Virashaivism; the twelve Jyotirlingas, Kailash, Varanasi and Chidambaram; Mahashivaratri; abhishekam and the Om Namah Shivaya japa

Quote the Shiva Purana, the Linga Purana, the Sri Rudram, the Shvetashvatara Upanishad and the Thirumandiram with exact references.
",
    ),
];

/// Lowercase, trim, and map spaces and hyphens to underscores.
pub fn normalize(topic: &str) -> String {
    topic.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Canonical id for a raw topic spelling, if the alias table knows it.
pub fn canonical(topic: &str) -> Option<&'static str> {
    let normalized = normalize(topic);
    let base = normalized.strip_suffix("_general").unwrap_or(&normalized);
    alias(base).or_else(|| alias(&normalized))
}

fn alias(key: &str) -> Option<&'static str> {
    ALIASES.iter().find(|(raw, _)| *raw == key).map(|(_, c)| *c)
}

fn lookup(category: &str, canonical: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    GUIDANCE
        .iter()
        .find(|(cat, topic, _)| *cat == category && *topic == canonical)
}

/// Resolve guidance for `(category, topic)`.
///
/// Alias match first, then the normalized topic as a canonical id, then
/// (fuzzy mode only) substring containment in either direction against the
/// canonical ids that have guidance in this category.
pub fn resolve(category: &str, topic: &str, matching: TopicMatching) -> Option<TopicGuidance> {
    let normalized = normalize(topic);
    if normalized.is_empty() {
        return None;
    }

    let exact = canonical(topic)
        .and_then(|c| lookup(category, c))
        .or_else(|| lookup(category, &normalized));
    if let Some(&(_, canonical, text)) = exact {
        return Some(TopicGuidance { canonical, matched: GuidanceMatch::Exact, text });
    }

    if matching == TopicMatching::Strict {
        return None;
    }

    GUIDANCE
        .iter()
        .filter(|(cat, _, _)| *cat == category)
        .find(|(_, key, _)| key.contains(normalized.as_str()) || normalized.contains(key))
        .map(|&(_, canonical, text)| {
            tracing::debug!(category, topic, canonical, "Related topic guidance matched");
            TopicGuidance { canonical, matched: GuidanceMatch::Related, text }
        })
}

/// Canonical topic ids that carry guidance in `category`.
pub fn guided_topics(category: &str) -> Vec<&'static str> {
    GUIDANCE
        .iter()
        .filter(|(cat, _, _)| *cat == category)
        .map(|(_, topic, _)| *topic)
        .collect()
}
