//! The topic catalog: categories, optional subcategories and their topics.
//!
//! Used to validate chat requests and to list what can be asked about.
//! Topic ids are only unique within a category (`brahma` is both a Purana
//! and a deity).

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Subcategory {
    pub id: &'static str,
    pub name: &'static str,
    pub topics: &'static [Topic],
}

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Topics directly under the category
    pub topics: &'static [Topic],
    pub subcategories: &'static [Subcategory],
}

/// A topic flattened together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category_id: &'static str,
    pub subcategory_id: Option<&'static str>,
}

const fn t(id: &'static str, name: &'static str) -> Topic {
    Topic { id, name }
}

static CATEGORIES: &[Category] = &[
    Category {
        id: "vedas",
        name: "Vedas",
        topics: &[],
        subcategories: &[
            Subcategory { id: "rigveda", name: "Rigveda", topics: &[t("rigveda-general", "Rigveda")] },
            Subcategory { id: "yajurveda", name: "Yajurveda", topics: &[t("yajurveda-general", "Yajurveda")] },
            Subcategory { id: "samaveda", name: "Samaveda", topics: &[t("samaveda-general", "Samaveda")] },
            Subcategory {
                id: "atharvaveda",
                name: "Atharvaveda",
                topics: &[t("atharvaveda-general", "Atharvaveda")],
            },
        ],
    },
    Category {
        id: "puranas",
        name: "Puranas",
        topics: &[
            t("bhagwat", "Bhagwat Puran"),
            t("bhavishya", "Bhavishya Puran"),
            t("brahma", "Brahma Puran"),
            t("brahmand", "Brahmand Puran"),
            t("garuda", "Garuda Puran"),
            t("kurma", "Kurma Puran"),
            t("ling", "Ling Puran"),
            t("markandya", "Markandya Puran"),
            t("matsya", "Matsya Puran"),
            t("narad", "Narad Puran"),
            t("padma", "Padma Puran"),
            t("shiv", "Shiv Puran"),
            t("skand", "Skand Puran"),
            t("brahmvaivatra", "BrahmVaivatra Puran"),
            t("vaman", "Vaman Puran"),
            t("varah", "Varah Puran"),
            t("vishnu", "Vishnu Puran"),
        ],
        subcategories: &[],
    },
    Category {
        id: "epics",
        name: "Epics",
        topics: &[
            t("mahabharata", "Mahabharata"),
            t("ramayana", "Ramayana"),
            t("ramcharitmanas", "Ramcharitmanas"),
            t("gita", "Gita"),
        ],
        subcategories: &[],
    },
    Category {
        id: "knowledge",
        name: "Knowledge",
        topics: &[t("ayurveda", "Ayurveda"), t("jyotish", "Jyotish")],
        subcategories: &[],
    },
    Category {
        id: "characters",
        name: "Characters",
        topics: &[],
        subcategories: &[
            Subcategory {
                id: "devas",
                name: "Devas",
                topics: &[
                    t("vishnu", "Lord Vishnu"),
                    t("shiva", "Lord Shiva"),
                    t("brahma", "Lord Brahma"),
                    t("indra", "Lord Indra"),
                    t("surya", "Lord Surya"),
                ],
            },
            Subcategory {
                id: "avatars",
                name: "Avatars",
                topics: &[
                    t("rama", "Lord Rama"),
                    t("krishna", "Lord Krishna"),
                    t("narasimha", "Lord Narasimha"),
                    t("vamana", "Lord Vamana"),
                    t("parashurama", "Lord Parashurama"),
                ],
            },
            Subcategory {
                id: "sages",
                name: "Sages",
                topics: &[
                    t("vashishtha", "Sage Vashishtha"),
                    t("vishwamitra", "Sage Vishwamitra"),
                    t("narada", "Sage Narada"),
                    t("vyasa", "Sage Vyasa"),
                    t("valmiki", "Sage Valmiki"),
                ],
            },
        ],
    },
];

/// All categories in display order.
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn subcategory(category_id: &str, subcategory_id: &str) -> Option<&'static Subcategory> {
    category(category_id)?
        .subcategories
        .iter()
        .find(|s| s.id == subcategory_id)
}

impl Category {
    /// Direct topics followed by subcategory topics.
    pub fn topic_infos(&'static self) -> impl Iterator<Item = TopicInfo> {
        let direct = self.topics.iter().map(move |topic| TopicInfo {
            id: topic.id,
            name: topic.name,
            category_id: self.id,
            subcategory_id: None,
        });
        let nested = self.subcategories.iter().flat_map(move |sub| {
            sub.topics.iter().map(move |topic| TopicInfo {
                id: topic.id,
                name: topic.name,
                category_id: self.id,
                subcategory_id: Some(sub.id),
            })
        });
        direct.chain(nested)
    }
}

/// Every topic across every category.
pub fn all_topics() -> Vec<TopicInfo> {
    CATEGORIES.iter().flat_map(Category::topic_infos).collect()
}

/// Look up a topic inside one category.
pub fn topic(category_id: &str, topic_id: &str) -> Option<TopicInfo> {
    category(category_id)?.topic_infos().find(|t| t.id == topic_id)
}

pub fn category_name(id: &str) -> &'static str {
    category(id).map(|c| c.name).unwrap_or("Unknown Category")
}

pub fn topic_name(category_id: &str, topic_id: &str) -> &'static str {
    topic(category_id, topic_id).map(|t| t.name).unwrap_or("Unknown Topic")
}
