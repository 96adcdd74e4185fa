//! Static pattern tables used to synthesise suggestions.

/// Templates applied when the query is a single word. `{q}` is replaced
/// with the normalised query.
pub const SINGLE_WORD_TEMPLATES: &[&str] = &[
    "{q} tutorial",
    "how to {q}",
    "best {q}",
    "{q} explained",
    "{q} examples",
    "{q} guide",
    "what is {q}",
    "{q} for beginners",
    "{q} meaning",
    "{q} definition",
];

/// Templates applied to the full phrase when the query has several words.
pub const PHRASE_TEMPLATES: &[&str] = &[
    "{q} tutorial",
    "{q} guide",
    "{q} examples",
    "how to {q}",
    "best {q}",
    "{q} explained",
    "{q} online",
];

/// Suffixes appended to each leading sub-phrase of a multi-word query.
pub const PARTIAL_SUFFIXES: &[&str] = &["tutorial", "guide", "examples"];

/// Question starters. A query beginning with one is completed; any other
/// query gets the starter prepended.
pub const QUESTION_STARTERS: &[&str] = &[
    "what is",
    "how to",
    "why is",
    "what are",
    "how does",
    "when did",
    "where is",
    "who is",
    "which is",
    "can you",
    "how much",
    "how many",
    "how fast",
];

/// Words appended to the remainder of a query that already starts with a
/// question starter.
pub const QUESTION_COMPLETIONS: &[&str] = &["explained", "examples", "benefits", "work", "help"];

/// Adjectives prepended to the query.
pub const MODIFIERS: &[&str] = &[
    "best", "top", "latest", "new", "free", "cheap", "popular", "easy", "advanced", "online",
];

/// Verbs prepended to the query.
pub const ACTIONS: &[&str] = &[
    "learn", "build", "buy", "find", "make", "create", "download", "use", "compare", "install",
];

/// Words appended after the query when its last word is long enough.
pub const TAIL_EXTENSIONS: &[&str] = &[
    "tutorial", "basics", "vs", "2024", "guide", "examples", "tips", "course", "pdf", "free",
];

/// Topic triggers and the fixed suggestions they boost. A trigger matches
/// when it is a substring of the normalised query.
pub const TOPIC_BOOSTS: &[(&str, &[&str])] = &[
    (
        "ai",
        &[
            "artificial intelligence explained",
            "machine learning basics",
            "ai tools for productivity",
        ],
    ),
    (
        "programming",
        &[
            "programming languages for beginners",
            "learn to code online",
            "software development best practices",
        ],
    ),
    (
        "business",
        &[
            "how to start a business",
            "business plan template",
            "small business ideas",
        ],
    ),
    (
        "health",
        &[
            "healthy eating tips",
            "daily exercise routine",
            "mental health resources",
        ],
    ),
    (
        "travel",
        &[
            "cheap travel destinations",
            "travel packing checklist",
            "best time to travel",
        ],
    ),
    (
        "finance",
        &[
            "personal finance basics",
            "how to invest money",
            "budgeting tips",
        ],
    ),
    (
        "crypto",
        &[
            "cryptocurrency explained",
            "how blockchain works",
            "crypto wallet setup",
        ],
    ),
    (
        "web",
        &[
            "web development roadmap",
            "html css javascript basics",
            "web design inspiration",
        ],
    ),
];

/// Fill a `{q}` template.
pub fn fill(template: &str, query: &str) -> String {
    template.replace("{q}", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_a_placeholder() {
        for template in SINGLE_WORD_TEMPLATES.iter().chain(PHRASE_TEMPLATES) {
            assert!(template.contains("{q}"), "missing placeholder: {template}");
        }
    }

    #[test]
    fn question_starters_include_bounds() {
        assert_eq!(QUESTION_STARTERS.first(), Some(&"what is"));
        assert_eq!(QUESTION_STARTERS.last(), Some(&"how fast"));
    }

    #[test]
    fn topic_triggers_are_lowercase_and_unique() {
        let mut seen = Vec::new();
        for (trigger, suggestions) in TOPIC_BOOSTS {
            assert_eq!(*trigger, trigger.to_lowercase());
            assert!(!seen.contains(trigger));
            assert!(!suggestions.is_empty());
            seen.push(*trigger);
        }
    }

    #[test]
    fn fill_replaces_placeholder() {
        assert_eq!(fill("how to {q}", "bake bread"), "how to bake bread");
    }
}
