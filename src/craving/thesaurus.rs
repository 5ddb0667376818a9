use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mood word → keywords that signal a recipe fits the mood.
///
/// Keywords are compared case-insensitively against a recipe's category,
/// name and description. Moods and keywords are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct MoodThesaurus {
    moods: BTreeMap<String, Vec<String>>,
}

const DEFAULT_MOODS: &[(&str, &[&str])] = &[
    ("sweet", &["Dessert", "candy", "cake", "donut", "ice-cream"]),
    ("comfort", &["Main", "soup", "hot", "warm"]),
    ("quick", &["Snack", "easy", "fast"]),
    ("hearty", &["Main", "burger", "sandwich"]),
    ("light", &["Snack", "salad"]),
    ("refreshing", &["smoothie", "salad", "cold"]),
    ("indulgent", &["Dessert", "rich", "decadent"]),
    ("healthy", &["salad", "smoothie"]),
    ("breakfast", &["Breakfast", "morning"]),
    ("snack", &["Snack", "bite", "quick"]),
];

impl Default for MoodThesaurus {
    fn default() -> Self {
        DEFAULT_MOODS
            .iter()
            .map(|(mood, keywords)| {
                (
                    mood.to_string(),
                    keywords.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

impl From<BTreeMap<String, Vec<String>>> for MoodThesaurus {
    fn from(table: BTreeMap<String, Vec<String>>) -> Self {
        let mut thesaurus = MoodThesaurus::empty();
        for (mood, keywords) in table {
            thesaurus.insert(&mood, keywords);
        }
        thesaurus
    }
}

impl From<MoodThesaurus> for BTreeMap<String, Vec<String>> {
    fn from(thesaurus: MoodThesaurus) -> Self {
        thesaurus.moods
    }
}

impl MoodThesaurus {
    pub fn empty() -> Self {
        MoodThesaurus {
            moods: BTreeMap::new(),
        }
    }

    /// Adds keywords to a mood, creating it if needed.
    pub fn insert<S: AsRef<str>>(&mut self, mood: &str, keywords: impl IntoIterator<Item = S>) {
        let mood = mood.trim().to_lowercase();
        if mood.is_empty() {
            return;
        }
        let entry = self.moods.entry(mood).or_default();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !entry.contains(&keyword) {
                entry.push(keyword);
            }
        }
    }

    /// Merges another table into this one; keywords are unioned per mood.
    pub fn extend(&mut self, other: MoodThesaurus) {
        for (mood, keywords) in other.moods {
            self.insert(&mood, keywords);
        }
    }

    pub fn keywords(&self, mood: &str) -> Option<&[String]> {
        self.moods.get(&mood.to_lowercase()).map(Vec::as_slice)
    }

    pub fn moods(&self) -> impl Iterator<Item = &str> {
        self.moods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }

    /// Keyword lists of every mood word that occurs in `phrase`.
    ///
    /// `phrase` must already be lower-cased.
    pub(crate) fn triggered_by<'a>(&'a self, phrase: &'a str) -> impl Iterator<Item = &'a [String]> + 'a {
        self.moods
            .iter()
            .filter(move |(mood, _)| phrase.contains(mood.as_str()))
            .map(|(_, keywords)| keywords.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_default_table() {
        let thesaurus = MoodThesaurus::default();
        assert_eq!(thesaurus.len(), 10);
        assert_eq!(
            thesaurus.keywords("sweet").unwrap(),
            &["dessert", "candy", "cake", "donut", "ice-cream"]
        );
        assert_eq!(thesaurus.keywords("SNACK").unwrap(), &["snack", "bite", "quick"]);
        assert!(thesaurus.keywords("savory").is_none());
    }

    #[test]
    fn test_triggered_by_substring() {
        let thesaurus = MoodThesaurus::default();
        let hits: Vec<_> = thesaurus.triggered_by("something sweet and quick").collect();
        assert_eq!(hits.len(), 2);
        assert!(thesaurus.triggered_by("savory").next().is_none());
    }

    #[test]
    fn test_insert_and_extend() {
        let mut thesaurus = MoodThesaurus::empty();
        thesaurus.insert("Savory", ["Main", "soup", "main"]);
        assert_eq!(thesaurus.keywords("savory").unwrap(), &["main", "soup"]);

        let mut extra = MoodThesaurus::empty();
        extra.insert("savory", ["pie"]);
        extra.insert("spicy", ["pepper"]);
        thesaurus.extend(extra);

        assert_eq!(thesaurus.keywords("savory").unwrap(), &["main", "soup", "pie"]);
        assert_eq!(thesaurus.moods().collect::<Vec<_>>(), vec!["savory", "spicy"]);
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = indoc! {"
            Cozy: [Soup, Warm]
            zesty:
              - lemon
        "};
        let thesaurus: MoodThesaurus = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(thesaurus.keywords("cozy").unwrap(), &["soup", "warm"]);
        assert_eq!(thesaurus.keywords("zesty").unwrap(), &["lemon"]);
    }
}
