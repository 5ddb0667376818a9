//! "What are you craving?" matching.
//!
//! A craving phrase is matched against a recipe's craving tags, name,
//! description and category, and through a [`MoodThesaurus`] that maps mood
//! words ("sweet", "comfort", ...) to keywords. Matching is unranked: the
//! result keeps the input order.

use crate::model::Recipe;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

mod thesaurus;

pub use thesaurus::MoodThesaurus;

/// Matches craving phrases against recipes.
#[derive(Debug, Clone, Default)]
pub struct CravingMatcher {
    thesaurus: MoodThesaurus,
}

impl CravingMatcher {
    pub fn new(thesaurus: MoodThesaurus) -> Self {
        CravingMatcher { thesaurus }
    }

    pub fn thesaurus(&self) -> &MoodThesaurus {
        &self.thesaurus
    }

    /// Recipes matching `phrase`, in input order.
    ///
    /// A blank phrase matches nothing.
    pub fn matches<'a>(
        &self,
        recipes: impl IntoIterator<Item = &'a Recipe>,
        phrase: &str,
    ) -> Vec<&'a Recipe> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return Vec::new();
        }

        let results: Vec<&Recipe> = recipes
            .into_iter()
            .filter(|recipe| self.is_match(recipe, &phrase))
            .collect();
        debug!(phrase = %phrase, matches = results.len(), "craving search");
        results
    }

    /// `phrase` must be trimmed, lower-cased and non-empty.
    fn is_match(&self, recipe: &Recipe, phrase: &str) -> bool {
        let name = recipe.name.to_lowercase();
        let category = recipe.category.as_str().to_lowercase();
        let description = recipe.description.as_deref().map(str::to_lowercase);

        let direct = recipe
            .cravings
            .iter()
            .any(|tag| tag.to_lowercase().contains(phrase))
            || name.contains(phrase)
            || description.as_deref().is_some_and(|d| d.contains(phrase))
            || category.contains(phrase);
        if direct {
            return true;
        }

        self.thesaurus.triggered_by(phrase).any(|keywords| {
            keywords.iter().any(|keyword| {
                category.contains(keyword.as_str())
                    || name.contains(keyword.as_str())
                    || description
                        .as_deref()
                        .is_some_and(|d| d.contains(keyword.as_str()))
            })
        })
    }
}

/// Progress of a delayed craving search, for a "searching" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Searching,
    /// Finished with this many matches
    Done(usize),
}

/// Runs craving matches behind a cosmetic delay.
///
/// The delay only affects when results are delivered. Status changes are
/// published on a watch channel so a UI can show a spinner.
#[derive(Debug)]
pub struct CravingSearch {
    matcher: CravingMatcher,
    delay: Duration,
    status: watch::Sender<SearchStatus>,
}

impl CravingSearch {
    pub fn new(matcher: CravingMatcher, delay: Duration) -> Self {
        let (status, _) = watch::channel(SearchStatus::Idle);
        CravingSearch {
            matcher,
            delay,
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SearchStatus {
        *self.status.borrow()
    }

    pub fn matcher(&self) -> &CravingMatcher {
        &self.matcher
    }

    /// Waits out the delay, then returns the same result as
    /// [`CravingMatcher::matches`].
    ///
    /// A blank phrase returns immediately without touching the status.
    pub async fn run<'a>(&self, recipes: &'a [Recipe], phrase: &str) -> Vec<&'a Recipe> {
        if phrase.trim().is_empty() {
            return Vec::new();
        }

        self.status.send_replace(SearchStatus::Searching);
        tokio::time::sleep(self.delay).await;
        let results = self.matcher.matches(recipes, phrase);
        self.status.send_replace(SearchStatus::Done(results.len()));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, sample_catalog};
    use indoc::indoc;

    fn matcher() -> CravingMatcher {
        CravingMatcher::default()
    }

    #[test]
    fn test_blank_phrase_matches_nothing() {
        let catalog = sample_catalog();
        assert!(matcher().matches(catalog.recipes(), "").is_empty());
        assert!(matcher().matches(catalog.recipes(), "   ").is_empty());
    }

    #[test]
    fn test_sweet_matches_dessert_through_mood() {
        let catalog = sample_catalog();
        let donut = catalog.recipe("donut").unwrap();
        assert!(donut.cravings.is_empty());
        assert!(donut.description.is_none());

        let results = matcher().matches(catalog.recipes(), "sweet");
        // Pancake comes in through the "cake" keyword
        assert_eq!(ids(results), vec!["donut", "pancake"]);
    }

    #[test]
    fn test_mood_needs_the_thesaurus() {
        let catalog = sample_catalog();
        let bare = CravingMatcher::new(MoodThesaurus::empty());
        assert!(bare.matches(catalog.recipes(), "sweet").is_empty());
    }

    #[test]
    fn test_matches_craving_tags() {
        let catalog = sample_catalog();
        assert_eq!(ids(matcher().matches(catalog.recipes(), "Savory")), vec!["soup"]);
        assert_eq!(ids(matcher().matches(catalog.recipes(), "fluff")), vec!["pancake"]);
    }

    #[test]
    fn test_matches_name_description_and_category() {
        let catalog = sample_catalog();
        assert_eq!(ids(matcher().matches(catalog.recipes(), "donut")), vec!["donut"]);
        assert_eq!(ids(matcher().matches(catalog.recipes(), "crisp")), vec!["salad"]);
        assert_eq!(ids(matcher().matches(catalog.recipes(), "DESSERT")), vec!["donut"]);
    }

    #[test]
    fn test_mood_phrases() {
        let catalog = sample_catalog();
        // "comfort": Main category and "warm" in the soup description
        assert_eq!(ids(matcher().matches(catalog.recipes(), "comfort food")), vec!["soup"]);
        // "refreshing": "cold" in the salad description
        assert_eq!(ids(matcher().matches(catalog.recipes(), "refreshing")), vec!["salad"]);
        // "breakfast": category and "morning"
        assert_eq!(ids(matcher().matches(catalog.recipes(), "breakfast")), vec!["pancake"]);
        // "quick" and "snack" both trigger; "fast" is a substring of "breakfast"
        assert_eq!(
            ids(matcher().matches(catalog.recipes(), "a quick snack")),
            vec!["salad", "pancake"]
        );
    }

    #[test]
    fn test_results_keep_input_order() {
        let catalog = sample_catalog();
        let mut thesaurus = MoodThesaurus::empty();
        thesaurus.insert("anything", ["a", "o"]);
        let results = CravingMatcher::new(thesaurus).matches(catalog.recipes(), "anything");
        assert_eq!(ids(results), vec!["soup", "donut", "salad", "pancake"]);
    }

    #[test]
    fn test_custom_thesaurus_from_yaml() {
        let catalog = sample_catalog();
        let thesaurus: MoodThesaurus = serde_yaml::from_str(indoc! {"
            fruity: [pancake]
        "})
        .unwrap();
        let results = CravingMatcher::new(thesaurus).matches(catalog.recipes(), "something fruity");
        assert_eq!(ids(results), vec!["pancake"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_search_reports_status() {
        let catalog = sample_catalog();
        let search = CravingSearch::new(CravingMatcher::default(), Duration::from_millis(500));
        let status = search.subscribe();
        assert_eq!(search.status(), SearchStatus::Idle);

        let started = tokio::time::Instant::now();
        let results = search.run(catalog.recipes(), "sweet").await;

        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(
            ids(&results),
            ids(CravingMatcher::default().matches(catalog.recipes(), "sweet"))
        );
        assert_eq!(*status.borrow(), SearchStatus::Done(results.len()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_search_blank_phrase() {
        let catalog = sample_catalog();
        let search = CravingSearch::new(CravingMatcher::default(), Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        assert!(search.run(catalog.recipes(), " ").await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(search.status(), SearchStatus::Idle);
    }
}
