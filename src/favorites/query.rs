use super::store::Favorite;

/// Orderings for the favorites view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Title A-Z
    TitleAsc,
    /// Title Z-A
    TitleDesc,
    /// Newest timestamp first
    MostRecent,
    /// Oldest timestamp first
    Oldest,
}

/// Sort favorites by the given order
///
/// Pure over its input; title orders compare case-insensitively, time orders
/// compare the stored timestamps.
pub fn sort_favorites(mut favorites: Vec<Favorite>, order: SortOrder) -> Vec<Favorite> {
    match order {
        SortOrder::TitleAsc => favorites.sort_by(|a, b| title_key(a).cmp(&title_key(b))),
        SortOrder::TitleDesc => favorites.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
        SortOrder::MostRecent => favorites.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => favorites.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
    favorites
}

/// Favorites whose title contains the pattern, case-insensitive
///
/// An empty pattern matches everything. A record without a title never
/// matches a non-empty pattern.
pub fn filter_by_title(favorites: &[Favorite], pattern: &str) -> Vec<Favorite> {
    if pattern.is_empty() {
        return favorites.to_vec();
    }

    let needle = pattern.to_lowercase();
    favorites
        .iter()
        .filter(|f| {
            f.title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

fn title_key(favorite: &Favorite) -> String {
    favorite.title.as_deref().unwrap_or("").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    fn favorite(episode: &str, title: Option<&str>, day: u32) -> Favorite {
        Favorite {
            podcast_id: "p1".to_string(),
            season_id: "s1".to_string(),
            episode_id: episode.to_string(),
            title: title.map(String::from),
            show_title: None,
            season_title: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        }
    }

    fn titles(favorites: &[Favorite]) -> Vec<Option<&str>> {
        favorites.iter().map(|f| f.title.as_deref()).collect()
    }

    #[test]
    fn title_orders_are_exact_reverses() {
        let input = vec![
            favorite("e1", Some("Migration"), 1),
            favorite("e2", Some("antenna"), 2),
            favorite("e3", Some("Zenith"), 3),
        ];

        let asc = sort_favorites(input.clone(), SortOrder::TitleAsc);
        let mut desc = sort_favorites(input, SortOrder::TitleDesc);

        desc.reverse();
        assert_eq!(titles(&asc), titles(&desc));
        assert_eq!(
            titles(&asc),
            vec![Some("antenna"), Some("Migration"), Some("Zenith")]
        );
    }

    #[test]
    fn most_recent_puts_newest_first() {
        let input = vec![
            favorite("e1", Some("old"), 1),
            favorite("e2", Some("new"), 20),
            favorite("e3", Some("middle"), 10),
        ];

        let sorted = sort_favorites(input, SortOrder::MostRecent);
        assert_eq!(
            titles(&sorted),
            vec![Some("new"), Some("middle"), Some("old")]
        );
    }

    #[test]
    fn oldest_puts_earliest_first() {
        let input = vec![
            favorite("e1", Some("old"), 1),
            favorite("e2", Some("new"), 20),
        ];

        let sorted = sort_favorites(input, SortOrder::Oldest);
        assert_eq!(titles(&sorted), vec![Some("old"), Some("new")]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let input = vec![
            favorite("e1", Some("Pilot Episode"), 1),
            favorite("e2", Some("Finale"), 2),
        ];

        let matched = filter_by_title(&input, "pilot");
        assert_eq!(titles(&matched), vec![Some("Pilot Episode")]);
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let input = vec![
            favorite("e1", Some("Pilot Episode"), 1),
            favorite("e2", None, 2),
        ];

        assert_eq!(filter_by_title(&input, "").len(), 2);
    }

    #[test]
    fn missing_title_never_matches_a_nonempty_pattern() {
        let input = vec![favorite("e1", None, 1)];

        assert!(filter_by_title(&input, "anything").is_empty());
    }
}
