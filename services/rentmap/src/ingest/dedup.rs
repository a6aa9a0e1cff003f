use crate::listing::Listing;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of the deduplication pass.
#[derive(Debug, Clone, Default)]
pub struct DedupResult {
    pub retained: Vec<Listing>,
    pub duplicates: usize,
}

impl DedupResult {
    pub fn is_clean(&self) -> bool {
        self.duplicates == 0
    }
}

/// Drop listings whose identifier was already seen, keeping the first
/// occurrence and the input order.
///
/// Listings without an identifier never collide and are always retained.
pub fn deduplicate(listings: impl IntoIterator<Item = Listing>) -> DedupResult {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = DedupResult::default();

    for listing in listings {
        let first_seen = match &listing.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        };
        if first_seen {
            result.retained.push(listing);
        } else {
            result.duplicates += 1;
        }
    }

    if !result.is_clean() {
        debug!("Discarded {} duplicate listings", result.duplicates);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let listings = vec![
            Listing::new(Some("a"), 100.0),
            Listing::new(Some("b"), 200.0),
            Listing::new(Some("a"), 999.0),
        ];

        let result = deduplicate(listings);
        assert_eq!(result.duplicates, 1);
        assert_eq!(
            result.retained,
            vec![Listing::new(Some("a"), 100.0), Listing::new(Some("b"), 200.0)]
        );
    }

    #[test]
    fn test_identifier_less_rows_are_kept() {
        let listings = vec![
            Listing::new(None, 100.0),
            Listing::new(None, 100.0),
            Listing::new(Some("a"), 300.0),
        ];

        let result = deduplicate(listings);
        assert!(result.is_clean());
        assert_eq!(result.retained.len(), 3);
    }

    #[test]
    fn test_order_preserved() {
        let listings = vec![
            Listing::new(Some("z"), 1.0),
            Listing::new(Some("y"), 2.0),
            Listing::new(Some("z"), 3.0),
            Listing::new(Some("x"), 4.0),
        ];
        let ids: Vec<_> = deduplicate(listings)
            .retained
            .into_iter()
            .filter_map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["z", "y", "x"]);
    }
}
