//! Final filtering and canonical ordering.

use std::cmp::Ordering;

use crate::criteria::FilterCriteria;
use crate::natural::natural_cmp;
use crate::pool::ResultSet;
use crate::record::ItemRecord;

type Predicate = fn(&FilterCriteria, &ItemRecord) -> bool;

/// Applied in order. Player count is not here: it is enforced during
/// acquisition.
const STAGES: [(&str, Predicate); 3] = [
    ("complexity", meets_complexity),
    ("age", meets_age),
    ("rating", meets_rating),
];

/// Games without a complexity score never pass.
fn meets_complexity(criteria: &FilterCriteria, record: &ItemRecord) -> bool {
    record
        .complexity
        .is_some_and(|weight| weight >= criteria.min_complexity)
}

/// Games without a parseable minimum age never pass.
fn meets_age(criteria: &FilterCriteria, record: &ItemRecord) -> bool {
    record
        .min_age_years()
        .is_some_and(|age| age >= f64::from(criteria.min_age))
}

/// Only checked when a minimum rating is configured; unrated games pass.
fn meets_rating(criteria: &FilterCriteria, record: &ItemRecord) -> bool {
    match (criteria.min_rating, record.rating) {
        (Some(min), Some(rating)) => rating >= min,
        _ => true,
    }
}

/// Orders by primary rank, numbers by value. Unranked games go last.
pub fn compare_rank(a: &ItemRecord, b: &ItemRecord) -> Ordering {
    match (a.primary_rank(), b.primary_rank()) {
        (Some(a), Some(b)) => natural_cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Turns a result set into the list shown to readers.
#[derive(Debug, Clone)]
pub struct Curator {
    criteria: FilterCriteria,
}

impl Curator {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Whether a record passes every filter stage.
    pub fn accepts(&self, record: &ItemRecord) -> bool {
        STAGES
            .iter()
            .all(|(_, predicate)| predicate(&self.criteria, record))
    }

    /// Filters the records, then sorts them by primary rank. The sort is
    /// stable, so equal ranks keep their result-set order.
    pub fn curate(&self, records: ResultSet) -> Vec<ItemRecord> {
        let mut kept = records;
        for (name, predicate) in STAGES.iter() {
            let before = kept.len();
            kept.retain(|record| predicate(&self.criteria, record));
            tracing::debug!("{} filter: {} -> {}", name, before, kept.len());
        }
        kept.sort_by(compare_rank);
        tracing::info!(
            "Filtered down to {} games after applying complexity/age/etc.",
            kept.len()
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RankEntry;

    fn game(name: &str, rank: Option<&str>, weight: f64, age: &str, rating: Option<f64>) -> ItemRecord {
        ItemRecord {
            name: Some(name.into()),
            min_age: Some(age.into()),
            complexity: Some(weight),
            rating,
            rank_info: rank.map(|r| {
                vec![RankEntry {
                    rank: Some(r.into()),
                    ..Default::default()
                }]
            }),
            ..Default::default()
        }
    }

    fn names(records: &[ItemRecord]) -> Vec<&str> {
        records.iter().map(ItemRecord::display_name).collect()
    }

    #[test]
    fn sorts_ranks_numerically() {
        let curator = Curator::new(FilterCriteria::default());
        let out = curator.curate(vec![
            game("two", Some("2"), 3.0, "14", None),
            game("ten", Some("10"), 3.0, "14", None),
            game("nine", Some("9"), 3.0, "14", None),
        ]);
        assert_eq!(names(&out), vec!["two", "nine", "ten"]);
    }

    #[test]
    fn drops_light_and_young_games() {
        let curator = Curator::new(FilterCriteria::default());
        let out = curator.curate(vec![
            game("light", Some("1"), 1.5, "14", None),
            game("young", Some("2"), 3.0, "8", None),
            game("exact", Some("3"), 2.25, "12", None),
        ]);
        assert_eq!(names(&out), vec!["exact"]);
    }

    #[test]
    fn missing_complexity_or_age_is_excluded() {
        let curator = Curator::new(FilterCriteria::default());
        let mut no_weight = game("no weight", Some("1"), 3.0, "14", None);
        no_weight.complexity = None;
        let mut no_age = game("no age", Some("2"), 3.0, "14", None);
        no_age.min_age = Some("n/a".into());
        assert!(curator.curate(vec![no_weight, no_age]).is_empty());
    }

    #[test]
    fn rating_threshold_applies_only_when_rated() {
        let curator = Curator::new(FilterCriteria {
            min_rating: Some(7.0),
            ..Default::default()
        });
        let out = curator.curate(vec![
            game("low", Some("1"), 3.0, "14", Some(6.5)),
            game("unrated", Some("2"), 3.0, "14", None),
            game("high", Some("3"), 3.0, "14", Some(7.9)),
        ]);
        assert_eq!(names(&out), vec!["unrated", "high"]);
    }

    #[test]
    fn rating_is_ignored_without_threshold() {
        let curator = Curator::new(FilterCriteria::default());
        assert!(curator.accepts(&game("low", Some("1"), 3.0, "14", Some(2.0))));
    }

    #[test]
    fn unranked_games_go_last_and_ties_keep_order() {
        let curator = Curator::new(FilterCriteria::default());
        let out = curator.curate(vec![
            game("unranked", None, 3.0, "14", None),
            game("first tie", Some("5"), 3.0, "14", None),
            game("not ranked", Some("Not Ranked"), 3.0, "14", None),
            game("second tie", Some("5"), 3.0, "14", None),
            game("top", Some("1"), 3.0, "14", None),
        ]);
        assert_eq!(
            names(&out),
            vec!["top", "first tie", "second tie", "not ranked", "unranked"]
        );
    }

    #[test]
    fn every_output_record_meets_thresholds() {
        let criteria = FilterCriteria {
            min_rating: Some(7.0),
            ..Default::default()
        };
        let curator = Curator::new(criteria.clone());
        let mut input = Vec::new();
        for i in 0..40u32 {
            input.push(game(
                &format!("g{}", i),
                Some(&(40 - i).to_string()),
                1.0 + (i % 5) as f64 * 0.8,
                &(6 + i % 10).to_string(),
                if i % 3 == 0 { None } else { Some(5.0 + (i % 6) as f64) },
            ));
        }
        let out = curator.curate(input);
        assert!(!out.is_empty());
        for record in &out {
            assert!(record.complexity.unwrap() >= criteria.min_complexity);
            assert!(record.min_age_years().unwrap() >= f64::from(criteria.min_age));
            assert!(record.rating.map_or(true, |r| r >= 7.0));
        }
        for pair in out.windows(2) {
            assert_ne!(compare_rank(&pair[0], &pair[1]), Ordering::Greater);
        }
    }
}
