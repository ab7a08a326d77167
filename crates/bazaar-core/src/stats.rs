//! Review statistics aggregation.
//!
//! Pure read-side computation over a product's review ratings; no mutation.

use serde::Serialize;
use utoipa::ToSchema;

/// Occurrence count for one rating value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: u64,
}

/// Aggregated rating statistics for a product's reviews.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewStats {
    pub total_reviews: u64,
    /// Buckets ordered by rating descending; ratings with zero occurrences
    /// are omitted.
    pub rating_counts: Vec<RatingBucket>,
    /// Arithmetic mean rating; 0.0 when there are no reviews.
    pub average_rating: f64,
}

impl ReviewStats {
    pub fn from_ratings(ratings: &[u8]) -> Self {
        let mut counts = [0u64; 6];
        for &r in ratings {
            if (1..=5).contains(&r) {
                counts[r as usize] += 1;
            }
        }

        let total: u64 = counts.iter().sum();
        let sum: u64 = counts
            .iter()
            .enumerate()
            .map(|(rating, count)| rating as u64 * count)
            .sum();

        let rating_counts = (1..=5u8)
            .rev()
            .filter(|&r| counts[r as usize] > 0)
            .map(|r| RatingBucket {
                rating: r,
                count: counts[r as usize],
            })
            .collect();

        ReviewStats {
            total_reviews: total,
            rating_counts,
            average_rating: if total == 0 {
                0.0
            } else {
                sum as f64 / total as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_mixed_ratings() {
        let stats = ReviewStats::from_ratings(&[5, 5, 4, 3]);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(
            stats.rating_counts,
            vec![
                RatingBucket { rating: 5, count: 2 },
                RatingBucket { rating: 4, count: 1 },
                RatingBucket { rating: 3, count: 1 },
            ]
        );
        assert!((stats.average_rating - 4.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty() {
        let stats = ReviewStats::from_ratings(&[]);
        assert_eq!(stats.total_reviews, 0);
        assert!(stats.rating_counts.is_empty());
        assert_eq!(stats.average_rating, 0.0);
    }

    #[test]
    fn test_stats_buckets_are_descending() {
        let stats = ReviewStats::from_ratings(&[1, 2, 3, 4, 5]);
        let ratings: Vec<u8> = stats.rating_counts.iter().map(|b| b.rating).collect();
        assert_eq!(ratings, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_stats_ignores_out_of_range() {
        let stats = ReviewStats::from_ratings(&[0, 6, 5]);
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.average_rating, 5.0);
    }
}
