//! Rating aggregation
//!
//! Maintains the derived `average_rating` and `total_ratings` fields on
//! an article. Always a full recomputation from the current rating set,
//! never an incremental running average: overwritten ratings would make
//! an incremental accumulator drift.

use kb_common::Result;
use sqlx::SqlitePool;
use tracing::error;

/// Recompute and persist an article's rating aggregates from the full
/// current rating set. Empty set yields (0, 0). Both fields are written
/// in a single UPDATE.
pub async fn recompute(db: &SqlitePool, article_id: i64) -> Result<()> {
    let scores: Vec<i64> = sqlx::query_scalar("SELECT rating FROM ratings WHERE article_id = ?")
        .bind(article_id)
        .fetch_all(db)
        .await?;

    let total = scores.len() as i64;
    let average = if total == 0 {
        0.0
    } else {
        round_average(scores.iter().sum::<i64>() as f64 / total as f64)
    };

    sqlx::query("UPDATE articles SET average_rating = ?, total_ratings = ? WHERE id = ?")
        .bind(average)
        .bind(total)
        .bind(article_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Round a mean score to 2 decimal places, half-up (4.375 -> 4.38).
pub fn round_average(mean: f64) -> f64 {
    (mean * 100.0).round() / 100.0
}

/// Fire-and-log aggregate refresh.
///
/// Called after a rating write has already succeeded; a failed recompute
/// must not fail the submission response. The cached aggregate stays
/// stale until the next successful recomputation.
pub async fn refresh_best_effort(db: &SqlitePool, article_id: i64) {
    if let Err(e) = recompute(db, article_id).await {
        error!(
            "Failed to refresh rating aggregates for article {}: {}",
            article_id, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_average_two_places() {
        assert_eq!(round_average(4.25), 4.25);
        assert_eq!(round_average(10.0 / 3.0), 3.33);
        assert_eq!(round_average(14.0 / 3.0), 4.67);
        assert_eq!(round_average(0.0), 0.0);
    }

    #[test]
    fn test_round_average_half_up() {
        // Exact binary halves round away from zero
        assert_eq!(round_average(35.0 / 8.0), 4.38);
        assert_eq!(round_average(33.0 / 8.0), 4.13);
    }

    #[test]
    fn test_reference_scenario() {
        // Ratings [5, 5, 4, 3] -> 17 / 4 = 4.25
        assert_eq!(round_average(17.0 / 4.0), 4.25);
    }
}
