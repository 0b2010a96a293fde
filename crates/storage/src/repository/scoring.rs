use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{EpisodeScore, ScoringRule};

pub struct ScoringRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ScoringRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_rule(
        &self,
        season_id: Uuid,
        code: &str,
        points: i64,
        description: Option<&str>,
    ) -> Result<ScoringRule> {
        let rule = ScoringRule {
            rule_id: Uuid::new_v4(),
            season_id,
            code: code.to_string(),
            description: description.map(str::to_string),
            points,
        };

        sqlx::query(
            r#"
            INSERT INTO scoring_rules (rule_id, season_id, code, description, points)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rule.rule_id)
        .bind(rule.season_id)
        .bind(&rule.code)
        .bind(&rule.description)
        .bind(rule.points)
        .execute(self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn list_rules(&self, season_id: Uuid) -> Result<Vec<ScoringRule>> {
        let rules = sqlx::query_as::<_, ScoringRule>(
            r#"
            SELECT rule_id, season_id, code, description, points
            FROM scoring_rules
            WHERE season_id = ?
            ORDER BY code
            "#,
        )
        .bind(season_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rules)
    }

    /// Replace the episode's score set wholesale: delete everything, insert
    /// the new totals, all in one transaction. Partial failure rolls back to
    /// the previous complete set.
    pub async fn replace_episode_scores(
        &self,
        episode_id: Uuid,
        totals: &[(Uuid, i64)],
    ) -> Result<Vec<EpisodeScore>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM episode_scores WHERE episode_id = ?")
            .bind(episode_id)
            .execute(&mut *tx)
            .await?;

        let mut scores = Vec::with_capacity(totals.len());
        for (contestant_id, points) in totals {
            let score = EpisodeScore {
                score_id: Uuid::new_v4(),
                episode_id,
                contestant_id: *contestant_id,
                points: *points,
            };

            sqlx::query(
                r#"
                INSERT INTO episode_scores (score_id, episode_id, contestant_id, points)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(score.score_id)
            .bind(score.episode_id)
            .bind(score.contestant_id)
            .bind(score.points)
            .execute(&mut *tx)
            .await?;

            scores.push(score);
        }

        tx.commit().await?;
        Ok(scores)
    }

    pub async fn list_for_episode(&self, episode_id: Uuid) -> Result<Vec<EpisodeScore>> {
        let scores = sqlx::query_as::<_, EpisodeScore>(
            r#"
            SELECT score_id, episode_id, contestant_id, points
            FROM episode_scores
            WHERE episode_id = ?
            ORDER BY contestant_id
            "#,
        )
        .bind(episode_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }

    pub async fn list_for_season(&self, season_id: Uuid) -> Result<Vec<EpisodeScore>> {
        let scores = sqlx::query_as::<_, EpisodeScore>(
            r#"
            SELECT es.score_id, es.episode_id, es.contestant_id, es.points
            FROM episode_scores es
            INNER JOIN episodes e ON es.episode_id = e.episode_id
            WHERE e.season_id = ?
            ORDER BY e.number, es.contestant_id
            "#,
        )
        .bind(season_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }
}
