use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn count_questions<'e, E>(executor: E) -> sqlx::Result<i64>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(executor)
    .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Rows `[offset, offset + limit)` of the catalog in id order.
pub async fn get_questions_window<'e, E>(
    executor: E,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Question>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        ORDER BY id
        LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no row with `id` existed.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let mut conn = pool.acquire().await?;

    let affected = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Upserts questions by id, keeping the ids from the import.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_pool, seed, seed_numbered};

    #[tokio::test]
    async fn window_is_ordered_by_id() {
        let pool = memory_pool().await;
        let ids = seed_numbered(&pool, 25).await;

        let window = get_questions_window(&pool, 20, 10).await.unwrap();

        let window_ids: Vec<i64> = window.iter().map(|q| q.id).collect();
        assert_eq!(window_ids, ids[20..]);
        assert_eq!(count_questions(&pool).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn count_and_window_share_a_transaction() {
        let pool = memory_pool().await;
        let ids = seed_numbered(&pool, 12).await;

        let mut tx = pool.begin().await.unwrap();
        let total = count_questions(&mut *tx).await.unwrap();
        let window = get_questions_window(&mut *tx, 10, 10).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(total, 12);
        let window_ids: Vec<i64> = window.iter().map(|q| q.id).collect();
        assert_eq!(window_ids, ids[10..]);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = memory_pool().await;
        let ids = seed(&pool, &[("Who?", "Me", 1, 2)]).await;

        assert!(delete_question(&pool, ids[0]).await.unwrap());
        assert!(!delete_question(&pool, ids[0]).await.unwrap());
        assert!(get_question_by_id(&pool, ids[0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_positive_difficulty_is_rejected() {
        let pool = memory_pool().await;

        let result = create_question(&pool, "Why?", "Because", 1, 0).await;

        assert!(result.is_err());
        assert_eq!(count_questions(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn category_filter_keeps_only_matching_rows() {
        let pool = memory_pool().await;
        seed(
            &pool,
            &[
                ("Boiling point of water?", "100C", 1, 1),
                ("Painter of Guernica?", "Picasso", 2, 2),
                ("Speed of light?", "c", 1, 3),
            ],
        )
        .await;

        let science = get_questions_for_category(&pool, 1).await.unwrap();

        assert_eq!(science.len(), 2);
        assert!(science.iter().all(|q| q.category == 1));
    }

    #[tokio::test]
    async fn import_keeps_ids_and_overwrites_existing() {
        let pool = memory_pool().await;
        let ids = seed(&pool, &[("Old text?", "old", 1, 1)]).await;

        import_questions(
            &pool,
            vec![
                Question {
                    id: ids[0],
                    question: "New text?".to_owned(),
                    answer: "new".to_owned(),
                    category: 4,
                    difficulty: 2,
                },
                Question {
                    id: 40,
                    question: "Imported?".to_owned(),
                    answer: "yes".to_owned(),
                    category: 5,
                    difficulty: 5,
                },
            ],
        )
        .await
        .unwrap();

        let updated = get_question_by_id(&pool, ids[0]).await.unwrap().unwrap();
        assert_eq!(updated.question, "New text?");
        assert_eq!(updated.category, 4);
        assert!(get_question_by_id(&pool, 40).await.unwrap().is_some());
        assert_eq!(get_all_questions(&pool).await.unwrap().len(), 2);
    }
}
