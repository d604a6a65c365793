use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Upserts categories by id; rows missing from `categories` are left alone.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;

    #[tokio::test]
    async fn migrations_seed_reference_categories() {
        let pool = memory_pool().await;

        let categories = get_all_categories(&pool).await.unwrap();

        let names: Vec<&str> = categories.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(
            names,
            ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        );
    }

    #[tokio::test]
    async fn missing_category_is_none() {
        let pool = memory_pool().await;

        assert!(get_category(&pool, 999).await.unwrap().is_none());
        assert_eq!(get_category(&pool, 3).await.unwrap().unwrap().kind, "Geography");
    }

    #[tokio::test]
    async fn import_renames_existing_and_adds_new() {
        let pool = memory_pool().await;

        import_categories(
            &pool,
            vec![
                Category {
                    id: 2,
                    kind: "Fine Art".to_owned(),
                },
                Category {
                    id: 7,
                    kind: "Music".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 7);
        assert_eq!(get_category(&pool, 2).await.unwrap().unwrap().kind, "Fine Art");
        assert_eq!(get_category(&pool, 7).await.unwrap().unwrap().kind, "Music");
    }

    #[test]
    fn category_serializes_label_as_type() {
        let category = Category {
            id: 1,
            kind: "Science".to_owned(),
        };

        let json = serde_json::to_value(&category).unwrap();

        assert_eq!(json, serde_json::json!({"id": 1, "type": "Science"}));
    }
}
