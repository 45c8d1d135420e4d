use sqlx::PgConnection;

use crate::ads::repo_types::{Advertisement, AdvertisementChanges, NewAdvertisement};

pub async fn find_by_id(
    conn: &mut PgConnection,
    id: i32,
) -> Result<Option<Advertisement>, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(
        r#"
        SELECT id, heading, description, date_creation, creator
        FROM advertisement
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Insert a new advertisement. A missing creator surfaces as a foreign-key violation.
pub async fn insert(
    conn: &mut PgConnection,
    adv: &NewAdvertisement,
) -> Result<Advertisement, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(
        r#"
        INSERT INTO advertisement (heading, description, creator)
        VALUES ($1, $2, $3)
        RETURNING id, heading, description, date_creation, creator
        "#,
    )
    .bind(&adv.heading)
    .bind(&adv.description)
    .bind(adv.creator)
    .fetch_one(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: i32,
    changes: &AdvertisementChanges,
) -> Result<Option<Advertisement>, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(
        r#"
        UPDATE advertisement SET
            heading = COALESCE($1, heading),
            description = COALESCE($2, description)
        WHERE id = $3
        RETURNING id, heading, description, date_creation, creator
        "#,
    )
    .bind(changes.heading.as_deref())
    .bind(changes.description.as_deref())
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM advertisement WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
