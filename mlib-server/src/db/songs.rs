//! Song metadata operations (`song_info`)

use mlib_common::db::{SongFilter, SongRecord, SongUpdate};
use mlib_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::{lyrics, song_not_found};
use crate::pagination::Page;

/// Insert one song row and return its generated id
///
/// Fails with `Conflict` when the (group, song) pair is already stored.
pub async fn create_song_info<'e, E>(
    executor: E,
    group: &str,
    song: &str,
    release_date: Option<&str>,
    link: Option<&str>,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO song_info (group_name, song, release_date, link) VALUES (?, ?, ?, ?)",
    )
    .bind(group)
    .bind(song)
    .bind(release_date)
    .bind(link)
    .execute(executor)
    .await
    .map_err(|e| conflict_or_database(e, group, song))?;

    Ok(result.last_insert_rowid())
}

fn conflict_or_database(err: sqlx::Error, group: &str, song: &str) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Conflict(format!("Song already exists: {} - {}", group, song))
        }
        _ => Error::Database(err),
    }
}

/// Insert a song together with its lyric lines in one transaction
pub async fn create_song(
    pool: &SqlitePool,
    group: &str,
    song: &str,
    release_date: Option<&str>,
    link: Option<&str>,
    lines: &[String],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let song_id = create_song_info(&mut *tx, group, song, release_date, link).await?;
    for verse in lines {
        lyrics::append_lyric_line(&mut *tx, song_id, verse).await?;
    }

    tx.commit().await?;
    debug!(song_id, lines = lines.len(), "Song stored");

    Ok(song_id)
}

/// Resolve the id of the song identified by (group, song)
pub async fn find_song_id<'e, E>(executor: E, group: &str, song: &str) -> Result<Option<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar(
        "SELECT id FROM song_info WHERE group_name = ? AND song = ?",
    )
    .bind(group)
    .bind(song)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

pub async fn song_exists(pool: &SqlitePool, group: &str, song: &str) -> Result<bool> {
    Ok(find_song_id(pool, group, song).await?.is_some())
}

/// List songs matching every filter field that is set
///
/// Newest release first; rows without a release date come last. Ties are
/// broken by id so consecutive pages never overlap.
pub async fn list_songs<'e, E>(executor: E, filter: &SongFilter, page: Page) -> Result<Vec<SongRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, group_name, song, release_date, link FROM song_info WHERE 1=1",
    );

    if let Some(group) = &filter.group {
        qb.push(" AND group_name = ").push_bind(group.as_str());
    }
    if let Some(song) = &filter.song {
        qb.push(" AND song = ").push_bind(song.as_str());
    }
    if let Some(link) = &filter.link {
        qb.push(" AND link = ").push_bind(link.as_str());
    }
    if let Some(release_date) = &filter.release_date {
        qb.push(" AND release_date = ").push_bind(release_date.as_str());
    }
    if let Some(start_date) = &filter.start_date {
        qb.push(" AND release_date >= ").push_bind(start_date.as_str());
    }
    if let Some(end_date) = &filter.end_date {
        qb.push(" AND release_date <= ").push_bind(end_date.as_str());
    }

    qb.push(" ORDER BY release_date DESC, id ASC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = qb.build().fetch_all(executor).await?;

    rows.iter().map(song_from_row).collect()
}

fn song_from_row(row: &SqliteRow) -> Result<SongRecord> {
    Ok(SongRecord {
        id: row.try_get("id")?,
        group: row.try_get("group_name")?,
        song: row.try_get("song")?,
        release_date: row.try_get("release_date")?,
        link: row.try_get("link")?,
    })
}

/// Delete the song and its lyric lines
///
/// Fails with `NotFound` when no song matches; nothing is removed then.
pub async fn delete_song(pool: &SqlitePool, group: &str, song: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM song_text WHERE song_id IN \
         (SELECT id FROM song_info WHERE group_name = ? AND song = ?)",
    )
    .bind(group)
    .bind(song)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query("DELETE FROM song_info WHERE group_name = ? AND song = ?")
        .bind(group)
        .bind(song)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(song_not_found(group, song));
    }

    tx.commit().await?;
    Ok(())
}

/// Update the supplied fields and refresh `updated_at`
///
/// Fails with `NotFound` when no row matches.
pub async fn update_song_fields<'e, E>(
    executor: E,
    group: &str,
    song: &str,
    release_date: Option<&str>,
    link: Option<&str>,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE song_info SET updated_at = CURRENT_TIMESTAMP");

    if let Some(release_date) = release_date {
        qb.push(", release_date = ").push_bind(release_date);
    }
    if let Some(link) = link {
        qb.push(", link = ").push_bind(link);
    }

    qb.push(" WHERE group_name = ")
        .push_bind(group)
        .push(" AND song = ")
        .push_bind(song);

    let result = qb.build().execute(executor).await?;

    if result.rows_affected() == 0 {
        return Err(song_not_found(group, song));
    }

    Ok(())
}

/// Apply a partial update atomically
///
/// Resolves the song first, updates its fields and, when `lines` is
/// non-empty, replaces every lyric line. Any failure rolls the whole update
/// back.
pub async fn update_song(pool: &SqlitePool, update: &SongUpdate) -> Result<()> {
    let mut tx = pool.begin().await?;

    let song_id = find_song_id(&mut *tx, &update.group, &update.song)
        .await?
        .ok_or_else(|| song_not_found(&update.group, &update.song))?;

    update_song_fields(
        &mut *tx,
        &update.group,
        &update.song,
        update.release_date.as_deref(),
        update.link.as_deref(),
    )
    .await?;

    if !update.lines.is_empty() {
        lyrics::replace_lines_for_song(&mut *tx, song_id, &update.lines).await?;
    }

    tx.commit().await?;
    debug!(song_id, replaced_lines = update.lines.len(), "Song updated");

    Ok(())
}
