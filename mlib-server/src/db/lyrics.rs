//! Lyric line operations (`song_text`)

use mlib_common::Result;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use super::{song_not_found, songs};
use crate::pagination::Page;

/// Insert one lyric line for an existing song
///
/// Fails with a database error when `song_id` does not exist.
pub async fn append_lyric_line<'e, E>(executor: E, song_id: i64, verse: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO song_text (song_id, verse) VALUES (?, ?)")
        .bind(song_id)
        .bind(verse)
        .execute(executor)
        .await?;

    Ok(())
}

/// Page through the lyric lines of (group, song) in insertion order
///
/// Returns an empty Vec both for an unknown song and for a page past the
/// last line; use [`songs::song_exists`] to tell them apart.
pub async fn list_lyric_lines<'e, E>(
    executor: E,
    group: &str,
    song: &str,
    page: Page,
) -> Result<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let verses = sqlx::query_scalar(
        r#"
        SELECT st.verse
        FROM song_text st
        JOIN song_info si ON si.id = st.song_id
        WHERE si.group_name = ? AND si.song = ?
        ORDER BY st.id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(group)
    .bind(song)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await?;

    Ok(verses)
}

/// Replace every lyric line of (group, song) in one transaction
pub async fn replace_lyric_lines(
    pool: &SqlitePool,
    group: &str,
    song: &str,
    lines: &[String],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let song_id = songs::find_song_id(&mut *tx, group, song)
        .await?
        .ok_or_else(|| song_not_found(group, song))?;
    replace_lines_for_song(&mut *tx, song_id, lines).await?;

    tx.commit().await?;
    Ok(())
}

/// Delete the song's lines and insert `lines` in order on one connection
pub(crate) async fn replace_lines_for_song(
    conn: &mut SqliteConnection,
    song_id: i64,
    lines: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM song_text WHERE song_id = ?")
        .bind(song_id)
        .execute(&mut *conn)
        .await?;

    for verse in lines {
        append_lyric_line(&mut *conn, song_id, verse).await?;
    }

    Ok(())
}
