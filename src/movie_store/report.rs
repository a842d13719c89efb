use super::error::StoreError;
use super::models::AmountMoviesByActorYear;
use super::store::SqliteMovieStore;

/// How many movies each actor played in, per release year.
///
/// Ordered by actor name, then year.
pub fn count_movies_by_actor_and_year(
    store: &SqliteMovieStore,
) -> Result<Vec<AmountMoviesByActorYear>, StoreError> {
    store.read(|conn| {
        let mut stmt = conn.prepare_cached(
            "SELECT a.name, m.year, COUNT(m.id)
             FROM actor a
             INNER JOIN actor_movie am ON am.actor_id = a.id
             INNER JOIN movie m ON m.id = am.movie_id
             GROUP BY a.name, m.year
             ORDER BY a.name, m.year",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(AmountMoviesByActorYear {
                    actor_name: r.get(0)?,
                    year: r.get(1)?,
                    amount_of_movies: r.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    })
}
