/// Name of the primary-key constraint on the `links` table.
pub const LINKS_PKEY: &str = "links_pkey";

/// Returns `true` if `e` is a unique violation of the `links` primary key.
pub fn is_unique_violation_on_id(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(LINKS_PKEY))
}
