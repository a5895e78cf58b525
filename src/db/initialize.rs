use crate::db::schema::create_tables;
use crate::errors::WorkflowResult;
use rusqlite::Connection;

/// Initialize the database.
/// Schema provisioning beyond first-run creation is a deployment concern and
/// lives outside this crate.
pub fn init_db(conn: &Connection) -> WorkflowResult<()> {
    create_tables(conn)?;
    Ok(())
}
