use crate::database::Database;
use crate::error::Error;

use super::Person;

#[tracing::instrument(skip(db))]
pub async fn get_people(db: &dyn Database) -> Result<Vec<Person>, Error> {
    let people = db.people().fetch_people().await?;

    Ok(people)
}
