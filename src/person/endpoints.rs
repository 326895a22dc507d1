use actix_web::get;
use actix_web::web::{Data, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::Database;
use crate::error::Error;
use crate::fields;

use super::{manager, Person};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonBody {
    #[serde(rename = "_id")]
    pub id: Value,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PersonBody {
    pub fn render(person: Person) -> PersonBody {
        PersonBody {
            id: fields::id_into_json(person.id),
            fields: fields::into_json(person.fields),
        }
    }
}

#[get("/people")]
#[tracing::instrument(skip(db))]
pub async fn get_people(db: Data<Box<dyn Database>>) -> Result<Json<Vec<PersonBody>>, Error> {
    let people = manager::get_people(&***db).await?;

    let body = people.into_iter().map(PersonBody::render).collect();

    Ok(Json(body))
}
