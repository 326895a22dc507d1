use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;

use crate::database::MongoPersonStore;
use crate::error::Error;

use super::Person;

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn fetch_people(&self) -> Result<Vec<Person>, Error>;
}

#[async_trait]
impl PersonStore for MongoPersonStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_people(&self) -> Result<Vec<Person>, Error> {
        let people: Vec<Person> = self.find(bson::doc! {}, None).await?.try_collect().await?;

        Ok(people)
    }
}
