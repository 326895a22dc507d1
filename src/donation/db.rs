use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson, Database};

use crate::database::MongoDonationStore;
use crate::error::Error;
use crate::user::UserId;

use super::Donation;

const DONATIONS: &str = "donations";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": DONATIONS,
            "indexes": [
                { "key": { "userId": 1 }, "name": "by_user_id" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
pub trait DonationStore: Send + Sync {
    async fn insert_donation(&self, donation: &Donation) -> Result<(), Error>;

    async fn fetch_donations_by_user(&self, user_id: &UserId) -> Result<Vec<Donation>, Error>;
}

#[async_trait]
impl DonationStore for MongoDonationStore {
    #[tracing::instrument(skip(self))]
    async fn insert_donation(&self, donation: &Donation) -> Result<(), Error> {
        self.insert_one(donation, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_donations_by_user(&self, user_id: &UserId) -> Result<Vec<Donation>, Error> {
        let donations: Vec<Donation> = self
            .find(bson::doc! { "userId": user_id.as_str() }, None)
            .await?
            .try_collect()
            .await?;

        Ok(donations)
    }
}
