use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::options::FindOptions;
use mongodb::Database;

use crate::database::MongoCampaignStore;
use crate::error::Error;
use crate::user::UserId;

use super::{Campaign, CampaignId};

const CAMPAIGNS: &str = "campaigns";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
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
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    /// Returns at most `limit` campaigns in natural order. A `limit` of zero
    /// means "no limit" to MongoDB, so callers must not pass it.
    async fn fetch_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn fetch_campaigns_by_user(&self, user_id: &UserId) -> Result<Vec<Campaign>, Error>;

    /// Applies `fields` as a `$set` to the campaign only if `user_id` owns
    /// it. Returns the number of matched campaigns.
    async fn update_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
        fields: Document,
    ) -> Result<u64, Error>;

    /// Deletes the campaign only if `user_id` owns it. Returns the number of
    /// deleted campaigns.
    async fn delete_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
    ) -> Result<u64, Error>;
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, Error> {
        let options = FindOptions::builder().limit(i64::from(limit)).build();

        let campaigns: Vec<Campaign> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns_by_user(&self, user_id: &UserId) -> Result<Vec<Campaign>, Error> {
        let campaigns: Vec<Campaign> = self
            .find(bson::doc! { "userId": user_id.as_str() }, None)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
        fields: Document,
    ) -> Result<u64, Error> {
        // ownership is part of the filter so the check and the write are one
        // atomic operation
        let result = self
            .update_one(
                bson::doc! { "_id": campaign_id, "userId": user_id.as_str() },
                bson::doc! { "$set": fields },
                None,
            )
            .await?;

        Ok(result.matched_count)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
    ) -> Result<u64, Error> {
        let result = self
            .delete_one(
                bson::doc! { "_id": campaign_id, "userId": user_id.as_str() },
                None,
            )
            .await?;

        Ok(result.deleted_count)
    }
}
