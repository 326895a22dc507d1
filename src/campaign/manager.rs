use mongodb::bson::Document;

use crate::database::Database;
use crate::error::Error;
use crate::fields;
use crate::user::UserId;

use super::{Campaign, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, fields: Document) -> Result<Campaign, Error> {
    let campaign = Campaign {
        id: CampaignId::new(),
        fields: fields::without_id(fields),
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database, limit: u32) -> Result<Vec<Campaign>, Error> {
    if limit == 0 {
        return Ok(vec![]);
    }

    let campaigns = db.campaigns().fetch_campaigns(limit).await?;

    Ok(campaigns)
}

/// A malformed id is reported the same as a missing campaign.
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(db: &dyn Database, campaign_id: &str) -> Result<Campaign, Error> {
    let not_found = || Error::CampaignNotFound {
        campaign_id: campaign_id.to_owned(),
    };

    let id: CampaignId = campaign_id.parse().map_err(|_| not_found())?;
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns_by_user(
    db: &dyn Database,
    user_id: &UserId,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns_by_user(user_id).await?;

    Ok(campaigns)
}

/// Merges `fields` into a campaign owned by `user_id`. A campaign that does
/// not exist and one owned by someone else produce the same error.
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    user_id: &UserId,
    fields: Document,
) -> Result<(), Error> {
    let fields = fields::without_id(fields);

    let matched = db
        .campaigns()
        .update_campaign_by_user(campaign_id, user_id, fields)
        .await?;

    if matched == 0 {
        return Err(Error::CampaignNotFoundOrUnauthorized { campaign_id });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    user_id: &UserId,
) -> Result<(), Error> {
    let deleted = db
        .campaigns()
        .delete_campaign_by_user(campaign_id, user_id)
        .await?;

    if deleted == 0 {
        return Err(Error::CampaignNotFoundOrUnauthorized { campaign_id });
    }

    Ok(())
}
