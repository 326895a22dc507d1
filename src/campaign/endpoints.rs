use actix_web::dev::Payload;
use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, patch, post, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::VerifiedUser;
use crate::database::Database;
use crate::error::Error;
use crate::fields;
use crate::response::{CreatedBody, MessageBody};
use crate::user::UserId;

use super::{manager, Campaign, CampaignId};

/// The `{campaign_id}` route segment. Declared ahead of [`VerifiedUser`] so a
/// malformed id is rejected before the token is looked at.
#[derive(Clone, Copy, Debug)]
pub struct CampaignIdPath(pub CampaignId);

impl FromRequest for CampaignIdPath {
    type Error = Error;
    type Future = Ready<Result<CampaignIdPath, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("campaign_id").unwrap_or_default();

        ready(
            raw.parse()
                .map(CampaignIdPath)
                .map_err(|_| Error::InvalidCampaignId {
                    campaign_id: raw.to_owned(),
                }),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    #[serde(rename = "_id", with = "crate::typedid::hex")]
    pub id: CampaignId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            fields: fields::into_json(campaign.fields),
        }
    }
}

#[get("/campaigns/{limit}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<Box<dyn Database>>,
    params: Path<u32>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let limit = params.into_inner();
    let campaigns = manager::get_campaigns(&***db, limit).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[post("/campaigns/addcampaign")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<Document>,
) -> Result<HttpResponse, Error> {
    let campaign = manager::create_campaign(&***db, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedBody {
        message: "Campaign created successfully".to_string(),
        id: campaign.id.to_string(),
    }))
}

#[get("/campaign/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let campaign = manager::get_campaign_by_id(&***db, &campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[get("/mycampaigns/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns_by_user(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let user_id = params.into_inner();
    let campaigns = manager::get_campaigns_by_user(&***db, &user_id).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[delete("/deletecampaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    campaign_id: CampaignIdPath,
    user: VerifiedUser,
) -> Result<Json<MessageBody>, Error> {
    let CampaignIdPath(campaign_id) = campaign_id;
    let user_id = user.into_inner();

    manager::delete_campaign(&***db, campaign_id, &user_id).await?;

    Ok(Json(MessageBody::new("Campaign deleted successfully")))
}

#[patch("/updatecampaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<Box<dyn Database>>,
    campaign_id: CampaignIdPath,
    user: VerifiedUser,
    body: Json<Document>,
) -> Result<Json<MessageBody>, Error> {
    let CampaignIdPath(campaign_id) = campaign_id;
    let user_id = user.into_inner();

    manager::update_campaign(&***db, campaign_id, &user_id, body.into_inner()).await?;

    Ok(Json(MessageBody::new("Campaign updated successfully")))
}
