use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::Database;
use crate::error::Error;
use crate::fields;
use crate::response::CreatedBody;
use crate::user::UserId;

use super::{manager, Donation, DonationId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DonationBody {
    #[serde(rename = "_id", with = "crate::typedid::hex")]
    pub id: DonationId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DonationBody {
    pub fn render(donation: Donation) -> DonationBody {
        DonationBody {
            id: donation.id,
            fields: fields::into_json(donation.fields),
        }
    }
}

#[post("/donations")]
#[tracing::instrument(skip(db))]
pub async fn create_donation(
    db: Data<Box<dyn Database>>,
    body: Json<Document>,
) -> Result<HttpResponse, Error> {
    let donation = manager::create_donation(&***db, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedBody {
        message: "Donation created successfully".to_string(),
        id: donation.id.to_string(),
    }))
}

#[get("/mydonations/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_donations_by_user(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<Vec<DonationBody>>, Error> {
    let user_id = params.into_inner();
    let donations = manager::get_donations_by_user(&***db, &user_id).await?;

    let body = donations.into_iter().map(DonationBody::render).collect();

    Ok(Json(body))
}
