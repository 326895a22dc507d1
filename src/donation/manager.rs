use mongodb::bson::Document;

use crate::database::Database;
use crate::error::Error;
use crate::fields;
use crate::user::UserId;

use super::{Donation, DonationId};

#[tracing::instrument(skip(db))]
pub async fn create_donation(db: &dyn Database, fields: Document) -> Result<Donation, Error> {
    let donation = Donation {
        id: DonationId::new(),
        fields: fields::without_id(fields),
    };

    db.donations().insert_donation(&donation).await?;

    Ok(donation)
}

#[tracing::instrument(skip(db))]
pub async fn get_donations_by_user(
    db: &dyn Database,
    user_id: &UserId,
) -> Result<Vec<Donation>, Error> {
    let donations = db.donations().fetch_donations_by_user(user_id).await?;

    Ok(donations)
}
