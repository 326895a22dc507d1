use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::Document;

use tulip::auth::IdentityVerifier;
use tulip::campaign::db::CampaignStore;
use tulip::campaign::{Campaign, CampaignId};
use tulip::database::Database;
use tulip::donation::db::DonationStore;
use tulip::donation::Donation;
use tulip::error::Error;
use tulip::person::db::PersonStore;
use tulip::person::Person;
use tulip::user::UserId;

/// Behaves like the `campaigns` collection for the filters the service uses.
#[derive(Default)]
pub struct MemoryCampaignStore {
    pub campaigns: Mutex<Vec<Campaign>>,
    pub mutations: AtomicUsize,
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.campaigns.lock().unwrap().push(campaign.clone());
        Ok(())
    }

    async fn fetch_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, Error> {
        let campaigns = self.campaigns.lock().unwrap();
        Ok(campaigns.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaigns = self.campaigns.lock().unwrap();
        Ok(campaigns.iter().find(|c| c.id == campaign_id).cloned())
    }

    async fn fetch_campaigns_by_user(&self, user_id: &UserId) -> Result<Vec<Campaign>, Error> {
        let campaigns = self.campaigns.lock().unwrap();
        Ok(campaigns
            .iter()
            .filter(|c| c.owner() == Some(user_id.as_str()))
            .cloned()
            .collect())
    }

    async fn update_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
        fields: Document,
    ) -> Result<u64, Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .iter_mut()
            .find(|c| c.id == campaign_id && c.owner() == Some(user_id.as_str()));

        match campaign {
            Some(campaign) => {
                for (key, value) in fields {
                    campaign.fields.insert(key, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_campaign_by_user(
        &self,
        campaign_id: CampaignId,
        user_id: &UserId,
    ) -> Result<u64, Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut campaigns = self.campaigns.lock().unwrap();
        let before = campaigns.len();
        campaigns.retain(|c| !(c.id == campaign_id && c.owner() == Some(user_id.as_str())));
        Ok((before - campaigns.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryPersonStore {
    pub people: Mutex<Vec<Person>>,
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn fetch_people(&self) -> Result<Vec<Person>, Error> {
        Ok(self.people.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryDonationStore {
    pub donations: Mutex<Vec<Donation>>,
}

#[async_trait]
impl DonationStore for MemoryDonationStore {
    async fn insert_donation(&self, donation: &Donation) -> Result<(), Error> {
        self.donations.lock().unwrap().push(donation.clone());
        Ok(())
    }

    async fn fetch_donations_by_user(&self, user_id: &UserId) -> Result<Vec<Donation>, Error> {
        let donations = self.donations.lock().unwrap();
        Ok(donations
            .iter()
            .filter(|d| d.owner() == Some(user_id.as_str()))
            .cloned()
            .collect())
    }
}

/// Cloning shares the underlying stores, so a test can keep a handle while
/// the app owns another.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    pub campaigns: Arc<MemoryCampaignStore>,
    pub people: Arc<MemoryPersonStore>,
    pub donations: Arc<MemoryDonationStore>,
}

impl MemoryDatabase {
    #[allow(dead_code)]
    pub fn campaign_mutations(&self) -> usize {
        self.campaigns.mutations.load(Ordering::SeqCst)
    }
}

impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &*self.campaigns
    }

    fn people(&self) -> &dyn PersonStore {
        &*self.people
    }

    fn donations(&self) -> &dyn DonationStore {
        &*self.donations
    }
}

/// Accepts tokens of the form `token-<user id>` and counts every call.
#[derive(Clone, Default)]
pub struct FakeVerifier {
    pub calls: Arc<AtomicUsize>,
}

impl FakeVerifier {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        token
            .strip_prefix("token-")
            .filter(|user| !user.is_empty())
            .map(UserId::from)
            .ok_or(Error::InvalidToken)
    }
}

#[allow(dead_code)]
pub fn bearer(user: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer token-{}", user))
}

/// Builds the app around a `MemoryDatabase` and `FakeVerifier`, keeping the
/// caller's handles to both.
macro_rules! init_app {
    ($db:expr, $verifier:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(
                    Box::new($db.clone()) as Box<dyn tulip::database::Database>
                ))
                .app_data(actix_web::web::Data::new(
                    Box::new($verifier.clone()) as Box<dyn tulip::auth::IdentityVerifier>
                ))
                .configure(tulip::configure),
        )
        .await
    };
}

/// Posts `$body` to the campaign creation route and yields the new id.
#[allow(unused_macros)]
macro_rules! create_campaign {
    ($app:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/campaigns/addcampaign")
            .set_json($body)
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let created: tulip::response::CreatedBody = actix_web::test::read_body_json(resp).await;
        created.id
    }};
}
