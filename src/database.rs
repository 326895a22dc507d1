use mongodb::{bson, Collection};

use crate::campaign::db::CampaignStore;
use crate::campaign::{self, Campaign};
use crate::donation::db::DonationStore;
use crate::donation::{self, Donation};
use crate::error::Error;
use crate::person::db::PersonStore;
use crate::person::Person;

pub type MongoCampaignStore = Collection<Campaign>;
pub type MongoPersonStore = Collection<Person>;
pub type MongoDonationStore = Collection<Donation>;

/// Access to every collection the service reads or writes. Handlers receive
/// it as `Data<Box<dyn Database>>`.
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    fn people(&self) -> &dyn PersonStore;

    fn donations(&self) -> &dyn DonationStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: Collection<Campaign>,
    people: Collection<Person>,
    donations: Collection<Donation>,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection("campaigns"),
            people: db.collection("people"),
            donations: db.collection("donations"),
        }
    }

    /// Pings the server so a bad connection string fails at startup rather
    /// than on the first request, then ensures indexes exist.
    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        campaign::db::initialize(&db).await?;
        donation::db::initialize(&db).await?;

        Ok(MongoDatabase::new(db))
    }
}

impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn people(&self) -> &dyn PersonStore {
        &self.people
    }

    fn donations(&self) -> &dyn DonationStore {
        &self.donations
    }
}
