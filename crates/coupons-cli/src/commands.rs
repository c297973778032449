use clap::{Parser, Subcommand};
use chrono::Utc;

use coupons_core::{CouponId, CustomerId};
use coupons_store::{Database, DatabaseConfig};

use crate::fixture;

#[derive(Parser)]
#[command(name = "coupons-cli")]
#[command(about = "Maintenance commands for the coupons database.")]
pub struct CommandLine {
    /// `SQLite` database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:coupons.db")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create missing tables
    Migrate,
    /// Drop every table
    ClearDb,
    /// Recreate the tables and fill them with demo data
    DemoFixture,
}

impl CommandLine {
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let db = Database::connect(&DatabaseConfig::with_url(&self.database_url)).await?;

        match self.command {
            Commands::Migrate => {
                db.migrate().await?;
                tracing::info!("Tables created");
            }
            Commands::ClearDb => {
                db.drop_all().await?;
                tracing::info!("Tables dropped");
            }
            Commands::DemoFixture => demo_fixture(&db).await?,
        }

        db.close().await;
        Ok(())
    }
}

/// Rebuild the schema and insert demo customers, coupons and links.
pub async fn demo_fixture(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Building a demo database");

    db.drop_all().await?;
    db.migrate().await?;

    let mut rng = rand::rng();
    let data = fixture::generate(&mut rng, Utc::now());
    let mut session = db.session().await?;

    let mut customer_ids: Vec<CustomerId> = Vec::with_capacity(data.customers.len());
    for customer in data.customers {
        customer_ids.push(session.customers().create(customer).await?.id);
    }
    tracing::info!(count = customer_ids.len(), "Customers created");

    let coupon_ids: Vec<CouponId> = session
        .coupons()
        .create_many(data.coupons)
        .await?
        .into_iter()
        .map(|coupon| coupon.id)
        .collect();

    let links = fixture::pick_links(&mut rng, &coupon_ids, &customer_ids);
    for link in &links {
        session.links().create(*link).await?;
    }
    tracing::info!(count = links.len(), "Coupon-customer links created");

    Ok(())
}
