use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::PgPool;

pub struct ValidationReport {
    pub environment: bool,
    pub database: bool,
    pub schema: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.database && self.schema
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Database Connectivity: {}", status(self.database));
        println!("Database Schema:       {}", status(self.schema));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config, pool: &PgPool) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        environment: true,
        database: true,
        schema: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    if let Err(e) = validate_database(pool).await {
        report.database = false;
        report.schema = false;
        report.errors.push(format!("Database: {}", e));
        return Ok(report);
    }

    if let Err(e) = validate_schema(pool).await {
        report.schema = false;
        report.errors.push(format!("Schema: {}", e));
    }

    Ok(report)
}

pub fn validate_env_vars(config: &Config) -> Result<()> {
    if config.database_url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if config.jwt_secret.len() < 16 {
        anyhow::bail!("JWT_SECRET must be at least 16 characters");
    }
    if config.stripe_webhook_secret.is_empty() {
        anyhow::bail!("STRIPE_WEBHOOK_SECRET is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if config.token_ttl_hours <= 0 {
        anyhow::bail!("TOKEN_TTL_HOURS must be greater than 0");
    }
    if config.webhook_tolerance_secs <= 0 {
        anyhow::bail!("WEBHOOK_TOLERANCE_SECS must be greater than 0");
    }
    if config.payment_currency.len() != 3 {
        anyhow::bail!("PAYMENT_CURRENCY must be a three-letter ISO code");
    }

    url::Url::parse(&config.stripe_api_base).context("STRIPE_API_BASE is not a valid URL")?;

    Ok(())
}

async fn validate_database(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Failed to connect to database")?;
    Ok(())
}

async fn validate_schema(pool: &PgPool) -> Result<()> {
    let present: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_schema = current_schema() \
         AND table_name IN ('scouts', 'orders', 'order_items')",
    )
    .fetch_one(pool)
    .await
    .context("Failed to inspect schema")?;

    if present < 3 {
        anyhow::bail!("Missing tables; run `scout-cookies db init`");
    }

    Ok(())
}
