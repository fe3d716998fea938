//! Test Prediction Client
//!
//! Generates sample transactions and posts them to the prediction API.

use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Transaction payload matching the serving schema. Identifier fields are
/// included on purpose: the API accepts and ignores them.
#[derive(Debug, Clone, Serialize)]
struct SampleTransaction {
    account_id: u64,
    receiver_account_id: u64,
    transaction_amount: f64,
    account_age_days: u32,
    daily_transaction_amount: f64,
    total_daily_transactions: u32,
    transaction_frequency: f64,
    transaction_frequency_same_account: u32,
    account_type_personal: bool,
    payment_type_debit: bool,
    transaction_type_bank_transfer: bool,
    #[serde(rename = "transaction_type_Deposit")]
    transaction_type_deposit: bool,
    transaction_type_sporty: bool,
}

/// Transaction generator for testing
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    counter: u64,
}

impl TransactionGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
        }
    }

    /// Generate a random legitimate transaction
    fn generate_legitimate(&mut self) -> SampleTransaction {
        self.counter += 1;
        SampleTransaction {
            account_id: 10_000 + self.counter,
            receiver_account_id: self.rng.gen_range(90_000..90_500),
            transaction_amount: self.rng.gen_range(20.0..1200.0),
            account_age_days: self.rng.gen_range(120..3000),
            daily_transaction_amount: self.rng.gen_range(50.0..2500.0),
            total_daily_transactions: self.rng.gen_range(1..6),
            transaction_frequency: self.rng.gen_range(0.2..3.0),
            transaction_frequency_same_account: self.rng.gen_range(0..3),
            account_type_personal: self.rng.gen_bool(0.8),
            payment_type_debit: self.rng.gen_bool(0.7),
            transaction_type_bank_transfer: self.rng.gen_bool(0.6),
            transaction_type_deposit: self.rng.gen_bool(0.5),
            transaction_type_sporty: self.rng.gen_bool(0.1),
        }
    }

    /// Generate a suspicious transaction: large amount, young account,
    /// rapid-fire frequency.
    fn generate_suspicious(&mut self) -> SampleTransaction {
        self.counter += 1;
        SampleTransaction {
            account_id: 10_000 + self.counter,
            receiver_account_id: self.rng.gen_range(90_000..90_500),
            transaction_amount: self.rng.gen_range(3000.0..9500.0),
            account_age_days: self.rng.gen_range(3..90),
            daily_transaction_amount: self.rng.gen_range(5000.0..20_000.0),
            total_daily_transactions: self.rng.gen_range(8..30),
            transaction_frequency: self.rng.gen_range(4.0..12.0),
            transaction_frequency_same_account: self.rng.gen_range(3..10),
            account_type_personal: self.rng.gen_bool(0.3),
            payment_type_debit: self.rng.gen_bool(0.3),
            transaction_type_bank_transfer: self.rng.gen_bool(0.2),
            transaction_type_deposit: self.rng.gen_bool(0.2),
            transaction_type_sporty: self.rng.gen_bool(0.8),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_client=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
    let fraud_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    let delay_ms: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(200);

    info!(
        base_url = %base_url,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Starting test prediction client"
    );

    let client = reqwest::Client::new();
    let mut generator = TransactionGenerator::new();
    let mut rng = rand::thread_rng();

    let mut suspicious_count = 0u64;
    for i in 0..count {
        let transaction = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };

        match client
            .post(format!("{}/predict", base_url))
            .json(&transaction)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let body: serde_json::Value = response.json().await.unwrap_or_default();
                info!(
                    status = %status,
                    prediction = ?body.get("prediction"),
                    result = ?body.get("result"),
                    "Response {}/{}",
                    i + 1,
                    count
                );
            }
            Err(e) => {
                warn!(error = %e, "Request failed, printing payload instead");
                info!("{}", serde_json::to_string_pretty(&transaction)?);
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        sent = count,
        suspicious = suspicious_count,
        "Test client finished"
    );

    Ok(())
}
