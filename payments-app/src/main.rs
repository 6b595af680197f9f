//! # Payments Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and the bank simulator
//! - Create the payment service
//! - Run one command and print the result as JSON

mod config;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bank_simulator::BankSimulator;
use payments_hex::PaymentService;
use payments_repo::{KeyValueRepository, MemoryRepository, build_repo};
use payments_types::{
    AccountDetails, AppError, CreatePaymentRequest, Merchant, MerchantId, PaymentId,
    PaymentRepository,
};

use config::{Config, LogFormat, redact_database_url};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Merchant payment lifecycle", long_about = None)]
struct Cli {
    /// Merchant to act as (overrides MERCHANT_ID)
    #[arg(long, global = true)]
    merchant: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the merchant's settlement account to the store
    SeedMerchant {
        #[arg(long, default_value = "Test Merchant")]
        name: String,
        #[arg(long, default_value = "DE89370400440532013000")]
        iban: String,
        #[arg(long, default_value = "COBADEFFXXX")]
        bic: String,
        #[arg(long, default_value = "EUR")]
        currency: String,
    },
    /// Charge a card and record the payment
    Create {
        #[arg(long)]
        customer_id: String,
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        cvv: u16,
        /// Card expiry, MM/YY
        #[arg(long)]
        expiry: String,
        /// Price in smallest currency unit
        #[arg(long)]
        price: i64,
        #[arg(long, default_value = "USD")]
        currency: String,
    },
    /// Show a payment
    Get {
        payment_id: String,
    },
    /// Refund a payment
    Refund {
        payment_id: String,
    },
    /// Run create, get and refund against an in-memory store
    Demo,
}

fn init_tracing(format: LogFormat) {
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payments_hex=debug".into()),
        )
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    init_tracing(config.log_format);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {:#}", e);
            let client_error = e
                .downcast_ref::<AppError>()
                .is_some_and(AppError::is_client_error);
            ExitCode::from(if client_error { 2 } else { 1 })
        }
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let merchant_id = MerchantId::new(cli.merchant.unwrap_or(config.merchant_id));

    match cli.command {
        Commands::SeedMerchant {
            name,
            iban,
            bic,
            currency,
        } => {
            let repo = open_repo(&config.database_url).await?;
            seed_merchant(&repo, merchant_id, name, iban, bic, currency).await?;
        }
        Commands::Create {
            customer_id,
            customer_name,
            card_number,
            cvv,
            expiry,
            price,
            currency,
        } => {
            let request = CreatePaymentRequest {
                customer_id,
                customer_name,
                card_number,
                card_cvv: cvv,
                card_expiry_date: expiry,
                price,
                currency,
            };
            // Reject bad input before touching the store
            let payment = request
                .into_new_payment(merchant_id)
                .map_err(AppError::from)?;
            let service = open_service(&config.database_url).await?;
            let id = service.create_payment(payment).await?;
            print_json(&json!({ "ID": id }))?;
        }
        Commands::Get { payment_id } => {
            let service = open_service(&config.database_url).await?;
            let details = service
                .get_payment_details(&merchant_id, &PaymentId::new(payment_id))
                .await?;
            print_json(&details)?;
        }
        Commands::Refund { payment_id } => {
            let payment_id = PaymentId::new(payment_id);
            let service = open_service(&config.database_url).await?;
            service.refund_payment(&merchant_id, &payment_id).await?;
            let details = service
                .get_payment_details(&merchant_id, &payment_id)
                .await?;
            print_json(&details)?;
        }
        Commands::Demo => {
            let service = PaymentService::new(MemoryRepository::new(), BankSimulator::new());
            demo(&service, &merchant_id).await?;
        }
    }

    Ok(())
}

async fn open_repo(database_url: &str) -> anyhow::Result<KeyValueRepository> {
    tracing::info!("Using database: {}", redact_database_url(database_url));

    // Build repository (handles connection and table creation)
    build_repo(database_url).await
}

async fn open_service(
    database_url: &str,
) -> anyhow::Result<PaymentService<KeyValueRepository, BankSimulator>> {
    let repo = open_repo(database_url).await?;
    Ok(PaymentService::new(repo, BankSimulator::new()))
}

async fn seed_merchant(
    repo: &KeyValueRepository,
    merchant_id: MerchantId,
    name: String,
    iban: String,
    bic: String,
    currency: String,
) -> anyhow::Result<()> {
    let merchant = Merchant {
        id: merchant_id,
        account_details: AccountDetails {
            holder_name: name,
            iban,
            bic,
            currency,
        },
    };
    repo.put_merchant(&merchant).await.map_err(AppError::from)?;
    tracing::info!(merchant_id = %merchant.id, "merchant seeded");
    print_json(&merchant)
}

async fn demo<R: PaymentRepository>(
    service: &PaymentService<R, BankSimulator>,
    merchant_id: &MerchantId,
) -> anyhow::Result<()> {
    let request = CreatePaymentRequest {
        customer_id: "c1".to_string(),
        customer_name: "Test Customer".to_string(),
        card_number: "1234123412341234".to_string(),
        card_cvv: 123,
        card_expiry_date: "12/23".to_string(),
        price: 1000,
        currency: "USD".to_string(),
    };
    let payment = request
        .into_new_payment(merchant_id.clone())
        .map_err(AppError::from)?;

    let id = service.create_payment(payment).await?;
    let created = service.get_payment_details(merchant_id, &id).await?;
    service.refund_payment(merchant_id, &id).await?;
    let refunded = service.get_payment_details(merchant_id, &id).await?;

    print_json(&json!({ "created": created, "refunded": refunded }))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
