use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use striper::application::gateway::{PaymentMethod, PaymentOutcome, Striper};
use striper::config::GatewaySettings;
use striper::domain::charge::CaptureOutcome;
use striper::domain::notice::Notice;
use striper::domain::order::OrderStatus;
use striper::domain::ports::{OrderStore, OrderStoreBox};
use striper::infrastructure::in_memory::{InMemoryNotices, InMemoryOrderStore};
use striper::infrastructure::order_file::read_order;
#[cfg(feature = "storage-rocksdb")]
use striper::infrastructure::rocksdb::RocksDbOrderStore;
use striper::infrastructure::stripe::StripeClient;
#[cfg(not(feature = "storage-rocksdb"))]
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent order database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Charge a card token for an order read from a JSON file
    Charge {
        /// Order JSON file
        #[arg(long)]
        order: PathBuf,
        /// Card token produced by client-side tokenization
        #[arg(long)]
        token: String,
        /// Complete the order right after a successful charge
        #[arg(long)]
        complete: bool,
        /// Capture amount in minor units, used with --complete
        #[arg(long, requires = "complete")]
        amount: Option<Decimal>,
    },
    /// Mark a paid order as completed, capturing an authorized charge
    Complete {
        #[arg(long)]
        order_id: u64,
        /// Capture amount in minor units (defaults to the full authorization)
        #[arg(long)]
        amount: Option<Decimal>,
    },
    /// Print a stored order
    Show {
        #[arg(long)]
        order_id: u64,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    payment: Option<&'a PaymentOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capture: Option<&'a CaptureOutcome>,
    notices: Vec<Notice>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let orders = open_store(cli.db_path)?;

    if let Command::Show { order_id } = cli.command {
        let order = orders
            .get(order_id)
            .await
            .into_diagnostic()?
            .ok_or_else(|| miette!("Order {order_id} not found"))?;
        return print_json(&order);
    }

    let config = GatewaySettings::from_env()
        .and_then(|settings| settings.resolve())
        .into_diagnostic()?;
    let api = StripeClient::from_config(&config).into_diagnostic()?;
    let notices = InMemoryNotices::new();
    let gateway = Striper::new(config, Box::new(api), orders, Box::new(notices.clone()));

    match cli.command {
        Command::Charge {
            order,
            token,
            complete,
            amount,
        } => {
            let order = read_order(&order).into_diagnostic()?;
            let order_id = order.id;
            if gateway.orders().get(order_id).await.into_diagnostic()?.is_none() {
                gateway.orders().store(order).await.into_diagnostic()?;
            }

            let payment = gateway
                .process_payment(order_id, &token)
                .await
                .into_diagnostic()?;

            let capture = match (&payment, complete) {
                (PaymentOutcome::Success { .. }, true) => gateway
                    .lifecycle()
                    .transition(order_id, OrderStatus::Completed, amount)
                    .await
                    .into_diagnostic()?,
                _ => None,
            };

            print_json(&Report {
                payment: Some(&payment),
                capture: capture.as_ref(),
                notices: notices.drain(),
            })?;

            if let PaymentOutcome::Failed { message, .. } = payment {
                return Err(miette!("Payment failed: {message}"));
            }
            check_capture(capture.as_ref())
        }
        Command::Complete { order_id, amount } => {
            let capture = gateway
                .lifecycle()
                .transition(order_id, OrderStatus::Completed, amount)
                .await
                .into_diagnostic()?;

            print_json(&Report {
                payment: None,
                capture: capture.as_ref(),
                notices: notices.drain(),
            })?;
            check_capture(capture.as_ref())
        }
        Command::Show { .. } => Ok(()),
    }
}

fn open_store(db_path: Option<PathBuf>) -> Result<OrderStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDbOrderStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryOrderStore::new()))
        }
        None => Ok(Box::new(InMemoryOrderStore::new())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()
}

fn check_capture(capture: Option<&CaptureOutcome>) -> Result<()> {
    match capture {
        Some(CaptureOutcome::Failed { message }) => Err(miette!("Capture failed: {message}")),
        _ => Ok(()),
    }
}
