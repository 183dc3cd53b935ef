use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use cashbook::{
    NewTransaction, SESSION_COOKIE, SessionId, TransactionType, create_transaction,
    get_summary, initialize_db,
};

/// A utility for creating a test database for the REST API server of cashbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let session_id = SessionId::generate();
    let transactions = [
        ("Salary", 1000.0, TransactionType::Credit),
        ("Rent", 400.0, TransactionType::Debit),
        ("Groceries", 85.4, TransactionType::Debit),
        ("Refund", 12.5, TransactionType::Credit),
    ];

    for (title, amount, transaction_type) in transactions {
        create_transaction(
            NewTransaction {
                title: title.to_owned(),
                amount,
                transaction_type,
            },
            &session_id,
            &conn,
        )?;
    }

    let summary = get_summary(&session_id, &conn)?;

    println!("Success! Balance of the test session: {}", summary.amount);
    println!("Use the cookie {SESSION_COOKIE}={session_id} to act as the test session.");

    Ok(())
}
