use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use finance_manager::{
    budget::set_budget,
    initialize_db,
    transaction::{Amount, NewTransaction, TransactionType, create_transaction},
    user::create_user,
};

/// A utility for creating a test database for finance_manager.
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

    println!("Creating test user...");
    let user = create_user("user1", &conn)?;

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let last_month = same_day_last_month(today).ok_or("could not work out last month's date")?;

    let transactions = [
        (TransactionType::Income, 1500.0, "Salary", "Salary", today),
        (TransactionType::Expense, 300.0, "Groceries", "Food", today),
        (TransactionType::Expense, 100.0, "Transport", "Transport", today),
        (TransactionType::Income, 1500.0, "Salary", "Salary", last_month),
        (TransactionType::Expense, 260.0, "Groceries", "Food", last_month),
        (TransactionType::Expense, 80.0, "Power bill", "Utilities", last_month),
    ];

    for (transaction_type, amount, description, category, date) in transactions {
        let new_transaction =
            NewTransaction::new(transaction_type, Amount::new(amount)?, category, date)
                .description(description);
        create_transaction(user.id, new_transaction, &conn)?;
    }

    println!("Creating budgets...");
    set_budget(user.id, "Food", Amount::new(200.0)?, &conn)?;
    set_budget(user.id, "Transport", Amount::new(50.0)?, &conn)?;

    println!("Success!");

    Ok(())
}

/// The same day of the month in the previous calendar month, or the last day
/// of that month if it is shorter, e.g. 31 March gives 29 February in a leap year.
fn same_day_last_month(date: Date) -> Option<Date> {
    let end_of_last_month = date.replace_day(1).ok()?.previous_day()?;

    end_of_last_month
        .replace_day(date.day().min(end_of_last_month.day()))
        .ok()
}
