use std::{
    error::Error,
    path::PathBuf,
    process::ExitCode,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, macros::format_description};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_manager::{
    Error as FinanceError,
    category::{KNOWN_CATEGORIES, is_known_category},
    currency::format_currency,
    initialize_db,
    stores::{BudgetStore, SQLiteStore, TransactionStore},
    summary::{SummaryReport, load_budget_data, load_monthly_comparison, load_summary_report},
    timezone::local_today,
    transaction::{Amount, NewTransaction, TransactionType},
    user::{User, count_users, create_user, get_user_by_username},
};

/// Keep track of income, expenses and budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "FINANCE_DB_PATH")]
    db_path: PathBuf,

    /// The canonical timezone used to work out today's date, e.g. "Pacific/Auckland".
    #[arg(long, env = "FINANCE_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables.
    Init,

    /// Register a new user.
    AddUser {
        /// The name of the new user.
        username: String,
    },

    /// Record an income or expense.
    Add {
        /// The user the transaction belongs to.
        #[arg(long)]
        user: String,

        /// Either "income" or "expense".
        #[arg(long = "type")]
        transaction_type: TransactionType,

        /// How much money was earned or spent.
        #[arg(long, allow_negative_numbers = true)]
        amount: Amount,

        /// The category, e.g. "Food". Leave empty for uncategorized.
        #[arg(long, default_value = "")]
        category: String,

        /// What the transaction was for.
        #[arg(long, default_value = "")]
        description: String,

        /// When the transaction happened as YYYY-MM-DD. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },

    /// Set the spending budget for a category, replacing any existing budget.
    SetBudget {
        /// The user the budget belongs to.
        #[arg(long)]
        user: String,

        /// The category to budget for.
        #[arg(long)]
        category: String,

        /// The most the user plans to spend in the category.
        #[arg(long, allow_negative_numbers = true)]
        amount: Amount,
    },

    /// Show total income, expenses, balance and the total for each category.
    Summary {
        /// The user to summarize.
        #[arg(long)]
        user: String,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print expenses by category and budgets against actual spending as JSON.
    BudgetData {
        /// The user to report on.
        #[arg(long)]
        user: String,
    },

    /// Print a month's expenses by category next to the month before as JSON.
    Compare {
        /// The user to report on.
        #[arg(long)]
        user: String,

        /// Any date in the month to compare as YYYY-MM-DD. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        month: Option<Date>,
    },
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    tracing::debug!("opening database at {:?}", args.db_path);
    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    match args.command {
        Command::Init => {
            let user_count = count_users(&connection)?;
            println!(
                "Database ready at {:?} with {user_count} user(s).",
                args.db_path
            );
        }
        Command::AddUser { username } => {
            let user = create_user(&username, &connection)?;
            println!("Created user \"{}\" with ID {}.", user.username, user.id);
        }
        Command::Add {
            user,
            transaction_type,
            amount,
            category,
            description,
            date,
        } => {
            let user = find_user(&user, &connection)?;
            let date = match date {
                Some(date) => date,
                None => local_today(&args.timezone)?,
            };

            if !is_known_category(&category) {
                tracing::warn!(
                    "\"{category}\" is not one of the usual categories: {}",
                    KNOWN_CATEGORIES.join(", ")
                );
            }

            let new_transaction = NewTransaction::new(transaction_type, amount, &category, date)
                .description(&description);
            let transaction = open_store(connection).add_transaction(user.id, new_transaction)?;

            println!(
                "Recorded {} of {} on {} (ID {}).",
                transaction.transaction_type,
                format_currency(amount.money()),
                transaction.date,
                transaction.id
            );
        }
        Command::SetBudget {
            user,
            category,
            amount,
        } => {
            let user = find_user(&user, &connection)?;
            let budget = open_store(connection).set_budget(user.id, &category, amount)?;

            println!(
                "Budget for {} set to {}.",
                budget.category,
                format_currency(budget.amount)
            );
        }
        Command::Summary { user, json } => {
            let user = find_user(&user, &connection)?;
            let report = load_summary_report(&open_store(connection), user.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
        Command::BudgetData { user } => {
            let user = find_user(&user, &connection)?;
            let budget_data = load_budget_data(&open_store(connection), user.id)?;

            println!("{}", serde_json::to_string_pretty(&budget_data)?);
        }
        Command::Compare { user, month } => {
            let user = find_user(&user, &connection)?;
            let month = match month {
                Some(month) => month,
                None => local_today(&args.timezone)?,
            };
            let comparison = load_monthly_comparison(&open_store(connection), user.id, month)?;

            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
    }

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(connection: Connection) -> SQLiteStore {
    SQLiteStore::new(Arc::new(Mutex::new(connection)))
}

fn find_user(username: &str, connection: &Connection) -> Result<User, Box<dyn Error>> {
    match get_user_by_username(username, connection) {
        Ok(user) => Ok(user),
        Err(FinanceError::NotFound) => {
            Err(format!("there is no user named \"{username}\", add them with add-user").into())
        }
        Err(error) => Err(error.into()),
    }
}

fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
}

fn print_summary(report: &SummaryReport) {
    println!("Income:   {}", format_currency(report.summary.income));
    println!("Expenses: {}", format_currency(report.summary.expenses));
    println!("Balance:  {}", format_currency(report.summary.balance));

    if report.categories.is_empty() {
        return;
    }

    let width = report
        .categories
        .iter()
        .map(|category| category.name.chars().count())
        .max()
        .unwrap_or(0);

    println!();
    println!("By category:");

    for category in &report.categories {
        println!(
            "  {:<width$}  {}",
            category.name,
            format_currency(category.total)
        );
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
