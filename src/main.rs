use anyhow::{Context, Result};
use std::sync::Arc;

use budget_tracker_client::auth::{FileSessionStore, LoginRedirect};
use budget_tracker_client::config::{
    self, BudgetCommand, CategoryCommand, Command, Config, TransactionCommand,
};
use budget_tracker_client::models::{
    Budget, BudgetInput, Category, CategoryInput, CategoryType, DailyStats, Page, RegisterRequest,
    Summary, Transaction, TransactionFilter, TransactionInput,
};
use budget_tracker_client::{AuthGateway, GatewayOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let (config, command) = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        refresh_mode = ?config.refresh_mode,
        "Configuration loaded"
    );

    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let redirect = Arc::new(LoginRedirect::new(config.login_path.clone()));
    let gateway = AuthGateway::new(
        config.api_url.clone(),
        store,
        redirect.clone(),
        GatewayOptions {
            connect_timeout: config.http_connect_timeout,
            request_timeout: config.http_request_timeout,
            refresh_mode: config.refresh_mode,
        },
    )?;

    let result = run(&gateway, command).await;

    if result.is_err() && redirect.is_pending() {
        eprintln!(
            "Your session has ended ({}). Log in again with: budget-cli login <username>",
            redirect.login_path()
        );
    }

    result
}

async fn run(gateway: &AuthGateway, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = config::password_or_prompt(password, false)?;
            gateway
                .auth_api()
                .login(&username, &password)
                .await
                .context("Login failed")?;
            println!("Logged in as {}", username);
        }

        Command::Logout => {
            gateway.auth_api().logout()?;
            println!("Logged out");
        }

        Command::Register {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let password = config::password_or_prompt(password, true)?;
            let request = RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            let response = gateway
                .auth_api()
                .register(&request)
                .await
                .context("Registration failed")?;
            println!(
                "{} (id {}, {})",
                response.message, response.user.id, response.user.username
            );
        }

        Command::Status => {
            if gateway.auth().is_logged_in()? {
                println!("Logged in ({})", gateway.base_url());
            } else {
                println!("Not logged in");
            }
        }

        Command::Categories { action } => run_categories(gateway, action).await?,
        Command::Transactions { action } => run_transactions(gateway, action).await?,
        Command::Budgets { action } => run_budgets(gateway, action).await?,

        Command::Summary { year, month } => {
            let summary = gateway.summary().get(year, month).await?;
            print_summary(&summary);
        }
    }

    Ok(())
}

async fn run_categories(gateway: &AuthGateway, action: CategoryCommand) -> Result<()> {
    let api = gateway.categories();
    match action {
        CategoryCommand::List => print_categories(&api.list().await?),
        CategoryCommand::Create { name, kind } => {
            let category = api.create(&CategoryInput::new(name, kind)).await?;
            println!("Created category {} ({})", category.name, category.id);
        }
        CategoryCommand::Update { id, name, kind } => {
            let category = api.update(id, &CategoryInput::new(name, kind)).await?;
            println!("Updated category {} ({})", category.name, category.id);
        }
        CategoryCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}

async fn run_transactions(gateway: &AuthGateway, action: TransactionCommand) -> Result<()> {
    let api = gateway.transactions();
    match action {
        TransactionCommand::List {
            page,
            page_size,
            start_date,
            end_date,
            category,
            min_amount,
            max_amount,
            kind,
        } => {
            let filter = TransactionFilter {
                page,
                page_size,
                start_date,
                end_date,
                category,
                min_amount,
                max_amount,
                kind,
            };
            let result = api.list(&filter).await?;
            print_transactions(&result, page.unwrap_or(1), page_size.unwrap_or(10));
        }
        TransactionCommand::Get { id } => {
            let tx = api.get(id).await?;
            print_transaction_row(&tx);
        }
        TransactionCommand::Create {
            category,
            amount,
            date,
            note,
        } => {
            let input = TransactionInput {
                category,
                amount,
                date,
                note,
            };
            let tx = api.create(&input).await?;
            println!("Created transaction {}", tx.id);
        }
        TransactionCommand::Update {
            id,
            category,
            amount,
            date,
            note,
        } => {
            let input = TransactionInput {
                category,
                amount,
                date,
                note,
            };
            let tx = api.update(id, &input).await?;
            println!("Updated transaction {}", tx.id);
        }
        TransactionCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted transaction {}", id);
        }
        TransactionCommand::Stats { start, end } => {
            print_stats(&api.stats(start, end).await?);
        }
    }
    Ok(())
}

async fn run_budgets(gateway: &AuthGateway, action: BudgetCommand) -> Result<()> {
    let api = gateway.budgets();
    match action {
        BudgetCommand::List { year, month } => print_budgets(&api.list(year, month).await?),
        BudgetCommand::Create {
            year,
            month,
            amount,
        } => {
            let budget = api.create(&BudgetInput { year, month, amount }).await?;
            println!(
                "Created budget {}-{:02}: {} ({})",
                budget.year, budget.month, budget.amount, budget.id
            );
        }
        BudgetCommand::Update {
            id,
            year,
            month,
            amount,
        } => {
            let budget = api.update(id, &BudgetInput { year, month, amount }).await?;
            println!(
                "Updated budget {}-{:02}: {}",
                budget.year, budget.month, budget.amount
            );
        }
        BudgetCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted budget {}", id);
        }
    }
    Ok(())
}

// === Output ===

fn print_categories(page: &Page<Category>) {
    if page.items.is_empty() {
        println!("No categories");
        return;
    }
    println!("{:>6}  {:<8}  NAME", "ID", "TYPE");
    for category in &page.items {
        println!("{:>6}  {:<8}  {}", category.id, category.kind, category.name);
    }
}

fn print_transaction_row(tx: &Transaction) {
    println!(
        "{:>6}  {}  {:>12}  {:<20}  {}",
        tx.id,
        tx.date,
        tx.signed_amount(),
        tx.category_name.as_deref().unwrap_or("-"),
        tx.note.as_deref().unwrap_or("")
    );
}

fn print_transactions(page: &Page<Transaction>, current: u32, page_size: u32) {
    if page.items.is_empty() {
        println!("No transactions");
        return;
    }
    println!(
        "{:>6}  {:<10}  {:>12}  {:<20}  NOTE",
        "ID", "DATE", "AMOUNT", "CATEGORY"
    );
    for tx in &page.items {
        print_transaction_row(tx);
    }
    println!(
        "Page {} of {} ({} transactions)",
        current,
        page.total_pages(page_size),
        page.count
    );
}

fn print_stats(stats: &[DailyStats]) {
    if stats.is_empty() {
        println!("No transactions in range");
        return;
    }
    println!("{:<10}  {:>12}  {:>12}  {:>12}", "DAY", "INCOME", "EXPENSES", "NET");
    for day in stats {
        println!(
            "{:<10}  {:>12}  {:>12}  {:>12}",
            day.day,
            day.total_income.unwrap_or_default(),
            day.total_expenses.unwrap_or_default(),
            day.net()
        );
    }
}

fn print_budgets(page: &Page<Budget>) {
    if page.items.is_empty() {
        println!("No budgets");
        return;
    }
    println!("{:>6}  {:<7}  {:>12}", "ID", "MONTH", "AMOUNT");
    for budget in &page.items {
        println!(
            "{:>6}  {}-{:02}  {:>12}",
            budget.id, budget.year, budget.month, budget.amount
        );
    }
}

fn print_summary(summary: &Summary) {
    println!("Income:    {:>12}", summary.total_income);
    println!("Expenses:  {:>12}", summary.total_expenses);
    println!("Balance:   {:>12}", summary.balance);

    match (summary.monthly_budget, summary.budget_variance) {
        (Some(budget), Some(variance)) => {
            println!("Budget:    {:>12}", budget);
            println!("Remaining: {:>12}", variance);
            if let Some(percent) = summary.budget_used_percent() {
                let marker = if summary.is_over_budget() { "  OVER BUDGET" } else { "" };
                println!("Used:      {:>11}%{}", percent, marker);
            }
        }
        _ => println!("Budget:    not set"),
    }

    for kind in [CategoryType::Income, CategoryType::Expense] {
        let totals = summary.totals_by_category(kind);
        if totals.is_empty() {
            continue;
        }
        println!();
        println!("{} by category:", kind);
        for (name, amount) in totals {
            println!("  {:<20} {:>12}", name, amount);
        }
    }
}
