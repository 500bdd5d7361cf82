use std::sync::Arc;
use tempfile::TempDir;

use fintrack_core::budgets::{BudgetRepository, BudgetRepositoryTrait, BudgetService};
use fintrack_core::categories::categories_model::CategoryType;
use fintrack_core::categories::{
    CategoryRepository, CategoryRepositoryTrait, CategoryService, CategoryServiceTrait,
};
use fintrack_core::db;
use fintrack_core::goals::{GoalRepository, GoalRepositoryTrait, GoalService};
use fintrack_core::ledger::LedgerService;
use fintrack_core::transactions::transactions_model::{TransactionInput, TransactionType};
use fintrack_core::transactions::{
    Transaction, TransactionRepository, TransactionRepositoryTrait, TransactionService,
    TransactionServiceTrait,
};
use fintrack_core::users::{
    User, UserInput, UserRepository, UserRepositoryTrait, UserService, UserServiceTrait,
};

/// Full service graph wired against a throwaway sqlite database
pub struct TestApp {
    pub users: UserService,
    pub categories: Arc<CategoryService>,
    pub transactions: TransactionService,
    pub budgets: BudgetService,
    pub goals: GoalService,
    pub ledger: LedgerService,
    _dir: TempDir,
}

pub fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path =
        db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let user_repo: Arc<dyn UserRepositoryTrait> = Arc::new(UserRepository::new(pool.clone()));
    let category_repo: Arc<dyn CategoryRepositoryTrait> =
        Arc::new(CategoryRepository::new(pool.clone()));
    let transaction_repo: Arc<dyn TransactionRepositoryTrait> =
        Arc::new(TransactionRepository::new(pool.clone()));
    let budget_repo: Arc<dyn BudgetRepositoryTrait> = Arc::new(BudgetRepository::new(pool.clone()));
    let goal_repo: Arc<dyn GoalRepositoryTrait> = Arc::new(GoalRepository::new(pool.clone()));

    let categories = Arc::new(CategoryService::new(category_repo.clone()));
    let transactions = TransactionService::new(
        transaction_repo.clone(),
        category_repo.clone(),
        goal_repo.clone(),
    );
    let budgets = BudgetService::new(
        budget_repo.clone(),
        category_repo.clone(),
        transaction_repo.clone(),
    );
    let goals = GoalService::new(
        goal_repo.clone(),
        transaction_repo.clone(),
        category_repo.clone(),
    );
    let ledger = LedgerService::new(transaction_repo.clone(), goal_repo.clone());
    let category_service: Arc<dyn CategoryServiceTrait> = categories.clone();
    let users = UserService::new(
        user_repo,
        category_service,
        transaction_repo,
        budget_repo,
        goal_repo,
    );

    TestApp {
        users,
        categories,
        transactions,
        budgets,
        goals,
        ledger,
        _dir: dir,
    }
}

pub fn create_user(app: &TestApp, name: &str, email: &str) -> User {
    app.users
        .create_user(UserInput {
            name: name.to_string(),
            email: email.to_string(),
        })
        .expect("Failed to create user")
}

pub fn category_id(app: &TestApp, user_id: &str, name: &str, kind: CategoryType) -> String {
    app.categories
        .get_categories(user_id, Some(kind))
        .expect("Failed to list categories")
        .into_iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("No category named {}", name))
        .id
}

pub fn record(
    app: &TestApp,
    user_id: &str,
    category: &str,
    kind: TransactionType,
    amount: f64,
) -> Transaction {
    let category_type = match kind {
        TransactionType::Income => CategoryType::Income,
        TransactionType::Expense => CategoryType::Expense,
    };
    app.transactions
        .create_transaction(
            user_id,
            TransactionInput {
                category_id: category_id(app, user_id, category, category_type),
                transaction_type: kind,
                amount,
                description: format!("{} of {}", kind, amount),
                date: chrono::Utc::now(),
                tags: None,
                location: None,
                notes: None,
                payment_method: None,
            },
        )
        .expect("Failed to record transaction")
}
