use actlog_db::{connect_postgres, migrate};

#[tokio::main]
async fn main() {
    let Ok(db_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set");
        std::process::exit(2);
    };
    let pool = match connect_postgres(&db_url).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("failed to connect to database: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = migrate(&pool).await {
        eprintln!("failed to run migrations: {err}");
        std::process::exit(1);
    }
}
