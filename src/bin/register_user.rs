//! Utility to register a user in the database
//! Usage: cargo run --bin register_user -- <azure_id> [name] [email]

use phs::config::Config;
use phs::tools::users;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let Some(azure_id) = args.get(1) else {
        eprintln!("Usage: register_user <azure_id> [name] [email]");
        std::process::exit(2);
    };
    let name = args.get(2).map(String::as_str);
    let email = args.get(3).map(String::as_str);

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = phs::db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        phs::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let result = users::check_or_create_user(&database, Some(azure_id.as_str()), name, email, None)?;
    if result.exists {
        println!("User {} was already registered", azure_id);
    } else {
        println!("Registered user {}", azure_id);
    }

    if let Some(profile) = users::get_profile(&database, azure_id)? {
        println!("  Name: {}", profile.name.as_deref().unwrap_or("-"));
        println!("  Email: {}", profile.email.as_deref().unwrap_or("-"));
        println!("  Created: {}", profile.created_at);
    }

    Ok(())
}
