//! Basic session example
//!
//! Usage:
//!   CHAT_SERVER_URL=http://localhost:5000 CHAT_EMAIL=jane@example.com CHAT_PASSWORD=secret \
//!     cargo run --example basic_session

use chatapp_rs_client::{ChatClient, ClientConfig, FileKeyStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from_env()?;
    let storage_dir = std::env::var("CHAT_STORAGE_DIR").unwrap_or_else(|_| ".chat-session".to_string());

    println!("=== Chat Rust Client Example ===");
    println!("Server: {}", config.base_url);
    println!("Policy: {:?}", config.expired_token_policy);
    println!();

    let client = ChatClient::new(config, Arc::new(FileKeyStore::new(&storage_dir)))?;

    match client.current_user().await? {
        Some(user) => println!("✓ Restored session for {}", user.username.as_deref().unwrap_or(&user.id)),
        None => {
            let email = std::env::var("CHAT_EMAIL")?;
            let password = std::env::var("CHAT_PASSWORD")?;

            println!("Logging in as {email}...");
            let envelope = match client.login(&email, &password).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    println!("! Login failed: {}", e.message());
                    return Ok(());
                }
            };
            if !client.apply_session(&envelope).await? {
                println!("! Login rejected: {}", envelope.message);
                return Ok(());
            }
            println!("✓ {}", envelope.message);
        }
    }
    println!();

    // Token is attached (and refreshed when expired) automatically
    println!("Fetching chats...");
    match client.get_all_chats().await {
        Ok(envelope) => {
            for chat in envelope.result.unwrap_or_default() {
                println!("  - {} ({} unread)", chat.name.as_deref().unwrap_or(&chat.id), chat.unread_count);
            }
        }
        Err(e) => println!("! Failed to fetch chats: {} (status {:?})", e.message(), e.status()),
    }
    println!();

    if std::env::var("CHAT_LOGOUT").is_ok() {
        client.logout().await?;
        println!("✓ Logged out");
    }

    Ok(())
}
