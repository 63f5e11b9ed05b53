//! Walkthrough of the context-scoped cache
//!
//! This example shows how to:
//! - Bind a cache at a request boundary and declare keys
//! - Set and read typed values
//! - Keep a value for a background task past teardown
//! - Read the errors the cache reports

use ctxcache::{Context, TypedKey};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const USER_ID: TypedKey<i32> = TypedKey::new("user_id");
const USER_NAME: TypedKey<String> = TypedKey::new("user_name");
const PERMISSIONS: TypedKey<Vec<String>> = TypedKey::new("permissions");
const TASK_ID: TypedKey<String> = TypedKey::new("task_id");

fn basic_usage() -> anyhow::Result<()> {
    // Step 1: bind a cache to the request context
    let (ctx, teardown) = ctxcache::init(&Context::background());
    let _guard = teardown.guard();

    // Step 2: declare every key up front
    ctxcache::declare(&ctx, &[USER_ID]);
    ctxcache::declare(&ctx, &[USER_NAME]);
    ctxcache::declare(&ctx, &[PERMISSIONS]);

    // Step 3: set each value once
    ctxcache::set(&ctx, &USER_ID, 12345)?;
    ctxcache::set(&ctx, &USER_NAME, "Alice".to_string())?;
    ctxcache::set(&ctx, &PERMISSIONS, vec!["read".to_string(), "write".to_string()])?;

    // Step 4: read them anywhere the context travels
    println!("   User ID: {}", ctxcache::get(&ctx, &USER_ID)?);
    println!("   User Name: {}", ctxcache::get(&ctx, &USER_NAME)?);
    println!("   Permissions: {:?}", ctxcache::get(&ctx, &PERMISSIONS)?);

    Ok(())
}

async fn keep_alive() -> anyhow::Result<()> {
    let (ctx, teardown) = ctxcache::init(&Context::background());

    ctxcache::declare(&ctx, &[TASK_ID]);
    ctxcache::set(&ctx, &TASK_ID, "task-12345".to_string())?;
    ctxcache::keep_alive(&ctx, &TASK_ID);

    // The background task holds its own clone of the context
    let background = tokio::spawn({
        let ctx = ctx.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            match ctxcache::get(&ctx, &TASK_ID) {
                Ok(task_id) => println!("   Background task ID: {}", task_id),
                Err(e) => println!("   Background task error: {}", e),
            }
            ctx
        }
    });

    tokio::time::sleep(Duration::from_millis(200)).await;

    // End of the request
    if let Some(report) = teardown.cancel_with_report() {
        println!("   {}", report);
    }

    let ctx = background.await?;
    println!(
        "   Retained after teardown: {}",
        ctxcache::contains(&ctx, &TASK_ID)
    );

    Ok(())
}

fn error_handling() -> anyhow::Result<()> {
    let ctx = Context::background();

    if let Err(e) = ctxcache::get(&ctx, &USER_ID) {
        println!("   Expected error: {}", e);
    }

    let (ctx, teardown) = ctxcache::init(&ctx);
    let _guard = teardown.guard();

    if let Err(e) = ctxcache::get(&ctx, &USER_ID) {
        println!("   Expected error: {}", e);
    }

    ctxcache::declare(&ctx, &[USER_ID]);

    if let Err(e) = ctxcache::get(&ctx, &USER_ID) {
        println!("   Expected error: {}", e);
    }

    ctxcache::set(&ctx, &USER_ID, 42)?;
    println!("   User ID: {}", ctxcache::get(&ctx, &USER_ID)?);

    if let Err(e) = ctxcache::set(&ctx, &USER_ID, 43) {
        println!("   Expected error: {}", e);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("1. Basic cache usage");
    basic_usage()?;

    println!("\n2. Keep-alive for background work");
    keep_alive().await?;

    println!("\n3. Error handling");
    error_handling()?;

    Ok(())
}
