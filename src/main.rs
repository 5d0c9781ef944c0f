//! Postwire demo binary.
//!
//! Seeds a server, opens post and comment subscriptions, runs a short script
//! of mutations and prints every delivered event as a JSON line.

use clap::Parser;
use postwire::{
    Args, CreateCommentInput, CreatePostInput, RecordStore, Server, ServerConfig, Subscription,
    UpdateCommentInput, UpdatePostInput,
};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ServerConfig::from(&args);

    let store = if args.empty {
        RecordStore::new()
    } else {
        RecordStore::demo()
    };
    let server = Server::with_store(config, store);

    let mut printers = vec![print_events(Arc::new(server.subscribe_to_posts()))];
    if let Some(post) = server.posts(None).into_iter().find(|p| p.published) {
        printers.push(print_events(Arc::new(server.subscribe_to_comments(&post.id)?)));
    }
    if server.config().count_enabled {
        printers.push(print_events(Arc::new(server.subscribe_to_count())));
    }
    let ticker = server.start_count_ticker();

    run_script(&server)?;

    thread::sleep(Duration::from_millis(args.linger_ms));
    if let Some(ticker) = ticker {
        ticker.stop();
    }
    server.shutdown();

    for printer in printers {
        printer
            .join()
            .map_err(|_| anyhow::anyhow!("event printer panicked"))??;
    }
    Ok(())
}

/// Print each payload on its own line until the subscription ends.
fn print_events(subscription: Arc<Subscription>) -> JoinHandle<anyhow::Result<()>> {
    thread::spawn(move || {
        for payload in subscription.iter() {
            println!("{} {}", subscription.channel(), payload.to_json()?);
        }
        Ok(())
    })
}

fn run_script(server: &Server) -> anyhow::Result<()> {
    let Some(author) = server.users(None).into_iter().next() else {
        info!("empty store, nothing to script");
        return Ok(());
    };

    // Drafts stay silent until published
    let draft = server.create_post(CreatePostInput {
        title: "Sourdough Starters".into(),
        body: "Feed it daily.".into(),
        published: false,
        author: author.id.clone(),
    })?;
    server.update_post(
        &draft.id,
        UpdatePostInput {
            published: Some(true),
            ..Default::default()
        },
    )?;

    if let Some(post) = server.posts(None).into_iter().find(|p| p.published && p.id != draft.id) {
        let comment = server.create_comment(CreateCommentInput {
            text: "Following along.".into(),
            author: author.id.clone(),
            post: post.id.clone(),
        })?;
        server.update_comment(
            &comment.id,
            UpdateCommentInput {
                text: Some("Following along!".into()),
            },
        )?;
        server.delete_comment(&comment.id)?;
    }

    server.update_post(
        &draft.id,
        UpdatePostInput {
            published: Some(false),
            ..Default::default()
        },
    )?;
    server.delete_post(&draft.id)?;

    info!("script finished");
    Ok(())
}
