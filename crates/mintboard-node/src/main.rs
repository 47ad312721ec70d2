use clap::Parser;
use mintboard_logging::{FileConfig, MintboardSubscriberBuilder};
use mintboard_node::{Cli, Command, NodeConfig, RegistryNode};
use mintboard_registry::{ArtifactId, ArtifactRecord, DonationReceipt, Post, RegistryEvent, actor_hex};
use serde_json::{Value, json};
use tracing::info;

fn artifact_json(record: &ArtifactRecord, gateway: &str) -> Value {
    json!({
        "id": record.id.value(),
        "name": record.name,
        "description": record.description,
        "content_pointer": record.content_pointer.as_str(),
        "content_url": record.content_pointer.gateway_url(gateway),
        "owner": actor_hex(&record.owner),
        "total_donations": record.total_donations.to_string(),
    })
}

fn receipt_json(receipt: &DonationReceipt) -> Value {
    json!({
        "id": receipt.id.value(),
        "donor": actor_hex(&receipt.donor),
        "payee": actor_hex(&receipt.payee),
        "amount": receipt.amount.to_string(),
        "total_donations": receipt.total_donations.to_string(),
    })
}

fn post_json(post: &Post) -> Value {
    json!({
        "index": post.index,
        "author": actor_hex(&post.author),
        "text": post.text,
    })
}

async fn run(node: &RegistryNode, command: Command) -> anyhow::Result<Value> {
    let gateway = node.config().gateway.clone();

    let output = match command {
        Command::Mint {
            caller,
            name,
            description,
            pointer,
        } => {
            let id = node.mint(&name, &description, &pointer, caller).await?;
            json!({ "id": id.value() })
        }
        Command::Donate { caller, id, amount } => {
            let receipt = node.donate(ArtifactId(id), amount, caller).await?;
            receipt_json(&receipt)
        }
        Command::Show { id, gateway: over } => {
            let record = node.get(ArtifactId(id)).await?;
            artifact_json(&record, over.as_deref().unwrap_or(&gateway))
        }
        Command::List { search, owner } => {
            let mut records = match search {
                Some(term) => node.search(&term).await?,
                None => node.list().await?,
            };
            if let Some(owner) = owner {
                records.retain(|r| r.owner == owner);
            }
            Value::Array(records.iter().map(|r| artifact_json(r, &gateway)).collect())
        }
        Command::Post { caller, text } => {
            let index = node.append(&text, caller).await?;
            json!({ "index": index })
        }
        Command::Posts { author } => {
            let posts = match author {
                Some(author) => node.posts_by(&author).await?,
                None => node.posts().await?,
            };
            Value::Array(posts.iter().map(post_json).collect())
        }
    };

    Ok(output)
}

fn log_event(event: &RegistryEvent) {
    match event {
        RegistryEvent::Minted {
            id,
            owner,
            content_pointer,
        } => info!(kind = event.kind(), artifact_id = %id, owner = %actor_hex(owner), pointer = %content_pointer, "Event"),
        RegistryEvent::DonationReceived { id, donor, amount } => {
            info!(kind = event.kind(), artifact_id = %id, donor = %actor_hex(donor), %amount, "Event")
        }
        RegistryEvent::PostAdded { index, author } => {
            info!(kind = event.kind(), index, author = %actor_hex(author), "Event")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let mut logging = MintboardSubscriberBuilder::new().with_config(config.log.clone());
    if let Some(level) = cli.log_level {
        logging = logging.with_level(level);
    }
    if let Some(dir) = cli.log_dir {
        logging = logging.with_file_output(FileConfig::in_dir(dir));
    }
    let _guard = logging.try_init()?;

    let node = RegistryNode::open(config).await?;
    let mut events = node.subscribe();

    let output = run(&node, cli.command).await?;

    while let Ok(event) = events.try_recv() {
        log_event(&event);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
