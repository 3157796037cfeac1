use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use f5xc_client::F5Client;
use f5xc_config::{F5ConfigBuilder, RetryPolicy};
use f5xc_resource::registry::{self, KindEntry, KindVisitor};
use f5xc_resource::{Context, ResourceMapper, ResourceState};
use f5xc_types::{ObjectId, Spec};

/// Inspect and clean up F5 Distributed Cloud objects
#[derive(Parser, Debug)]
#[command(name = "f5xc-ctl", version, about, long_about = None)]
struct Cli {
    /// tenant api url, e.g. https://acme.console.ves.volterra.io
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// config file instead of ~/.f5xc/config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// retry throttled and failed requests this many times
    #[arg(long, global = true)]
    retries: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every known resource type
    Kinds,
    /// Print the import id of an object
    ImportId { namespace: String, name: String },
    /// Split an import id into namespace and name
    ParseId { id: String },
    /// Show one object, addressed by import id
    Get { resource_type: String, id: String },
    /// List objects of a kind in a namespace
    List {
        resource_type: String,
        namespace: String,
    },
    /// Delete one object, addressed by import id
    Delete { resource_type: String, id: String },
    /// Show object quotas of a namespace, optionally for one object type
    Quota {
        namespace: String,
        object_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "starting");

    match &cli.command {
        Command::Kinds => {
            for entry in registry::entries() {
                let scope = if entry.name_spaced() {
                    "namespaced"
                } else {
                    "tenant"
                };
                println!(
                    "{:<40} {:<10} {:?}",
                    entry.resource_type(),
                    scope,
                    entry.class()
                );
            }
            Ok(())
        }
        Command::ImportId { namespace, name } => {
            println!("{}", ObjectId::import_id(namespace, name));
            Ok(())
        }
        Command::ParseId { id } => {
            let object_id = ObjectId::parse_import_id(id)?;
            println!("namespace: {}", object_id.namespace);
            println!("name:      {}", object_id.name);
            Ok(())
        }
        Command::Get { resource_type, id } => {
            let action = Action::Get(id.clone());
            run(&cli, resource_type, action).await
        }
        Command::List {
            resource_type,
            namespace,
        } => {
            let action = Action::List(namespace.clone());
            run(&cli, resource_type, action).await
        }
        Command::Delete { resource_type, id } => {
            let action = Action::Delete(id.clone());
            run(&cli, resource_type, action).await
        }
        Command::Quota {
            namespace,
            object_type,
        } => {
            let usage = client(&cli)?.quota_usage(namespace).await?;
            let output = match object_type {
                Some(object_type) => serde_json::to_value(
                    usage
                        .info(object_type)
                        .ok_or_else(|| anyhow!("no quota reported for {object_type}"))?,
                )?,
                None => serde_json::to_value(usage.all())?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

fn client(cli: &Cli) -> Result<Arc<F5Client>> {
    let mut builder = F5ConfigBuilder::default();
    if let Some(api_url) = &cli.api_url {
        builder = builder.api_url(api_url.as_str());
    }
    if let Some(path) = &cli.config {
        builder = builder.config_path(path.clone());
    }
    if let Some(retries) = cli.retries {
        builder = builder.retry(RetryPolicy::with_retries(retries));
    }
    let config = builder.build()?;
    Ok(Arc::new(F5Client::new(config)?))
}

async fn run(cli: &Cli, resource_type: &str, action: Action) -> Result<()> {
    let client = client(cli)?;
    let work = registry::visit(resource_type, Visit { client, action })
        .ok_or_else(|| anyhow!("unknown resource type: {resource_type}"))?;
    if let Some(output) = work.await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

enum Action {
    Get(String),
    List(String),
    Delete(String),
}

struct Visit {
    client: Arc<F5Client>,
    action: Action,
}

impl KindVisitor for Visit {
    type Output = BoxFuture<'static, Result<Option<Value>>>;

    fn visit<S: Spec + 'static>(self, entry: &'static KindEntry) -> Self::Output {
        let Visit { client, action } = self;
        let mapper: ResourceMapper<S, F5Client> =
            ResourceMapper::new(client).with_class(entry.class());
        let timeouts = entry.timeouts();

        async move {
            match action {
                Action::Get(id) => {
                    let ctx = Context::background().with_timeout(timeouts.read);
                    let obj = mapper.import(&ctx, &id).await?;
                    Ok(Some(serde_json::to_value(ResourceState::from_object(&obj)?)?))
                }
                Action::List(namespace) => {
                    let ctx = Context::background().with_timeout(timeouts.read);
                    let states = mapper
                        .list(&ctx, &namespace)
                        .await?
                        .iter()
                        .map(ResourceState::from_object)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Some(serde_json::to_value(states)?))
                }
                Action::Delete(id) => {
                    let object_id = ObjectId::parse_import_id(&id)?;
                    let ctx = Context::background().with_timeout(timeouts.delete);
                    mapper
                        .delete(&ctx, &object_id.namespace, &object_id.name)
                        .await?;
                    eprintln!("{} '{}' deleted", S::label(), object_id);
                    Ok(None)
                }
            }
        }
        .boxed()
    }
}
