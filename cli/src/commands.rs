//! Command handlers. Each loads state, acts, and saves if it mutated.

use std::io::BufRead;

use anyhow::Context;
use zeroize::Zeroizing;

use cosign_client::dto::format_node_version;
use cosign_client::{FetchParams, NodeClient, ReqwestTransport};
use cosign_core::{AppState, CosignerConfig, SigningOrchestrator};
use cosign_registry::{AddAddressParams, AddNodeParams, AddressFilter, UpdateAddressParams};
use cosign_store::JsonFileStore;
use cosign_types::{Address, NodeId, Timestamp};
use cosign_utils::format_time_left;

use crate::{AddressAction, Command, NodeAction, TxAction};

const PRIVATE_KEY_ENV: &str = "COSIGNER_PRIVATE_KEY";

struct Session {
    store: JsonFileStore,
    state: AppState,
    client: NodeClient<ReqwestTransport>,
}

impl Session {
    fn open(config: &CosignerConfig) -> anyhow::Result<Self> {
        let store = JsonFileStore::open_in_dir(&config.data_dir)
            .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
        let state = AppState::load(&store, config.network)?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        let client = NodeClient::new(transport, config.request_timeout());
        Ok(Self {
            store,
            state,
            client,
        })
    }

    fn save(&self) -> anyhow::Result<()> {
        self.state.save(&self.store)?;
        Ok(())
    }
}

pub async fn run(command: Command, config: &CosignerConfig) -> anyhow::Result<()> {
    let mut session = Session::open(config)?;
    match command {
        Command::Address { action } => address(&mut session, action),
        Command::Node { action } => node(&mut session, action, config).await,
        Command::Network { network } => {
            let active = session
                .state
                .nodes
                .switch_active_network(network, Timestamp::now())
                .map(|n| n.url.clone());
            session.save()?;
            match active {
                Some(url) => println!("network {network}, active node {url}"),
                None => println!("network {network}, no active node (run `node check` first)"),
            }
            Ok(())
        }
        Command::Tx { action } => tx(&session, action, config).await,
        Command::Sign { hash } => sign(&session, &hash).await,
    }
}

fn address(session: &mut Session, action: AddressAction) -> anyhow::Result<()> {
    let now = Timestamp::now();
    let registry = &mut session.state.addresses;
    match action {
        AddressAction::Add {
            address,
            memo,
            active,
        } => {
            let record = registry.add(
                AddAddressParams {
                    address,
                    memo,
                    active,
                },
                now,
            )?;
            println!("added {}", record.address.pretty());
        }
        AddressAction::List { active, search } => {
            for record in registry.list(&AddressFilter {
                active_only: active,
                search,
            }) {
                println!(
                    "{} {}  {}",
                    if record.active { "*" } else { " " },
                    record.address.pretty(),
                    record.memo
                );
            }
            return Ok(());
        }
        AddressAction::Remove { address } => {
            let removed = registry.remove(&Address::parse(&address)?)?;
            println!("removed {}", removed.address.pretty());
        }
        AddressAction::Activate { address } => {
            let record = registry.set_active(&Address::parse(&address)?, now)?;
            println!("active address {}", record.address.pretty());
        }
        AddressAction::Memo { address, memo } => {
            registry.update(
                &Address::parse(&address)?,
                UpdateAddressParams {
                    memo: Some(memo),
                    ..Default::default()
                },
                now,
            )?;
        }
    }
    session.save()
}

async fn node(
    session: &mut Session,
    action: NodeAction,
    config: &CosignerConfig,
) -> anyhow::Result<()> {
    let now = Timestamp::now();
    let timeout = config.health_check_timeout();
    match action {
        NodeAction::Add {
            url,
            network,
            memo,
            active,
        } => {
            let id = match network {
                Some(network) => session
                    .state
                    .nodes
                    .add(
                        AddNodeParams {
                            url,
                            network,
                            memo,
                            active,
                        },
                        now,
                    )?
                    .id
                    .clone(),
                None => {
                    session
                        .state
                        .add_detected_node(&session.client, &url, &memo, active, timeout, now)
                        .await?
                }
            };
            println!("added node {id}");
        }
        NodeAction::List { network } => {
            for record in session.state.nodes.sorted(network) {
                println!(
                    "{} {}  {:<8} {:<8} {:<9} {}  {}",
                    if record.active { "*" } else { " " },
                    record.id,
                    record.network,
                    record.status,
                    record.quality(),
                    record.url,
                    record.memo
                );
            }
            return Ok(());
        }
        NodeAction::Remove { id } => {
            let removed = session.state.nodes.remove(&NodeId::new(id))?;
            println!("removed {}", removed.url);
        }
        NodeAction::Activate { id } => {
            let record = session.state.nodes.set_active(&NodeId::new(id), now)?;
            println!("active {} node {}", record.network, record.url);
        }
        NodeAction::Check { network } => {
            let records = session
                .state
                .refresh_health(&session.client, network, timeout, now)
                .await;
            for record in &records {
                let url = session
                    .state
                    .nodes
                    .get(&record.node_id)
                    .map(|n| n.url.as_str())
                    .unwrap_or("?");
                match (&record.error, record.response_time_ms) {
                    (Some(error), _) => println!("{} offline  {url}  {error}", record.node_id),
                    (None, Some(ms)) => println!("{} online   {url}  {ms} ms", record.node_id),
                    (None, None) => println!("{} online   {url}", record.node_id),
                }
            }
        }
        NodeAction::Detect { url } => {
            let (network, info) = session.client.detect_network(&url, timeout).await?;
            println!("network:  {network}");
            if let Some(version) = info.version {
                println!("version:  {}", format_node_version(version));
            }
            if let Some(name) = &info.friendly_name {
                println!("name:     {name}");
            }
            return Ok(());
        }
        NodeAction::Bootstrap => {
            let added = session.state.nodes.bootstrap_presets(now);
            println!("added {added} preset nodes");
        }
    }
    session.save()
}

async fn tx(session: &Session, action: TxAction, config: &CosignerConfig) -> anyhow::Result<()> {
    let TxAction::List {
        address,
        page,
        page_size,
        order,
        all,
    } = action;

    let node = session
        .state
        .nodes
        .active()
        .context("no active node on the current network")?;
    let address = match address {
        Some(address) => address,
        None => session
            .state
            .addresses
            .active()
            .map(|r| r.address.to_string())
            .context("no active address; pass --address")?,
    };
    let parsed = Address::parse(&address)?;

    let mut params = FetchParams::new(node.url.clone(), address, node.network);
    params.page_number = page;
    params.page_size = page_size.unwrap_or(config.page_size);
    params.order = order;

    let now = Timestamp::now();
    let transactions = session.client.fetch_pending(&params).await?;
    for tx in transactions.iter().filter(|tx| all || !tx.is_signed_by(&parsed)) {
        println!(
            "{}  from {}  cosigs {}  expires in {}",
            tx.hash,
            tx.signer_address.pretty(),
            tx.cosignature_count,
            format_time_left(now, tx.created_at)
        );
    }
    Ok(())
}

fn read_private_key() -> anyhow::Result<Zeroizing<String>> {
    if let Ok(key) = std::env::var(PRIVATE_KEY_ENV) {
        return Ok(Zeroizing::new(key));
    }
    eprintln!("private key:");
    let mut line = Zeroizing::new(String::new());
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(Zeroizing::new(line.trim().to_string()))
}

async fn sign(session: &Session, hash: &str) -> anyhow::Result<()> {
    let ctx = session.state.signing_context();
    let orchestrator = SigningOrchestrator::new();
    let missing = orchestrator.missing_requirements(&ctx);
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(ToString::to_string).collect();
        anyhow::bail!("cannot sign, missing {}", list.join(", "));
    }

    let key = read_private_key()?;
    let result = orchestrator.sign(&session.client, &ctx, key, hash).await;
    let state = orchestrator.state();
    if let Some(cosignature) = &state.cosignature {
        println!("signer:    {}", cosignature.signer_public_key);
        println!("signature: {}", cosignature.signature);
    }
    println!("{}", state.progress_message());
    result?;
    Ok(())
}
