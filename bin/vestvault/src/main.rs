//! vestvault deploys the Vesting and Vault contracts and talks to the deployed vault.

mod cli;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use cli::{AccountArgs, AmountArgs, Cli, Command, DeployArgs, NetworkArgs, VaultArgs};
use vestvault_deploy::{
    ChainNetwork, Deployer, DeployerBuilder, DeploymentRecord, NetworkConfig, RECORD_FILENAME,
    RpcNetwork, TxSettings, VaultClient, default_outdata,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger. Stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Deploy(args) => deploy(args).await,
        Command::Deposit(args) => deposit(args).await,
        Command::Withdraw(args) => withdraw(args).await,
        Command::Balance(args) => balance(args).await,
        Command::VestingSchedule(args) => vesting_schedule(args).await,
        Command::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "vestvault",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

async fn deploy(args: DeployArgs) -> Result<()> {
    // If a config file is provided, load it and deploy
    if let Some(config_path) = &args.config {
        let deployer = Deployer::load_from_file(config_path)?;

        tracing::info!(
            config_path = %config_path.display(),
            outdata_path = %deployer.outdata.display(),
            network = %deployer.network.name,
            "Loading deployment from config file..."
        );

        deployer.deploy().await?;
        return Ok(());
    }

    // Otherwise, create a new deployment from CLI arguments
    let mut builder = DeployerBuilder::new(args.network.rpc_url()?)
        .network_name(args.network.network_name()?)
        .receipt_timeout_secs(args.network.receipt_timeout)
        .poll_interval_ms(args.network.poll_interval);

    if let Some(outdata) = args.outdata {
        builder = builder.outdata(outdata);
    }
    if let Some(artifacts) = args.artifacts {
        builder = builder.artifacts_dir(artifacts);
    }
    if let Some(vesting) = args.vesting {
        builder = builder.vesting_contract(vesting);
    }
    if let Some(vault) = args.vault {
        builder = builder.vault_contract(vault);
    }
    if let Some(from) = args.network.from {
        builder = builder.from(from);
    }
    if let Some(gas_limit) = args.gas_limit {
        builder = builder.gas_limit(gas_limit);
    }

    let deployer = builder.build()?;

    // Save the configuration to Vestvault.toml before deploying
    deployer.save_config()?;

    deployer.deploy().await?;

    Ok(())
}

/// A connected vault client along with the node it talks to.
struct VaultSession {
    network: RpcNetwork,
    vault: Address,
    sender: Address,
}

impl VaultSession {
    async fn open(args: &VaultArgs) -> Result<Self> {
        let network = connect(&args.network)?;

        let vault = match args.address {
            Some(address) => address,
            None => recorded_vault(args, &network).await?,
        };

        let sender = match args.network.from {
            Some(from) => from,
            None => network
                .accounts()
                .await
                .context("Failed to list node accounts")?
                .first()
                .copied()
                .context("The node exposes no accounts; pass --from with an unlocked account")?,
        };

        tracing::debug!(
            rpc_url = %network.url(),
            vault = %vault,
            sender = %sender,
            "Vault session opened"
        );
        Ok(Self {
            network,
            vault,
            sender,
        })
    }

    fn client(&self) -> VaultClient<'_, RpcNetwork> {
        VaultClient::new(&self.network, self.vault, TxSettings::new(self.sender))
    }
}

fn connect(args: &NetworkArgs) -> Result<RpcNetwork> {
    NetworkConfig {
        name: args.network_name()?,
        rpc_url: args.rpc_url()?,
        receipt_timeout_secs: args.receipt_timeout,
        poll_interval_ms: args.poll_interval,
    }
    .connect()
}

/// Vault address from the deployment record of this network.
async fn recorded_vault(args: &VaultArgs, network: &RpcNetwork) -> Result<Address> {
    let outdata = match &args.outdata {
        Some(outdata) => outdata.clone(),
        None => default_outdata(&args.network.network_name()?),
    };
    let record = DeploymentRecord::load_from_file(&outdata.join(RECORD_FILENAME))?;

    let chain_id = network.chain_id().await.context("Failed to reach node")?;
    if chain_id != record.chain_id {
        tracing::warn!(
            recorded = record.chain_id,
            connected = chain_id,
            "Deployment record belongs to another chain"
        );
    }

    Ok(record.vault)
}

async fn deposit(args: AmountArgs) -> Result<()> {
    let session = VaultSession::open(&args.vault).await?;
    let receipt = session.client().deposit(args.amount).await?;
    println!("{}", receipt.transaction_hash);
    Ok(())
}

async fn withdraw(args: AmountArgs) -> Result<()> {
    let session = VaultSession::open(&args.vault).await?;
    let receipt = session.client().withdraw(args.amount).await?;
    println!("{}", receipt.transaction_hash);
    Ok(())
}

async fn balance(args: AccountArgs) -> Result<()> {
    let session = VaultSession::open(&args.vault).await?;
    let account = args.account.unwrap_or(session.sender);
    let balance = session.client().balance(account).await?;
    println!("{}", balance);
    Ok(())
}

async fn vesting_schedule(args: AccountArgs) -> Result<()> {
    let session = VaultSession::open(&args.vault).await?;
    let account = args.account.unwrap_or(session.sender);
    let schedule = session.client().vesting_schedule(account).await?;

    println!("startTime: {}", schedule.start_time);
    println!("cliff: {}", schedule.cliff);
    println!("duration: {}", schedule.duration);
    println!("interval: {}", schedule.interval);
    Ok(())
}
