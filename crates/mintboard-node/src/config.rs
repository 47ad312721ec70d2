//! Configuration for the registry node and the `mintboard` command line

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mintboard_logging::LogConfig;
use mintboard_registry::{ActorId, Amount, DEFAULT_IPFS_GATEWAY, VerifiedSet, parse_actor};
use mintboard_storage::RedbStorageConfig;
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Configuration for a RegistryNode
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Base directory for all node data
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`
    pub db_file: String,
    /// redb cache size in bytes
    pub cache_size: usize,
    /// HTTP gateway used to resolve `ipfs://` pointers
    pub gateway: String,
    /// Discussion log policy
    pub discussion: DiscussionConfig,
    /// Logging setup for the binary
    pub log: LogConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./mintboard-data"),
            db_file: "mintboard.redb".to_string(),
            cache_size: 16 * 1024 * 1024,
            gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            discussion: DiscussionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Who may post to the discussion log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionConfig {
    /// Reject posts from actors missing from `verified`
    pub require_verification: bool,
    /// Hex-encoded actor IDs that passed verification
    pub verified: Vec<String>,
}

impl NodeConfig {
    /// Create a configuration with a custom data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Read a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> NodeResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Set the content gateway
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Only let `verified` actors post
    pub fn with_verified_posters(mut self, verified: impl IntoIterator<Item = ActorId>) -> Self {
        self.discussion.require_verification = true;
        self.discussion.verified = verified
            .into_iter()
            .map(|actor| mintboard_registry::actor_hex(&actor))
            .collect();
        self
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn storage_config(&self) -> RedbStorageConfig {
        RedbStorageConfig {
            db_path: self.db_path(),
            cache_size: self.cache_size,
        }
    }

    /// The verified set to gate posting with, if gating is on
    pub fn verifier(&self) -> NodeResult<Option<VerifiedSet>> {
        if !self.discussion.require_verification {
            return Ok(None);
        }
        let set = self
            .discussion
            .verified
            .iter()
            .map(String::as_str)
            .map(parse_actor)
            .collect::<Result<VerifiedSet, _>>()
            .map_err(|e| NodeError::Config(format!("discussion.verified: {e}")))?;
        Ok(Some(set))
    }
}

#[derive(Parser)]
#[command(name = "mintboard", about = "Artifact registry with donations and a public discussion log")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides config file)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write JSON log lines under this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a new artifact
    Mint {
        /// Acting identity (hex-encoded 32 bytes)
        #[arg(long, value_parser = parse_actor)]
        caller: ActorId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Content pointer, e.g. ipfs://<cid>
        #[arg(long)]
        pointer: String,
    },
    /// Donate to an artifact
    Donate {
        /// Acting identity (hex-encoded 32 bytes)
        #[arg(long, value_parser = parse_actor)]
        caller: ActorId,
        #[arg(long)]
        id: u64,
        /// Decimal amount, e.g. 0.25
        #[arg(long)]
        amount: Amount,
    },
    /// Show one artifact
    Show {
        id: u64,
        /// Gateway for ipfs:// pointers (overrides config file)
        #[arg(long)]
        gateway: Option<String>,
    },
    /// List artifacts
    List {
        /// Only artifacts whose name or description contains this
        #[arg(long)]
        search: Option<String>,
        /// Only artifacts owned by this actor
        #[arg(long, value_parser = parse_actor)]
        owner: Option<ActorId>,
    },
    /// Append a post to the discussion log
    Post {
        /// Acting identity (hex-encoded 32 bytes)
        #[arg(long, value_parser = parse_actor)]
        caller: ActorId,
        text: String,
    },
    /// Print the discussion log
    Posts {
        /// Only posts by this actor
        #[arg(long, value_parser = parse_actor)]
        author: Option<ActorId>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.gateway, DEFAULT_IPFS_GATEWAY);
        assert!(!config.discussion.require_verification);
        assert!(config.verifier().unwrap().is_none());
        assert_eq!(config.db_path(), PathBuf::from("./mintboard-data/mintboard.redb"));
    }

    #[test]
    fn test_partial_toml() {
        let config = NodeConfig::from_toml_str(
            r#"
            data_dir = "/srv/mintboard"
            cache_size = 1048576

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/mintboard"));
        assert_eq!(config.cache_size, 1 << 20);
        assert_eq!(config.db_file, "mintboard.redb");
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.storage_config().db_path, PathBuf::from("/srv/mintboard/mintboard.redb"));
    }

    #[test]
    fn test_verified_posters_from_toml() {
        let alice = "01".repeat(32);
        let config = NodeConfig::from_toml_str(&format!(
            r#"
            [discussion]
            require_verification = true
            verified = ["{alice}"]
            "#
        ))
        .unwrap();

        let set = config.verifier().unwrap().unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bad_verified_entry_is_config_error() {
        let config = NodeConfig::from_toml_str(
            r#"
            [discussion]
            require_verification = true
            verified = ["not-hex"]
            "#,
        )
        .unwrap();
        assert!(matches!(config.verifier(), Err(NodeError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            NodeConfig::from_toml_str("cache_size = \"lots\""),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn test_with_verified_posters_round_trips_hex() {
        let config = NodeConfig::default().with_verified_posters([[7u8; 32]]);
        assert!(config.discussion.require_verification);
        assert_eq!(config.discussion.verified, vec!["07".repeat(32)]);
        assert_eq!(config.verifier().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_cli_parses_donate() {
        let caller = "02".repeat(32);
        let cli = Cli::try_parse_from([
            "mintboard", "--data-dir", "/tmp/mb", "donate", "--caller", &caller, "--id", "0",
            "--amount", "1.5",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/mb")));
        match cli.command {
            Command::Donate { caller, id, amount } => {
                assert_eq!(caller, [2u8; 32]);
                assert_eq!(id, 0);
                assert_eq!(amount.to_string(), "1.5");
            }
            _ => panic!("expected donate"),
        }
    }

    #[test]
    fn test_cli_log_overrides() {
        let cli = Cli::try_parse_from([
            "mintboard", "--log-level", "debug", "--log-dir", "/tmp/mb-logs", "posts",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/mb-logs")));
        assert!(matches!(cli.command, Command::Posts { author: None }));
    }

    #[test]
    fn test_cli_rejects_short_actor() {
        assert!(Cli::try_parse_from(["mintboard", "post", "--caller", "abcd", "hello"]).is_err());
    }
}
