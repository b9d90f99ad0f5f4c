use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;

#[derive(Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Base URL of the track-source node, e.g. "http://localhost:2333"
    pub node_url: String,

    /// Authorization password for the node's REST API
    pub node_password: String,
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Refill the queue via similarity search once it runs dry
    #[serde(default)]
    pub autoplay: bool,

    /// Recycle the play history instead of disconnecting on exhaustion
    #[serde(default)]
    pub keep_connected: bool,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub node: NodeConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

pub async fn load() -> Result<Config> {
    let config = read_to_string("Config.toml").await?;
    let config: Config = toml::from_str(&config)?;

    Ok(config)
}
