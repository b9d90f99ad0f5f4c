use anyhow::Result;
use std::sync::Arc;
use tunebot::source::{RestSearchClient, SearchSource};
use tunebot::{config, engine, event, player, stdin};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = config::load().await?;

    let bus = event::EventBus::new();
    event::debug(&bus);

    let search: Arc<dyn SearchSource> = Arc::new(RestSearchClient::new(
        config.node.node_url.clone(),
        config.node.node_password.clone(),
    ));

    engine::start(&bus);

    let player = player::init(&bus, search.clone(), 0);
    {
        let mut player = player.write().await;
        player.set_autoplay(config.player.autoplay);
        player.set_keep_connected(config.player.keep_connected);
    }

    stdin::start(&bus, search);

    tokio::signal::ctrl_c().await?;

    Ok(())
}
