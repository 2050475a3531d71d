use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_resolve(config: Config, query: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let location = state.locations.resolve(query).await?;

    println!("{}", location.formatted_query);
    println!("  ID:          {}", location.id);
    println!("  Search:      {}", location.search_query);
    println!("  Coordinates: {}, {}", location.latitude, location.longitude);

    state.store.close().await?;
    Ok(())
}
