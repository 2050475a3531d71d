use anyhow::Context;

use crate::config::Config;
use crate::domain::ResourceKind;
use crate::state::SharedState;

pub async fn cmd_fetch(config: Config, resource: &str, query: &str) -> anyhow::Result<()> {
    let kind: ResourceKind = resource.parse()?;
    let state = SharedState::new(config).await?;

    let location = state.locations.resolve(query).await?;

    let payload = state
        .resources
        .fetch(kind, &location, None)
        .await
        .with_context(|| format!("Failed to fetch {kind} for {}", location.formatted_query))?;

    println!(
        "{} {} for {}:",
        payload.len(),
        kind,
        location.formatted_query
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);

    state.store.close().await?;
    Ok(())
}
