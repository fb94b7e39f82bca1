//! Command execution. Each command renders to a JSON value.

use roster_catalog::CatalogBrowser;
use roster_storage::CacheBackend;
use serde_json::Value;

use crate::cli::Command;
use crate::error::CliError;

pub async fn execute<C>(browser: &CatalogBrowser<C>, command: &Command) -> Result<Value, CliError>
where
    C: CacheBackend,
{
    let output = match command {
        Command::Show { id } => serde_json::to_value(browser.browse(*id).await?)?,
        Command::Search { name } => serde_json::to_value(browser.search(&name.join(" ")).await?)?,
        Command::List => serde_json::to_value(browser.repository().list_all().await)?,
        Command::Neighbors { id } => {
            serde_json::to_value(browser.navigator().neighbors(*id).await?)?
        }
    };

    let stats = browser.repository().cache_stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.entry_count,
        "Command finished"
    );
    Ok(output)
}
