use super::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchlist_core::{BasketState, RemoveOutcome};
use watchlist_models::{CatalogId, WatchlistEntry};

pub async fn run_remove(
    ctx: &Context,
    entry_id: &str,
    basket: Option<(&str, u32)>,
    output: &Output,
) -> Result<()> {
    let mut session = ctx.open_session().await?;

    if let Some((series, season)) = basket {
        let series_id = CatalogId::parse(series);
        if session.open_season(&series_id, season).is_none() {
            output.warn(format!(
                "No basket for series {} season {}; removing from the full list only",
                series_id, season
            ));
        }
    }

    let entry_id = resolve_entry_id(session.entries(), entry_id);

    let (write, basket_state) = match session.remove_episode(&entry_id) {
        RemoveOutcome::NotFound => {
            output.info(format!("No watchlist entry with id {}", entry_id));
            output.json(&json!({ "type": "not_found", "id": entry_id }));
            return Ok(());
        }
        RemoveOutcome::Removed { write, basket } => (write, basket),
    };

    // The process exits right after this command, so the write-back is awaited here
    if let Err(e) = write.wait().await {
        output.error(format!(
            "Removed {} locally but saving to {} failed: {}",
            entry_id,
            ctx.store().path().display(),
            e
        ));
        return Err(eyre!("Failed to save watchlist: {}", e));
    }

    let remaining_entries = session.entries().len();
    match basket_state {
        BasketState::Untouched => {
            output.success(format!("Removed {} ({} entries left)", entry_id, remaining_entries));
        }
        BasketState::Updated { remaining } => {
            output.success(format!(
                "Removed {} from basket ({} episodes left)",
                entry_id, remaining
            ));
        }
        BasketState::Closed => {
            output.success(format!("Removed {}; basket is now empty and was closed", entry_id));
        }
    }

    output.json(&json!({
        "type": "removed",
        "id": entry_id,
        "basket": basket_json(basket_state),
        "entries": remaining_entries,
    }));

    Ok(())
}

/// Match the typed id against stored ids, which may be numbers or strings
fn resolve_entry_id(entries: &[WatchlistEntry], raw: &str) -> CatalogId {
    let parsed = CatalogId::parse(raw);
    if entries.iter().any(|entry| entry.id == parsed) {
        return parsed;
    }
    let text = CatalogId::Text(raw.trim().to_string());
    if entries.iter().any(|entry| entry.id == text) {
        return text;
    }
    parsed
}

fn basket_json(state: BasketState) -> serde_json::Value {
    match state {
        BasketState::Untouched => json!({ "state": "untouched" }),
        BasketState::Updated { remaining } => json!({ "state": "updated", "remaining": remaining }),
        BasketState::Closed => json!({ "state": "closed" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entry_id_prefers_stored_form() {
        let entries = vec![WatchlistEntry::new(1, "Numeric"), WatchlistEntry::new("2", "Text")];

        assert_eq!(resolve_entry_id(&entries, "1"), CatalogId::Number(1));
        assert_eq!(resolve_entry_id(&entries, "2"), CatalogId::Text("2".to_string()));
        assert_eq!(resolve_entry_id(&entries, "ep-9"), CatalogId::Text("ep-9".to_string()));
        assert_eq!(resolve_entry_id(&entries, "3"), CatalogId::Number(3));
    }

    #[test]
    fn test_basket_json() {
        assert_eq!(basket_json(BasketState::Closed)["state"], json!("closed"));
        assert_eq!(
            basket_json(BasketState::Updated { remaining: 2 })["remaining"],
            json!(2)
        );
    }
}
