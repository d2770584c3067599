use super::Context;
use crate::output::{table, Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use watchlist_models::{CatalogId, WatchlistEntry};

pub async fn run_basket(ctx: &Context, series: &str, season: u32, output: &Output) -> Result<()> {
    let mut session = ctx.open_session().await?;
    let series_id = CatalogId::parse(series);

    let Some(basket) = session.open_season(&series_id, season) else {
        return Err(eyre!(
            "No episodes of series {} season {} are on the watchlist",
            series_id,
            season
        ));
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!(
                "\n{} {}",
                basket.name().bright_cyan().bold(),
                format!("({} EPS)", basket.episode_count()).yellow()
            );

            let images = ctx.images();
            let mut grid = table(&["Entry", "Episode", "Name", "Added", "Thumbnail"]);
            for episode in basket.episodes() {
                grid.add_row(vec![
                    Cell::new(&episode.id),
                    Cell::new(episode_label(episode)),
                    Cell::new(episode.display_name()),
                    Cell::new(added_label(episode)),
                    Cell::new(images.episode_thumbnail(episode)),
                ]);
            }
            println!("{}", grid);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(basket)?);
        }
    }

    Ok(())
}

pub fn episode_label(episode: &WatchlistEntry) -> String {
    match (episode.season(), episode.episode()) {
        (Some(season), Some(number)) => format!("S{} E{}", season, number),
        _ => "-".to_string(),
    }
}

fn added_label(episode: &WatchlistEntry) -> String {
    episode
        .added_at_utc()
        .map(|added| added.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_episode_labels() {
        let mut episode = WatchlistEntry::new("e1", "Show - S2E5: X").with_series(9).with_episode(2, 5);
        assert_eq!(episode_label(&episode), "S2 E5");
        assert_eq!(added_label(&episode), "-");

        episode.added_at = Some(json!({ "seconds": 1709294400, "nanoseconds": 0 }));
        assert_eq!(added_label(&episode), "2024-03-01");

        episode.added_at = Some(json!("not a date"));
        assert_eq!(added_label(&episode), "-");
    }
}
