use super::Context;
use crate::output::{table, Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Color};
use owo_colors::OwoColorize;
use watchlist_models::DisplayItem;

pub async fn run_show(ctx: &Context, output: &Output) -> Result<()> {
    let session = ctx.open_session().await?;
    let items = session.items();

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!(
                "\n{} {}",
                "Your Watchlist".bright_cyan().bold(),
                format!("({} items)", session.entries().len()).bright_black()
            );

            if items.is_empty() {
                output.info("Your watchlist is empty.");
                return Ok(());
            }

            let images = ctx.images();
            let mut grid = table(&["Kind", "Name", "Series", "Poster"]);
            for item in &items {
                grid.add_row(vec![
                    kind_cell(item),
                    Cell::new(item.name()),
                    Cell::new(item.series_id()),
                    Cell::new(images.display_poster(item)),
                ]);
            }
            println!("{}", grid);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&items)?);
        }
    }

    Ok(())
}

/// Badge shown on the grid card: SERIES, S<n> for a whole season, <n> EPS for a basket
fn kind_label(item: &DisplayItem) -> String {
    match item {
        DisplayItem::Series(series) => match series.entry.season() {
            Some(season) if series.is_season => format!("S{}", season),
            _ => "SERIES".to_string(),
        },
        DisplayItem::Basket(basket) => format!("{} EPS", basket.episode_count()),
    }
}

fn kind_cell(item: &DisplayItem) -> Cell {
    let cell = Cell::new(kind_label(item));
    match item {
        DisplayItem::Basket(_) => cell.fg(Color::Yellow),
        DisplayItem::Series(_) => cell,
    }
}
