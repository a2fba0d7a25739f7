use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CitiesArgs {}

#[derive(Debug, Serialize)]
struct CityDto {
    id: i64,
    name: String,
    people: i64,
}

pub fn run(ctx: &Context<'_>, _args: CitiesArgs) -> Result<()> {
    let cities = ctx.store.cities().list_with_counts()?;

    if ctx.json {
        let items: Vec<CityDto> = cities
            .into_iter()
            .map(|entry| CityDto {
                id: entry.city.id,
                name: entry.city.name,
                people: entry.people,
            })
            .collect();
        return print_json(&items);
    }

    if cities.is_empty() {
        println!("No cities recorded");
        return Ok(());
    }
    for entry in cities {
        println!("{} ({} people)", entry.city.name, entry.people);
    }
    Ok(())
}
