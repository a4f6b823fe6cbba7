use anyhow::Result;
use cr_storage::RatingBackend;

use super::{Engine, parse_unit};
use crate::cli::RatingCommands;

pub async fn handle(cmd: RatingCommands, engine: &Engine) -> Result<()> {
    match cmd {
        RatingCommands::Get { unit } => get(engine, unit).await,
        RatingCommands::Set { unit, text } => set(engine, unit, &text).await,
        RatingCommands::Clear { unit } => clear(engine, unit).await,
        RatingCommands::List => list(engine).await,
    }
}

async fn get(engine: &Engine, unit: i64) -> Result<()> {
    let unit = parse_unit(unit)?;
    match engine.store().try_get_rating(unit).await? {
        Some(code) => println!("{}: {}", unit, code),
        None => println!("{}: (unrated)", unit),
    }
    Ok(())
}

async fn set(engine: &Engine, unit: i64, text: &str) -> Result<()> {
    let unit = parse_unit(unit)?;
    match engine.classify(text) {
        Some(code) => {
            engine.store().set_rating(unit, &code).await?;
            println!("✓ Rated {} as {}", unit, code);
        }
        None => {
            engine.store().clear_rating(unit).await?;
            println!("✓ {:?} is not a rating; cleared {}", text, unit);
        }
    }
    Ok(())
}

async fn clear(engine: &Engine, unit: i64) -> Result<()> {
    let unit = parse_unit(unit)?;
    engine.store().clear_rating(unit).await?;
    println!("✓ Cleared rating of {}", unit);
    Ok(())
}

async fn list(engine: &Engine) -> Result<()> {
    let rows = engine.store().backend().list().await?;

    if rows.is_empty() {
        println!("No rated units.");
        return Ok(());
    }

    println!("Rated units:");
    for row in rows {
        println!("  {} {}", row.pp_page, row.pp_value);
    }
    Ok(())
}
