use anyhow::Result;

use super::{Engine, parse_unit};
use crate::cli::MarkerCommands;

pub async fn handle(cmd: MarkerCommands, engine: &Engine) -> Result<()> {
    match cmd {
        MarkerCommands::Block { start, end } => {
            let text = engine
                .emitter()
                .emit_block_markers(start.as_deref(), end.as_deref());
            println!("{}", text);
        }
        MarkerCommands::Inline { unit } => {
            let unit = parse_unit(unit)?;
            let markers = engine.emitter().emit_inline_markers(unit).await?;
            if markers.is_empty() {
                println!("{} is unrated, no markers", unit);
            } else {
                println!("prefix: {}", markers.prefix);
                println!("suffix: {}", markers.suffix);
            }
        }
    }
    Ok(())
}
