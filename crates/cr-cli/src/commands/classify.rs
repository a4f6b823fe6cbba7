use anyhow::Result;

use super::Engine;

pub fn handle(engine: &Engine, text: &str) -> Result<()> {
    match engine.classify(text) {
        Some(code) => println!("{}", code),
        None => println!("(no rating)"),
    }
    Ok(())
}
