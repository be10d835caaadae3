//! Dump the relay's OpenAPI document, to stdout or to the file given as first argument.

use std::{env, fs};

use anyhow::Context;
use scoreboard_relay::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .context("serializing OpenAPI document")?;

    match env::args_os().nth(1) {
        Some(path) => fs::write(&path, document)
            .with_context(|| format!("writing {}", path.to_string_lossy()))?,
        None => println!("{document}"),
    }
    Ok(())
}
