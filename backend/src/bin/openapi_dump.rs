//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use bastion::doc::ApiDoc;
use color_eyre::eyre::Result;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let document = ApiDoc::openapi().to_pretty_json()?;
    writeln!(io::stdout().lock(), "{document}")?;
    Ok(())
}
