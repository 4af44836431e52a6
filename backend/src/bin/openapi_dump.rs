//! Print the OpenAPI document as JSON.

use men_service::doc::ApiDoc;
use utoipa::OpenApi;

#[allow(clippy::print_stdout, reason = "the document is the program's output")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
