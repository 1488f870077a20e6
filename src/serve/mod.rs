use crate::err::Error;
use crate::http::run_until_interrupted;
use crate::serve::routes::{respond_to_request, State};
use crate::tcp;
use std::net::SocketAddr;
use std::path::PathBuf;

mod cache;
mod file;
mod listing;
mod path;
mod routes;

pub async fn main(port: u16, root: PathBuf) -> Result<(), Error> {
    let listener = tcp::listen(SocketAddr::from(([0, 0, 0, 0], port)))?;

    println!("Serving '{}' at http://localhost:{}", root.display(), port);

    run_until_interrupted(listener, State::new(root), respond_to_request).await?;

    println!("\nShutting down...");

    Ok(())
}
