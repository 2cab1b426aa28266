mod action;
mod app;
mod store;
mod tags;
mod ui;

use store::TagStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let store = match TagStore::open_default() {
        Ok(store) => store,
        Err(e) => return Err(anyhow::anyhow!("Failed to open tag store: {}", e)),
    };
    let mut app = app::App::new(store)?;
    app.run().await?;
    Ok(())
}
