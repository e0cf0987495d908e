use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use garbage_sorter::{
    adapters::{
        fs::json_record_store::JsonFileRecordStore,
        http::{state::StorageState, storage_router},
    },
    application::services::StorageService,
    config::StoreCli,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = StoreCli::parse();

    // 1. Almacén de registros (crea `[]` si no existe)
    let store = Arc::new(JsonFileRecordStore::open(&cli.data_file).await?);
    tracing::info!("📂 Registros en {}", store.path().display());

    // 2. Caso de uso y router
    let storage = Arc::new(StorageService::new(store));
    let app = storage_router(StorageState { storage });

    // 3. Lanzar el servidor
    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("no se pudo escuchar en {}", cli.bind))?;
    tracing::info!("🚀 API de almacenamiento en http://{}", cli.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
