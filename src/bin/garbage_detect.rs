use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use garbage_sorter::{
    adapters::{
        fs::upload_staging::DirUploadStaging,
        http::{detection_router, state::DetectionState},
        onnx::{detector::OnnxDetector, yolo_engine::OnnxYoloEngine},
    },
    application::{dto::PredictResponse, ports::DetectorPort, services::DetectionService},
    config::{DetectCli, DetectCommand, OneshotArgs, ServeArgs},
    domain::detection::normalize_frames,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    match DetectCli::parse().command {
        DetectCommand::Serve(args) => serve(args).await,
        DetectCommand::Oneshot(args) => oneshot(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!("🔧 Cargando modelo {}...", args.model.model);

    // 1. Adaptadores: modelo ONNX y directorio temporal de subidas
    let engine = OnnxYoloEngine::load(&args.model.model_id())?;
    let detector = Arc::new(OnnxDetector::new(engine));
    let uploads = Arc::new(DirUploadStaging::new(&args.upload_dir).await?);

    // 2. Caso de uso
    let detection = Arc::new(DetectionService::new(
        detector,
        uploads,
        args.model.yolo_params(),
        args.keep_uploads,
    ));

    // 3. Router de Axum
    let app = detection_router(DetectionState { detection }, args.max_upload_bytes());

    // 4. Lanzar el servidor
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("no se pudo escuchar en {}", args.bind))?;
    tracing::info!("🚀 API de detección en http://{}", args.bind);
    tracing::info!(
        "📂 Subidas en '{}' ({})",
        args.upload_dir.display(),
        if args.keep_uploads { "se conservan" } else { "se borran tras inferir" }
    );
    axum::serve(listener, app).await?;

    Ok(())
}

async fn oneshot(args: OneshotArgs) -> anyhow::Result<()> {
    let engine = OnnxYoloEngine::load(&args.model.model_id())?;
    let detector = OnnxDetector::new(engine);

    let frames = detector.detect(&args.image, &args.model.yolo_params()).await?;
    let response = PredictResponse { detections: normalize_frames(&frames) };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
