use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::model::{ModelId, YoloParams};

/// Parámetros del modelo, compartidos por `serve` y `oneshot`.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Modelo YOLO exportado a ONNX
    #[arg(long, env = "GARBAGE_MODEL", default_value = "models/3garbage_best.onnx", value_name = "FILE")]
    pub model: String,

    /// Umbral de confianza por defecto (0.0 - 1.0)
    #[arg(long, env = "GARBAGE_CONF", default_value_t = 0.25, value_name = "THRESHOLD")]
    pub conf: f32,

    /// Umbral IoU para NMS (0.0 - 1.0)
    #[arg(long, env = "GARBAGE_IOU", default_value_t = 0.7, value_name = "THRESHOLD")]
    pub iou: f32,

    /// Lado de la entrada del modelo en píxeles
    #[arg(long, env = "GARBAGE_IMGSZ", default_value_t = 640)]
    pub imgsz: u32,

    /// Máximo de cajas por imagen
    #[arg(long, env = "GARBAGE_MAX_DET", default_value_t = 300)]
    pub max_det: usize,
}

impl ModelArgs {
    pub fn model_id(&self) -> ModelId {
        let name = std::path::Path::new(&self.model)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "yolo".into());
        ModelId { name, onnx_path: self.model.clone() }
    }

    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.imgsz,
            conf_threshold: self.conf,
            iou_threshold: self.iou,
            max_detections: self.max_det,
        }
    }
}

/// Servicio de detección de residuos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct DetectCli {
    #[command(subcommand)]
    pub command: DetectCommand,
}

#[derive(Subcommand, Debug)]
pub enum DetectCommand {
    /// Levanta la API HTTP con `POST /predict`
    Serve(ServeArgs),
    /// Detecta sobre una imagen local e imprime el JSON de respuesta
    Oneshot(OneshotArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Dirección de escucha
    #[arg(long, env = "GARBAGE_DETECT_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// Directorio temporal de las imágenes subidas
    #[arg(long, env = "GARBAGE_UPLOAD_DIR", default_value = "temp", value_name = "DIR")]
    pub upload_dir: PathBuf,

    /// Conservar las imágenes subidas tras la inferencia
    #[arg(long, env = "GARBAGE_KEEP_UPLOADS")]
    pub keep_uploads: bool,

    /// Tamaño máximo de la subida en MiB
    #[arg(long, env = "GARBAGE_MAX_UPLOAD_MB", default_value_t = 20)]
    pub max_upload_mb: usize,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ServeArgs {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Args, Debug)]
pub struct OneshotArgs {
    /// Imagen de entrada
    #[arg(long, value_name = "FILE")]
    pub image: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Servicio de almacenamiento y porcentajes de residuos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct StoreCli {
    /// Dirección de escucha
    #[arg(long, env = "GARBAGE_STORE_BIND", default_value = "0.0.0.0:8001")]
    pub bind: String,

    /// Fichero JSON con los registros guardados
    #[arg(long, env = "GARBAGE_DATA_FILE", default_value = "data.json", value_name = "FILE")]
    pub data_file: PathBuf,
}
