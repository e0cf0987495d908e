use anyhow::{bail, Context, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::detection::RawBox;
use crate::domain::model::{ModelId, YoloParams};

/// Sesión ONNX de un export YOLOv8 (salida `[1, 4 + nc, N]`).
pub struct OnnxYoloEngine {
    session: Session,
}

impl OnnxYoloEngine {
    pub fn load(model: &ModelId) -> Result<Self> {
        if model.onnx_path.trim().is_empty() {
            bail!("onnx_path vacío");
        }
        if !Path::new(&model.onnx_path).exists() {
            bail!("modelo no encontrado: {}", model.onnx_path);
        }

        let mut builder = Session::builder()?.with_intra_threads(4)?;

        // CUDA es opcional: si está disponible se registra, si no continuamos en CPU.
        let cuda = CUDAExecutionProvider::default().build();
        if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
            builder = builder_with_cuda;
        }

        // Con `ort` sin default-features, usamos commit_from_memory.
        let model_bytes = fs::read(&model.onnx_path)
            .with_context(|| format!("leyendo {}", model.onnx_path))?;
        let session = builder.commit_from_memory(&model_bytes)?;

        info!("Modelo {} cargado desde {}", model.name, model.onnx_path);
        Ok(Self { session })
    }

    pub fn infer(&mut self, rgb: &RgbImage, params: &YoloParams) -> Result<Vec<RawBox>> {
        let imgsz = params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let (input_data, _) = input.into_raw_vec_and_offset();
        let input_tensor = Value::from_array((input_shape, input_data))?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x as usize).collect();
        if dims.len() != 3 || dims[1] <= 4 {
            bail!("salida inesperada del modelo: {:?}", dims);
        }
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0);

        let num_candidates = view.shape()[1];
        let sx = rgb.width() as f32 / imgsz as f32;
        let sy = rgb.height() as f32 / imgsz as f32;

        let mut candidates = Vec::new();

        for i in 0..num_candidates {
            let scores = view.slice(s![4.., i]);
            let Some((class_id, &max_score)) = scores
                .indexed_iter()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
            else {
                continue;
            };

            if max_score >= params.conf_threshold {
                let cx = view[[0, i]];
                let cy = view[[1, i]];
                let w = view[[2, i]];
                let h = view[[3, i]];

                candidates.push(RawBox {
                    x1: ((cx - w / 2.0) * sx).max(0.0),
                    y1: ((cy - h / 2.0) * sy).max(0.0),
                    x2: ((cx + w / 2.0) * sx).min(rgb.width() as f32),
                    y2: ((cy + h / 2.0) * sy).min(rgb.height() as f32),
                    score: max_score,
                    class_id,
                });
            }
        }

        Ok(non_max_suppression(candidates, params.iou_threshold, params.max_detections))
    }
}

/// NMS por clase: de mayor a menor score, descarta las cajas de la misma clase
/// que solapen por encima de `iou_threshold` con una ya aceptada.
pub fn non_max_suppression(mut boxes: Vec<RawBox>, iou_threshold: f32, max_detections: usize) -> Vec<RawBox> {
    boxes.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<RawBox> = Vec::new();
    for candidate in boxes {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
