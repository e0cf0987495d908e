//! Detección de residuos con YOLO y agregado de resultados clasificados.
//!
//! Dos servicios independientes: `garbage-detect` (`POST /predict`) y
//! `garbage-store` (`POST /save`, `GET /GetGarbagePercent`).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod telemetry;
