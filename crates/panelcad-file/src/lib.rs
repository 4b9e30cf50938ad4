//! PanelCAD 文件输出
//!
//! 提供：
//! - 图纸文档模型（折线、线段、文字）
//! - `.dxf` ASCII 序列化
//! - 导出编排（面板路径 / 场景路径）

pub mod drawing;
pub mod dxf_writer;
pub mod error;
pub mod export;

pub use drawing::{Drawing, DrawingEntity};
pub use error::ExportError;
pub use export::{export, ExportOutput, ExportRequest, ExportSource};
