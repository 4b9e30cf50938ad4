//! 导出错误定义

use panelcad_core::panel::PanelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("invalid panel: {0}")]
    Panel(#[from] PanelError),

    #[error("scene snapshot is empty")]
    EmptyScene,

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
