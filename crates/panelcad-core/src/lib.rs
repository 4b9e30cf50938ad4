//! PanelCAD 核心几何引擎
//!
//! 提供面板布局导出所需的几何管线：参数化面板、场景快照、
//! 网格特征边提取和标签放置。
//!
//! # 架构设计
//!
//! 两条几何来源汇入同一套下游类型：
//! - `Panel`: 参数化面板描述符，直接生成轮廓与侧边
//! - `SceneSnapshot`: 宿主场景图的不可变快照，经特征边提取得到线段
//!
//! 两条路径的产物（边、标签）都已压平到2D并按精度舍入，
//! 由文件层组装为图纸文档。
//!
//! # 示例
//!
//! ```rust
//! use panelcad_core::prelude::*;
//!
//! // 创建一块方形面板并生成几何
//! let panel = Panel::new("p1", PanelShape::Square, "EX-1")
//!     .with_dimensions(10.0, 0.3);
//! let geometry = panel.generate_geometry();
//!
//! assert_eq!(geometry.side_edges.len(), 4);
//! ```

pub mod edges;
pub mod labels;
pub mod math;
pub mod panel;
pub mod scene;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::edges::{Edge, EdgeExtractor};
    pub use crate::labels::{extract_labels, Label};
    pub use crate::math::{BoundingBox3, Matrix4, Point3, Vector3};
    pub use crate::panel::{Panel, PanelError, PanelGeometry, PanelShape};
    pub use crate::scene::{NodeIndex, NodeRole, PanelGroup, SceneNode, SceneSnapshot, Triangle};
    pub use crate::transform::Transform3D;
}
