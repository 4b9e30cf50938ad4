//! 参数化面板
//!
//! 支持两种面板形状：
//! - 方形 (Square)：宽 = size，高 = size × 0.75
//! - 五边形 (Pentagon)：宽 = size，高 = size，底部两个直角、顶部尖峰
//!
//! 面板几何在局部坐标系生成（底面 z=0，顶面 z=thickness），
//! 再按面板的 position/rotation 变换到世界坐标。

use crate::edges::Edge;
use crate::math::Point3;
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// 面板形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelShape {
    Square,
    Pentagon,
}

/// 面板描述符
///
/// 由调用方提供的固定列表创建，单次导出期间不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    /// 面板ID
    pub id: String,

    /// 面板形状
    pub shape: PanelShape,

    /// 导出标签（如 "EX-1"）
    pub label: String,

    /// 世界坐标位置
    pub position: Point3,

    /// 欧拉角 (rx, ry, rz)，弧度，按 X→Y→Z 顺序组合
    pub rotation: [f64; 3],

    /// 尺寸（正数）
    pub size: f64,

    /// 厚度（非负）
    pub thickness: f64,
}

/// 面板描述符错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum PanelError {
    #[error("panel {id}: size must be positive and finite, got {value}")]
    InvalidSize { id: String, value: f64 },

    #[error("panel {id}: thickness must be non-negative and finite, got {value}")]
    InvalidThickness { id: String, value: f64 },

    #[error("panel {id}: position/rotation must be finite")]
    NonFinitePlacement { id: String },
}

/// 单个面板的导出几何（世界坐标）
#[derive(Debug, Clone)]
pub struct PanelGeometry {
    /// 顶面轮廓，首尾顶点相同（闭合）
    pub top_face: Vec<Point3>,

    /// 底面轮廓，首尾顶点相同（闭合）
    pub bottom_face: Vec<Point3>,

    /// 连接顶面与底面对应顶点的侧边
    pub side_edges: Vec<Edge>,

    /// 标签位置：顶面开放顶点列表的形心
    pub label_position: Point3,
}

impl Panel {
    /// 创建新面板
    pub fn new(id: impl Into<String>, shape: PanelShape, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape,
            label: label.into(),
            position: Point3::origin(),
            rotation: [0.0; 3],
            size: 10.0,
            thickness: 0.3,
        }
    }

    /// 设置位置
    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    /// 设置旋转
    pub fn with_rotation(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotation = [rx, ry, rz];
        self
    }

    /// 设置尺寸与厚度
    pub fn with_dimensions(mut self, size: f64, thickness: f64) -> Self {
        self.size = size;
        self.thickness = thickness;
        self
    }

    /// 校验描述符
    pub fn validate(&self) -> Result<(), PanelError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(PanelError::InvalidSize {
                id: self.id.clone(),
                value: self.size,
            });
        }
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(PanelError::InvalidThickness {
                id: self.id.clone(),
                value: self.thickness,
            });
        }
        let placement_finite = self.position.iter().all(|v| v.is_finite())
            && self.rotation.iter().all(|v| v.is_finite());
        if !placement_finite {
            return Err(PanelError::NonFinitePlacement {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// 生成世界坐标导出几何
    pub fn generate_geometry(&self) -> PanelGeometry {
        let (top, bottom) = self.shape.local_vertices(self.size, self.thickness);

        let transform = Transform3D::placement(
            &self.position,
            (self.rotation[0], self.rotation[1], self.rotation[2]),
        );
        let top = transform.transform_points(&top);
        let bottom = transform.transform_points(&bottom);

        let side_edges = top
            .iter()
            .zip(bottom.iter())
            .map(|(t, b)| Edge::new(*t, *b))
            .collect();

        let label_position = centroid(&top);

        PanelGeometry {
            top_face: close_ring(&top),
            bottom_face: close_ring(&bottom),
            side_edges,
            label_position,
        }
    }

    /// 内置示例布局：两块方形外墙板 + 两块五边形山墙板
    pub fn demo_layout() -> Vec<Panel> {
        use std::f64::consts::PI;
        vec![
            Panel::new("panel1", PanelShape::Square, "EX-1")
                .with_position(0.0, 5.0, -1.3)
                .with_rotation(PI / 2.0, 0.0, 0.0),
            Panel::new("panel2", PanelShape::Square, "EX-3")
                .with_position(0.0, -4.7, -1.3)
                .with_rotation(PI / 2.0, 0.0, 0.0),
            Panel::new("panel3", PanelShape::Pentagon, "EX-2")
                .with_position(4.7, 0.0, 0.0)
                .with_rotation(0.0, PI / 2.0, PI / 2.0),
            Panel::new("panel4", PanelShape::Pentagon, "EX-4")
                .with_position(-5.0, 0.0, 0.0)
                .with_rotation(0.0, PI / 2.0, PI / 2.0),
        ]
    }
}

impl PanelShape {
    /// 局部坐标系下的开放顶点表（顶面 z=thickness，底面 z=0）
    fn local_vertices(&self, size: f64, thickness: f64) -> (Vec<Point3>, Vec<Point3>) {
        let ring = match self {
            PanelShape::Square => {
                let half_w = size / 2.0;
                let half_h = size * 0.75 / 2.0;
                vec![
                    (-half_w, -half_h), // 左下
                    (half_w, -half_h),  // 右下
                    (half_w, half_h),   // 右上
                    (-half_w, half_h),  // 左上
                ]
            }
            PanelShape::Pentagon => {
                let half_w = size / 2.0;
                let height = size;
                vec![
                    (-half_w, -height / 2.0), // 左下
                    (half_w, -height / 2.0),  // 右下
                    (half_w, height / 4.0),   // 右中
                    (0.0, height / 2.0),      // 顶点
                    (-half_w, height / 4.0),  // 左中
                ]
            }
        };

        let top = ring
            .iter()
            .map(|&(x, y)| Point3::new(x, y, thickness))
            .collect();
        let bottom = ring.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
        (top, bottom)
    }
}

/// 重复首顶点以闭合轮廓
fn close_ring(points: &[Point3]) -> Vec<Point3> {
    let mut ring = points.to_vec();
    if let Some(&first) = points.first() {
        ring.push(first);
    }
    ring
}

/// 点集形心
fn centroid(points: &[Point3]) -> Point3 {
    let n = points.len() as f64;
    let sum = points.iter().fold(Point3::origin(), |acc, p| {
        Point3::new(acc.x + p.x, acc.y + p.y, acc.z + p.z)
    });
    Point3::new(sum.x / n, sum.y / n, sum.z / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq};
    use std::f64::consts::PI;

    #[test]
    fn test_square_geometry() {
        let panel = Panel::new("p", PanelShape::Square, "EX-1").with_dimensions(10.0, 0.3);
        let geom = panel.generate_geometry();

        // 4个开放顶点 + 重复的首顶点
        assert_eq!(geom.top_face.len(), 5);
        assert_eq!(geom.bottom_face.len(), 5);
        assert_eq!(geom.side_edges.len(), 4);
        assert!(points_approx_eq(&geom.top_face[0], &geom.top_face[4]));

        // 未变换：宽10、高7.5
        assert!(points_approx_eq(
            &geom.top_face[0],
            &Point3::new(-5.0, -3.75, 0.3)
        ));
        assert!(points_approx_eq(
            &geom.bottom_face[2],
            &Point3::new(5.0, 3.75, 0.0)
        ));
    }

    #[test]
    fn test_pentagon_geometry() {
        let panel = Panel::new("p", PanelShape::Pentagon, "EX-2").with_dimensions(10.0, 0.3);
        let geom = panel.generate_geometry();

        assert_eq!(geom.top_face.len(), 6);
        assert_eq!(geom.bottom_face.len(), 6);
        assert_eq!(geom.side_edges.len(), 5);
        assert!(points_approx_eq(&geom.top_face[0], &geom.top_face[5]));

        // 顶点在 (0, size/2)
        assert!(points_approx_eq(
            &geom.top_face[3],
            &Point3::new(0.0, 5.0, 0.3)
        ));
    }

    #[test]
    fn test_label_at_top_face_centroid() {
        let panel = Panel::new("p", PanelShape::Square, "EX-1").with_dimensions(10.0, 0.3);
        let geom = panel.generate_geometry();

        // 方形形心在局部原点、z=thickness
        assert!(points_approx_eq(
            &geom.label_position,
            &Point3::new(0.0, 0.0, 0.3)
        ));
    }

    #[test]
    fn test_side_edges_connect_faces() {
        let panel = Panel::new("p", PanelShape::Square, "EX-1")
            .with_dimensions(10.0, 0.3)
            .with_position(0.0, 5.0, -1.3)
            .with_rotation(PI / 2.0, 0.0, 0.0);
        let geom = panel.generate_geometry();

        for (i, edge) in geom.side_edges.iter().enumerate() {
            assert!(points_approx_eq(&edge.start, &geom.top_face[i]));
            assert!(points_approx_eq(&edge.end, &geom.bottom_face[i]));
        }
    }

    #[test]
    fn test_rotated_square_lies_flat() {
        // 绕X轴旋转90°后，面板立面从XY平面翻到XZ平面
        let panel = Panel::new("p", PanelShape::Square, "EX-1")
            .with_dimensions(10.0, 0.3)
            .with_rotation(PI / 2.0, 0.0, 0.0);
        let geom = panel.generate_geometry();

        // 局部 (x, y, z) -> 世界 (x, -z, y)
        assert!(approx_eq(geom.top_face[0].x, -5.0));
        assert!(approx_eq(geom.top_face[0].y, -0.3));
        assert!(approx_eq(geom.top_face[0].z, -3.75));
    }

    #[test]
    fn test_validate_rejects_bad_size() {
        let mut panel = Panel::new("p", PanelShape::Square, "EX-1");
        panel.size = f64::NAN;
        assert!(matches!(
            panel.validate(),
            Err(PanelError::InvalidSize { .. })
        ));

        panel.size = 0.0;
        assert!(panel.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_thickness() {
        let mut panel = Panel::new("p", PanelShape::Square, "EX-1");
        panel.thickness = -0.1;
        assert!(matches!(
            panel.validate(),
            Err(PanelError::InvalidThickness { .. })
        ));
    }

    #[test]
    fn test_demo_layout() {
        let panels = Panel::demo_layout();
        assert_eq!(panels.len(), 4);
        assert!(panels.iter().all(|p| p.validate().is_ok()));
        assert_eq!(panels[0].label, "EX-1");
        assert_eq!(panels[2].shape, PanelShape::Pentagon);
    }
}
