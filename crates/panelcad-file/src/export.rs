//! 导出编排
//!
//! 将两种几何来源（参数化面板列表、场景快照）组装为图纸文档并
//! 序列化为 DXF 文本。编排层负责失败策略：输入校验先于任何几何
//! 生成，全部通过后才产出实体；空结果（没有可导出内容）不是错误，
//! 输出合法的空图纸。

use crate::drawing::Drawing;
use crate::dxf_writer;
use crate::error::ExportError;
use panelcad_core::edges::EdgeExtractor;
use panelcad_core::labels::extract_labels;
use panelcad_core::panel::Panel;
use panelcad_core::scene::SceneSnapshot;
use std::path::{Path, PathBuf};
use tracing::info;

/// 标签文字高度（图纸单位）
pub const TEXT_HEIGHT: f64 = 0.5;

/// 默认坐标精度（小数位）
pub const DEFAULT_PRECISION: u32 = 4;

/// 几何来源
#[derive(Debug, Clone)]
pub enum ExportSource {
    /// 参数化面板列表
    Panels(Vec<Panel>),
    /// 场景快照
    Scene(SceneSnapshot),
}

/// 导出请求
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: ExportSource,
    pub filename: String,
    pub layer_name: String,
    pub precision: u32,
    pub include_labels: bool,
    /// 特征边二面角阈值（度）；None 使用默认值
    pub angle_threshold_deg: Option<f64>,
}

impl ExportRequest {
    /// 面板列表导出，使用面板路径的默认文件名和图层
    pub fn panels(panels: Vec<Panel>) -> Self {
        Self {
            source: ExportSource::Panels(panels),
            filename: "panel_export.dxf".to_string(),
            layer_name: "PANELS".to_string(),
            precision: DEFAULT_PRECISION,
            include_labels: true,
            angle_threshold_deg: None,
        }
    }

    /// 场景快照导出，使用场景路径的默认文件名和图层
    pub fn scene(scene: SceneSnapshot) -> Self {
        Self {
            source: ExportSource::Scene(scene),
            filename: "wall_layout.dxf".to_string(),
            layer_name: "WALL_LAYOUT".to_string(),
            precision: DEFAULT_PRECISION,
            include_labels: true,
            angle_threshold_deg: None,
        }
    }

    /// 设置输出文件名
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// 设置图层名
    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = layer_name.into();
        self
    }

    /// 设置坐标精度（小数位）
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// 开关标签输出
    pub fn with_labels(mut self, include_labels: bool) -> Self {
        self.include_labels = include_labels;
        self
    }

    /// 设置特征边二面角阈值（度）
    pub fn with_angle_threshold_degrees(mut self, degrees: f64) -> Self {
        self.angle_threshold_deg = Some(degrees);
        self
    }
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub filename: String,
    pub content: String,
}

impl ExportOutput {
    /// 输出字节
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// 按请求的文件名保存到目录，返回完整路径
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.bytes())?;
        Ok(path)
    }
}

/// 执行导出
pub fn export(request: &ExportRequest) -> Result<ExportOutput, ExportError> {
    let drawing = match &request.source {
        ExportSource::Panels(panels) => build_panel_drawing(panels, request)?,
        ExportSource::Scene(scene) => build_scene_drawing(scene, request)?,
    };

    let content = dxf_writer::serialize(&drawing, &request.layer_name)?;
    info!(
        filename = %request.filename,
        entities = drawing.len(),
        bytes = content.len(),
        "export complete"
    );

    Ok(ExportOutput {
        filename: request.filename.clone(),
        content,
    })
}

/// 面板路径：逐板产出顶面/底面折线、侧边线段和标签
///
/// 先整体校验，任一面板非法则整次导出失败，不产出部分结果。
/// 空面板列表合法，输出空图纸。
fn build_panel_drawing(panels: &[Panel], request: &ExportRequest) -> Result<Drawing, ExportError> {
    for panel in panels {
        panel.validate()?;
    }

    let mut drawing = Drawing::new();
    for panel in panels {
        let geometry = panel.generate_geometry();
        drawing.add_polyline(geometry.top_face, true);
        drawing.add_polyline(geometry.bottom_face, true);
        for edge in &geometry.side_edges {
            drawing.add_line(edge.start, edge.end);
        }
        if request.include_labels {
            drawing.add_text(&panel.label, geometry.label_position, TEXT_HEIGHT);
        }
    }

    info!(panels = panels.len(), "panel drawing built");
    Ok(drawing)
}

/// 场景路径：特征边提取 + 标签放置
///
/// 空快照视为输入错误；有节点但无可导出几何输出空图纸。
fn build_scene_drawing(
    scene: &SceneSnapshot,
    request: &ExportRequest,
) -> Result<Drawing, ExportError> {
    if scene.is_empty() {
        return Err(ExportError::EmptyScene);
    }

    let mut extractor = EdgeExtractor::new(request.precision);
    if let Some(degrees) = request.angle_threshold_deg {
        extractor = extractor.with_angle_threshold_degrees(degrees);
    }

    let edges = extractor.extract(scene);
    let mut drawing = Drawing::new();
    for edge in &edges {
        drawing.add_line(edge.start, edge.end);
    }

    if request.include_labels {
        for label in extract_labels(scene, request.precision) {
            drawing.add_text(label.text, label.position, TEXT_HEIGHT);
        }
    }

    info!(edges = edges.len(), "scene drawing built");
    Ok(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcad_core::math::Point3;
    use panelcad_core::panel::PanelShape;
    use panelcad_core::scene::{SceneNode, Triangle};

    fn entity_count(content: &str, name: &str) -> usize {
        content.lines().filter(|line| *line == name).count()
    }

    #[test]
    fn test_single_square_panel() {
        let panel = Panel::new("p1", PanelShape::Square, "EX-1").with_dimensions(10.0, 0.3);
        let output = export(&ExportRequest::panels(vec![panel])).unwrap();

        // 顶面+底面两条折线，各5个顶点（闭合环），4条侧边，1条标签
        assert_eq!(entity_count(&output.content, "POLYLINE"), 2);
        assert_eq!(entity_count(&output.content, "VERTEX"), 10);
        assert_eq!(entity_count(&output.content, "LINE"), 4);
        assert_eq!(entity_count(&output.content, "TEXT"), 1);
        assert!(output.content.contains("1\nEX-1\n"));
        assert_eq!(output.filename, "panel_export.dxf");
    }

    #[test]
    fn test_pentagon_panel_vertex_count() {
        let panel = Panel::new("p1", PanelShape::Pentagon, "EX-2").with_dimensions(10.0, 0.3);
        let output = export(&ExportRequest::panels(vec![panel])).unwrap();

        assert_eq!(entity_count(&output.content, "VERTEX"), 12);
        assert_eq!(entity_count(&output.content, "LINE"), 5);
    }

    #[test]
    fn test_labels_disabled() {
        let panel = Panel::new("p1", PanelShape::Square, "EX-1");
        let request = ExportRequest::panels(vec![panel]).with_labels(false);
        let output = export(&request).unwrap();

        assert_eq!(entity_count(&output.content, "TEXT"), 0);
        assert_eq!(entity_count(&output.content, "POLYLINE"), 2);
    }

    #[test]
    fn test_empty_panel_list_is_valid() {
        let output = export(&ExportRequest::panels(vec![])).unwrap();

        assert!(output.content.starts_with("0\nSECTION\n"));
        assert!(output.content.ends_with("0\nEOF\n"));
        assert_eq!(entity_count(&output.content, "POLYLINE"), 0);
        assert_eq!(entity_count(&output.content, "TEXT"), 0);
    }

    #[test]
    fn test_invalid_panel_fails_whole_export() {
        let good = Panel::new("p1", PanelShape::Square, "EX-1");
        let mut bad = Panel::new("p2", PanelShape::Square, "EX-2");
        bad.size = -1.0;

        let result = export(&ExportRequest::panels(vec![good, bad]));
        assert!(matches!(result, Err(ExportError::Panel(_))));
    }

    #[test]
    fn test_demo_layout_export() {
        let output = export(&ExportRequest::panels(Panel::demo_layout())).unwrap();

        // 4块面板：8条折线、44个顶点（2×(5+5) + 2×(6+6)）、18条侧边、4条标签
        assert_eq!(entity_count(&output.content, "POLYLINE"), 8);
        assert_eq!(entity_count(&output.content, "VERTEX"), 44);
        assert_eq!(entity_count(&output.content, "LINE"), 18);
        assert_eq!(entity_count(&output.content, "TEXT"), 4);
        for label in ["EX-1", "EX-2", "EX-3", "EX-4"] {
            assert!(output.content.contains(&format!("1\n{label}\n")));
        }
    }

    #[test]
    fn test_empty_scene_is_error() {
        let result = export(&ExportRequest::scene(SceneSnapshot::new()));
        assert!(matches!(result, Err(ExportError::EmptyScene)));
    }

    #[test]
    fn test_scene_without_panels_exports_empty_drawing() {
        let mut scene = SceneSnapshot::new();
        let root = scene.add_root(SceneNode::new("Scene"));
        scene.add_child(root, SceneNode::new("Chair"));

        let output = export(&ExportRequest::scene(scene)).unwrap();
        assert_eq!(entity_count(&output.content, "LINE"), 0);
        assert_eq!(entity_count(&output.content, "TEXT"), 0);
        assert!(output.content.ends_with("0\nEOF\n"));
        assert_eq!(output.filename, "wall_layout.dxf");
    }

    #[test]
    fn test_scene_export_edges_and_labels() {
        let mut scene = SceneSnapshot::new();
        let root = scene.add_root(SceneNode::new("Scene"));
        scene.add_child(
            root,
            SceneNode::new("EXT_1").with_triangles(vec![
                Triangle::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(2.0, 0.0, 0.0),
                    Point3::new(2.0, 2.0, 0.0),
                ),
                Triangle::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(2.0, 2.0, 0.0),
                    Point3::new(0.0, 2.0, 0.0),
                ),
            ]),
        );

        let output = export(&ExportRequest::scene(scene)).unwrap();
        // 共面四边形：4条边界边 + 1条标签
        assert_eq!(entity_count(&output.content, "LINE"), 4);
        assert_eq!(entity_count(&output.content, "TEXT"), 1);
        assert!(output.content.contains("1\nEX-1\n"));
    }

    #[test]
    fn test_custom_request_options() {
        let request = ExportRequest::panels(vec![])
            .with_filename("custom.dxf")
            .with_layer_name("CUSTOM")
            .with_precision(2);
        let output = export(&request).unwrap();

        assert_eq!(output.filename, "custom.dxf");
        assert!(output.content.contains("0\nLAYER\n2\nCUSTOM\n"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let request = ExportRequest::panels(Panel::demo_layout());
        let first = export(&request).unwrap();
        let second = export(&request).unwrap();
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = std::env::temp_dir();
        let output = export(&ExportRequest::panels(vec![])).unwrap();
        let path = output.save(&dir).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, output.content);
        std::fs::remove_file(&path).ok();
    }
}
