//! 标签放置
//!
//! 为每个可导出且带几何的节点生成一条文字标签：位置取该节点世界
//! 坐标包围盒的中心，压平到2D并按精度舍入；文字取节点角色映射后
//! 的导出名称。多个节点映射到同一标签文字时，保留首个出现的。

use crate::math::{round_to, BoundingBox3, Point3};
use crate::scene::SceneSnapshot;
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 文字标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Point3,
}

impl Label {
    pub fn new(text: impl Into<String>, position: Point3) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// 从场景快照提取标签
///
/// 无三角形几何的可导出节点没有包围盒，跳过。输出顺序跟随
/// [`SceneSnapshot::eligible_nodes`] 的遍历顺序。
pub fn extract_labels(scene: &SceneSnapshot, precision: u32) -> Vec<Label> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut labels = Vec::new();

    for (index, role) in scene.eligible_nodes() {
        let node = scene.node(index);
        if node.triangles.is_empty() {
            continue;
        }

        let transform = Transform3D::from_matrix(node.world_transform);
        let world_points = node
            .triangles
            .iter()
            .flat_map(|t| t.vertices())
            .map(|p| transform.transform_point(&p));
        let Some(bbox) = BoundingBox3::from_points(world_points) else {
            continue;
        };

        let center = bbox.center();
        let position = Point3::new(
            round_to(center.x, precision),
            round_to(center.y, precision),
            0.0,
        );

        let text = role.export_label(&node.name);
        if seen.insert(text.clone()) {
            labels.push(Label::new(text, position));
        }
    }

    tracing::debug!(count = labels.len(), "placed labels");
    labels
}
