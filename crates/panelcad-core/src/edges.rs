//! 网格特征边提取
//!
//! 对每个可导出节点的三角形几何计算特征边：两个相邻三角形面法线
//! 夹角超过二面角阈值（默认15°）的公共边，以及只属于单个三角形的
//! 边界边。边经节点世界变换后压平到2D（z 置 0），坐标按配置精度
//! 舍入，并在整次提取范围内按无向键去重。
//!
//! 阈值来源于经验调参，作为配置保留默认值。

use crate::math::{round_to, Point3};
use crate::scene::{SceneSnapshot, Triangle};
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 默认二面角阈值（度）
pub const DEFAULT_ANGLE_THRESHOLD_DEG: f64 = 15.0;

/// 投影后的无向线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Point3,
    pub end: Point3,
}

impl Edge {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

/// 特征边提取器
#[derive(Debug, Clone)]
pub struct EdgeExtractor {
    precision: u32,
    /// 二面角阈值（弧度）
    angle_threshold: f64,
}

impl EdgeExtractor {
    /// 创建提取器，使用默认二面角阈值
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD_DEG.to_radians(),
        }
    }

    /// 设置二面角阈值（度）
    pub fn with_angle_threshold_degrees(mut self, degrees: f64) -> Self {
        self.angle_threshold = degrees.to_radians();
        self
    }

    /// 提取去重后的2D边列表
    ///
    /// 遍历顺序确定：节点按深度优先、子节点按存储顺序访问，节点内
    /// 的边按首次出现顺序发出，因此相同输入总是产生相同输出。
    pub fn extract(&self, scene: &SceneSnapshot) -> Vec<Edge> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut edges = Vec::new();

        for (index, _role) in scene.eligible_nodes() {
            let node = scene.node(index);
            let transform = Transform3D::from_matrix(node.world_transform);

            for (a, b) in feature_edges(&node.triangles, self.angle_threshold) {
                let start = self.project(&transform.transform_point(&a));
                let end = self.project(&transform.transform_point(&b));

                if seen.insert(undirected_key(&start, &end, self.precision)) {
                    edges.push(Edge::new(start, end));
                }
            }
        }

        tracing::debug!(count = edges.len(), "extracted unique feature edges");
        edges
    }

    /// 压平到2D并按精度舍入
    fn project(&self, point: &Point3) -> Point3 {
        Point3::new(
            round_to(point.x, self.precision),
            round_to(point.y, self.precision),
            0.0,
        )
    }
}

/// 局部坐标系下的特征边
///
/// 拓扑按顶点坐标位模式建边表；退化三角形（无法线）不参与。
fn feature_edges(triangles: &[Triangle], angle_threshold: f64) -> Vec<(Point3, Point3)> {
    struct EdgeTopo {
        start: Point3,
        end: Point3,
        normals: Vec<crate::math::Vector3>,
    }

    let mut entries: Vec<EdgeTopo> = Vec::new();
    let mut index: HashMap<([u64; 3], [u64; 3]), usize> = HashMap::new();

    for triangle in triangles {
        let Some(normal) = triangle.normal() else {
            continue;
        };
        let vertices = triangle.vertices();
        for i in 0..3 {
            let a = vertices[i];
            let b = vertices[(i + 1) % 3];
            match index.entry(vertex_pair_key(&a, &b)) {
                std::collections::hash_map::Entry::Occupied(entry) => {
                    entries[*entry.get()].normals.push(normal);
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(entries.len());
                    entries.push(EdgeTopo {
                        start: a,
                        end: b,
                        normals: vec![normal],
                    });
                }
            }
        }
    }

    entries
        .into_iter()
        .filter(|topo| {
            if topo.normals.len() == 1 {
                // 边界边
                true
            } else {
                let dot = topo.normals[0].dot(&topo.normals[1]).clamp(-1.0, 1.0);
                dot.acos() > angle_threshold
            }
        })
        .map(|topo| (topo.start, topo.end))
        .collect()
}

/// 顶点坐标的位模式，用于节点内拓扑建边
fn vertex_bits(point: &Point3) -> [u64; 3] {
    [point.x.to_bits(), point.y.to_bits(), point.z.to_bits()]
}

/// 无向顶点对键（节点内拓扑）
fn vertex_pair_key(a: &Point3, b: &Point3) -> ([u64; 3], [u64; 3]) {
    let (ka, kb) = (vertex_bits(a), vertex_bits(b));
    if kb < ka {
        (kb, ka)
    } else {
        (ka, kb)
    }
}

/// 无向边去重键：两端点字符串编码按字典序排序后拼接
fn undirected_key(start: &Point3, end: &Point3, precision: u32) -> String {
    let p = precision as usize;
    let ka = format!("{:.p$},{:.p$}", start.x, start.y);
    let kb = format!("{:.p$},{:.p$}", end.x, end.y);
    if kb < ka {
        format!("{kb}|{ka}")
    } else {
        format!("{ka}|{kb}")
    }
}
