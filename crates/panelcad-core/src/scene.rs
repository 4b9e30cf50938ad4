//! 场景快照
//!
//! 导出引擎不直接持有宿主的场景图（可变、引用密集的树），而是读取
//! 一份不可变快照：节点存放在索引式 arena 中，子节点通过下标引用。
//! 遍历因此不会观察到宿主侧的并发修改，也无需共享所有权或加锁。
//!
//! 节点按名称分类为面板节点或无关节点；分类规则集中在
//! [`classify_name`]，便于独立测试和替换。

use crate::math::{Matrix4, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// 三角形图元
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// 单位面法线；退化（零面积）三角形返回 `None`
    pub fn normal(&self) -> Option<Vector3> {
        let n = (self.b - self.a).cross(&(self.c - self.a));
        let len = n.norm();
        if len < EPSILON {
            None
        } else {
            Some(n / len)
        }
    }

    /// 三个顶点
    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }
}

/// 场景节点在 arena 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub usize);

/// 场景节点
///
/// 字段对应导出引擎从宿主场景图读取的最小集合：
/// 名称、可渲染标记、可见性、世界变换和三角形列表。
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// 节点名称
    pub name: String,

    /// 是否为可渲染网格节点
    pub renderable: bool,

    /// 是否可见
    pub visible: bool,

    /// 世界变换矩阵（宿主已组合好父链）
    pub world_transform: Matrix4,

    /// 三角形几何
    pub triangles: Vec<Triangle>,

    /// 子节点下标，按存储顺序遍历
    children: Vec<NodeIndex>,
}

impl SceneNode {
    /// 创建新节点（默认不可渲染的分组节点）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            renderable: false,
            visible: true,
            world_transform: Matrix4::identity(),
            triangles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 设置为可渲染网格并附加几何
    pub fn with_triangles(mut self, triangles: Vec<Triangle>) -> Self {
        self.renderable = true;
        self.triangles = triangles;
        self
    }

    /// 设置世界变换
    pub fn with_world_transform(mut self, transform: Matrix4) -> Self {
        self.world_transform = transform;
        self
    }

    /// 设置可见性
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// 子节点下标
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}

/// 不可变场景快照
///
/// 第一个加入的节点是根。
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    nodes: Vec<SceneNode>,
}

impl SceneSnapshot {
    /// 创建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置根节点，返回其下标
    ///
    /// 只能在快照为空时调用。
    pub fn add_root(&mut self, node: SceneNode) -> NodeIndex {
        debug_assert!(self.nodes.is_empty(), "root already set");
        self.nodes.push(node);
        NodeIndex(0)
    }

    /// 向指定父节点追加子节点，返回其下标
    pub fn add_child(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(index);
        index
    }

    /// 根节点下标
    pub fn root(&self) -> Option<NodeIndex> {
        (!self.nodes.is_empty()).then_some(NodeIndex(0))
    }

    /// 获取节点
    pub fn node(&self, index: NodeIndex) -> &SceneNode {
        &self.nodes[index.0]
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空快照
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 深度优先收集可导出节点及其有效角色
    ///
    /// 节点可导出需同时满足：可渲染、可见、按名称（或最近的已分类
    /// 祖先名称）分类为面板。不可见节点自身被跳过，但其子树仍会遍历。
    pub fn eligible_nodes(&self) -> Vec<(NodeIndex, NodeRole)> {
        let mut result = Vec::new();
        if let Some(root) = self.root() {
            self.collect_eligible(root, None, &mut result);
        }
        result
    }

    fn collect_eligible(
        &self,
        index: NodeIndex,
        inherited: Option<&NodeRole>,
        result: &mut Vec<(NodeIndex, NodeRole)>,
    ) {
        let node = self.node(index);
        let own_role = classify_name(&node.name);

        // 自身未被识别时回退到最近的已分类祖先
        let effective = match &own_role {
            NodeRole::Panel { .. } => Some(&own_role),
            NodeRole::Ignored => inherited,
        };

        if node.renderable && node.visible {
            if let Some(role @ NodeRole::Panel { .. }) = effective {
                result.push((index, role.clone()));
            }
        }

        for &child in node.children() {
            self.collect_eligible(child, effective, result);
        }
    }
}

/// 面板分组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelGroup {
    /// 编号外墙板组（名称含 "EXT"）
    Exterior,
    /// 未编号的面板节点（名称含 "Panel"）
    Generic,
}

/// 节点角色
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// 可导出面板
    Panel {
        group: PanelGroup,
        /// 组内编号（"EXT_3" → 3），无编号或无法解析时为 None
        index: Option<u32>,
    },
    /// 与面板无关
    Ignored,
}

impl NodeRole {
    /// 节点名到导出标签的确定性映射
    ///
    /// 编号外墙板改写为外部标签方案（"EXT_1" → "EX-1"），
    /// 其余可导出名称原样通过。
    pub fn export_label(&self, name: &str) -> String {
        match self {
            NodeRole::Panel {
                group: PanelGroup::Exterior,
                index: Some(n),
            } => format!("EX-{n}"),
            _ => name.to_string(),
        }
    }
}

/// 按名称分类节点
///
/// 识别的面板组标记（"EXT"、"Panel"）沿用来源数据的约定；
/// 规则集中于此，替换标记只需改这一处。
pub fn classify_name(name: &str) -> NodeRole {
    if name.contains("EXT") {
        let index = name.split('_').nth(1).and_then(|s| s.parse().ok());
        NodeRole::Panel {
            group: PanelGroup::Exterior,
            index,
        }
    } else if name.contains("Panel") {
        NodeRole::Panel {
            group: PanelGroup::Generic,
            index: None,
        }
    } else {
        NodeRole::Ignored
    }
}
