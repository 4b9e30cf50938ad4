//! 图纸文档模型
//!
//! 序列化之前的中间表示：实体按加入顺序保存，序列化按同一顺序
//! 输出，文档内容与输出字节因此一一对应。

use panelcad_core::math::Point3;
use serde::{Deserialize, Serialize};

/// 图纸实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingEntity {
    /// 折线；`closed` 为真且首尾顶点不同时序列化阶段补回首顶点
    Polyline { points: Vec<Point3>, closed: bool },

    /// 独立线段
    Line { start: Point3, end: Point3 },

    /// 文字
    Text {
        content: String,
        position: Point3,
        height: f64,
    },
}

/// 图纸文档
///
/// 纯数据累加器，不做几何校验；无效实体在序列化时报错。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    entities: Vec<DrawingEntity>,
}

impl Drawing {
    /// 创建空文档
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加折线
    pub fn add_polyline(&mut self, points: Vec<Point3>, closed: bool) {
        self.entities.push(DrawingEntity::Polyline { points, closed });
    }

    /// 追加线段
    pub fn add_line(&mut self, start: Point3, end: Point3) {
        self.entities.push(DrawingEntity::Line { start, end });
    }

    /// 追加文字
    pub fn add_text(&mut self, content: impl Into<String>, position: Point3, height: f64) {
        self.entities.push(DrawingEntity::Text {
            content: content.into(),
            position,
            height,
        });
    }

    /// 实体列表（加入顺序）
    pub fn entities(&self) -> &[DrawingEntity] {
        &self.entities
    }

    /// 实体数量
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// 是否为空文档
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
