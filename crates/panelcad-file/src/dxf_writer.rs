//! DXF ASCII 序列化
//!
//! 输出 R2007 (AC1021) 的组码文本格式。
//!
//! # 文件结构
//!
//! ```text
//! 0
//! SECTION
//! 2
//! HEADER          ← 版本号与图纸范围
//! ...
//! 0
//! ENDSEC
//! （TABLES：图层、线型、文字样式）
//! （ENTITIES：POLYLINE / LINE / TEXT）
//! （OBJECTS：空段，部分读取器要求存在）
//! 0
//! EOF
//! ```
//!
//! # 组码 (Group Code)
//!
//! 每个数据项由两行组成：第一行组码，第二行值。常用组码：
//! - 0: 实体类型
//! - 2: 名称
//! - 8: 图层名
//! - 10, 20, 30: X, Y, Z 坐标
//! - 11, 21, 31: 第二个点
//! - 40: 浮点数值（文字高度等）
//!
//! # 输出确定性
//!
//! 坐标一律按固定6位小数打印，行以 `\n` 连接、末尾带换行；
//! 相同文档总是产生相同字节序列。

use crate::drawing::{Drawing, DrawingEntity};
use crate::error::ExportError;
use panelcad_core::math::Point3;

/// DXF 写入器
///
/// 只负责组码文本的拼装，实体遍历由 [`serialize`] 驱动。
pub struct DxfWriter {
    lines: Vec<String>,
}

impl DxfWriter {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// 写入组码-值对
    pub fn pair(&mut self, code: i32, value: impl std::fmt::Display) {
        self.lines.push(code.to_string());
        self.lines.push(value.to_string());
    }

    /// 写入坐标值（固定6位小数）
    pub fn coord(&mut self, code: i32, value: f64) {
        self.pair(code, format!("{value:.6}"));
    }

    /// 写入点坐标（组码 base, base+10, base+20）
    pub fn point(&mut self, base_code: i32, point: &Point3) {
        self.coord(base_code, point.x);
        self.coord(base_code + 10, point.y);
        self.coord(base_code + 20, point.z);
    }

    /// 写入 SECTION 开始
    pub fn begin_section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    /// 写入 SECTION 结束
    pub fn end_section(&mut self) {
        self.pair(0, "ENDSEC");
    }

    /// 获取输出文本
    pub fn finish(mut self) -> String {
        self.pair(0, "EOF");
        let mut output = self.lines.join("\n");
        output.push('\n');
        output
    }
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// 将图纸文档序列化为 DXF 文本
///
/// 所有实体写入 `layer_name` 指定的单一图层。
pub fn serialize(drawing: &Drawing, layer_name: &str) -> Result<String, ExportError> {
    let mut writer = DxfWriter::new();

    write_header(&mut writer);
    write_tables(&mut writer, layer_name);

    writer.begin_section("ENTITIES");
    for entity in drawing.entities() {
        match entity {
            DrawingEntity::Polyline { points, closed } => {
                write_polyline(&mut writer, points, *closed, layer_name)?;
            }
            DrawingEntity::Line { start, end } => {
                writer.pair(0, "LINE");
                writer.pair(8, layer_name);
                writer.point(10, start);
                writer.point(11, end);
            }
            DrawingEntity::Text {
                content,
                position,
                height,
            } => {
                writer.pair(0, "TEXT");
                writer.pair(8, layer_name);
                writer.point(10, position);
                writer.coord(40, *height);
                writer.pair(1, content);
                writer.pair(7, "STANDARD");
            }
        }
    }
    writer.end_section();

    // 空 OBJECTS 段：部分读取器要求该段存在
    writer.begin_section("OBJECTS");
    writer.end_section();

    Ok(writer.finish())
}

/// HEADER 段：版本号、插入基点、图纸范围
fn write_header(writer: &mut DxfWriter) {
    writer.begin_section("HEADER");

    writer.pair(9, "$ACADVER");
    writer.pair(1, "AC1021");

    writer.pair(9, "$INSBASE");
    writer.pair(10, "0.0");
    writer.pair(20, "0.0");
    writer.pair(30, "0.0");

    writer.pair(9, "$EXTMIN");
    writer.pair(10, "-100.0");
    writer.pair(20, "-100.0");
    writer.pair(30, "-100.0");

    writer.pair(9, "$EXTMAX");
    writer.pair(10, "100.0");
    writer.pair(20, "100.0");
    writer.pair(30, "100.0");

    writer.end_section();
}

/// TABLES 段：单一用户图层、CONTINUOUS 线型、STANDARD 文字样式
fn write_tables(writer: &mut DxfWriter, layer_name: &str) {
    writer.begin_section("TABLES");

    writer.pair(0, "TABLE");
    writer.pair(2, "LAYER");
    writer.pair(70, 1);
    writer.pair(0, "LAYER");
    writer.pair(2, layer_name);
    writer.pair(70, 0);
    writer.pair(62, 7);
    writer.pair(6, "CONTINUOUS");
    writer.pair(0, "ENDTAB");

    writer.pair(0, "TABLE");
    writer.pair(2, "LTYPE");
    writer.pair(70, 1);
    writer.pair(0, "LTYPE");
    writer.pair(2, "CONTINUOUS");
    writer.pair(70, 0);
    writer.pair(3, "Solid line");
    writer.pair(72, 65);
    writer.pair(73, 0);
    writer.pair(40, "0.0");
    writer.pair(0, "ENDTAB");

    writer.pair(0, "TABLE");
    writer.pair(2, "STYLE");
    writer.pair(70, 1);
    writer.pair(0, "STYLE");
    writer.pair(2, "STANDARD");
    writer.pair(70, 0);
    writer.pair(40, "0.0");
    writer.pair(41, "1.0");
    writer.pair(0, "ENDTAB");

    writer.end_section();
}

/// POLYLINE + VERTEX… + SEQEND
///
/// 闭合折线若首尾顶点不同，补发一次首顶点。
fn write_polyline(
    writer: &mut DxfWriter,
    points: &[Point3],
    closed: bool,
    layer_name: &str,
) -> Result<(), ExportError> {
    if points.len() < 2 {
        return Err(ExportError::Serialization(format!(
            "polyline needs at least 2 points, got {}",
            points.len()
        )));
    }

    writer.pair(0, "POLYLINE");
    writer.pair(8, layer_name);
    writer.pair(66, 1);
    writer.pair(70, 0);

    let write_vertex = |writer: &mut DxfWriter, point: &Point3| {
        writer.pair(0, "VERTEX");
        writer.pair(8, layer_name);
        writer.point(10, point);
    };

    for point in points {
        write_vertex(writer, point);
    }
    if closed && points.first() != points.last() {
        write_vertex(writer, &points[0]);
    }

    writer.pair(0, "SEQEND");
    writer.pair(8, layer_name);
    Ok(())
}
