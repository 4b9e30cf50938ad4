//! 3D变换操作
//!
//! 面板摆放使用"先平移矩阵、再依次右乘三个旋转矩阵"的组合方式，
//! 即 M = T · Rx · Ry · Rz，对点应用时 Rz 最先生效。

use crate::math::{Matrix4, Point3, Vector3};
use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};

/// 3D仿射变换
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform3D {
    matrix: Matrix4,
}

impl Transform3D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(dx, dy, dz)),
        }
    }

    /// 创建绕X轴的旋转变换
    pub fn rotation_x(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::x_axis(), angle).to_homogeneous(),
        }
    }

    /// 创建绕Y轴的旋转变换
    pub fn rotation_y(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous(),
        }
    }

    /// 创建绕Z轴的旋转变换
    pub fn rotation_z(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous(),
        }
    }

    /// 面板摆放变换：Translate(position) · RotX(rx) · RotY(ry) · RotZ(rz)
    pub fn placement(position: &Point3, rotation: (f64, f64, f64)) -> Self {
        let (rx, ry, rz) = rotation;
        Self::translation(position.x, position.y, position.z)
            .then(&Self::rotation_x(rx))
            .then(&Self::rotation_y(ry))
            .then(&Self::rotation_z(rz))
    }

    /// 组合两个变换（self 在后，other 在前）
    pub fn then(&self, other: &Transform3D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let v = self.matrix * point.to_homogeneous();
        Point3::new(v.x, v.y, v.z)
    }

    /// 变换一组点，保持顺序和数量
    ///
    /// 非有限坐标（NaN/inf）原样通过，不做清洗。
    pub fn transform_points(&self, points: &[Point3]) -> Vec<Point3> {
        points.iter().map(|p| self.transform_point(p)).collect()
    }

    /// 获取变换矩阵
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// 从矩阵创建变换
    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self { matrix }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
