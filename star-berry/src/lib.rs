#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 从上游实例分割模型给出的逐像素实例标签图出发, 重建气泡 (近圆/椭圆对象)
//! 的真实轮廓, 即使对象被相邻气泡或图像边缘部分遮挡.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 标签图中 `0` 为背景, 每个正整数代表一个实例. 实例编号可以不连续,
//!   也允许某个编号没有任何像素 (视为上游的正常产物, 直接跳过).
//! 2. 坐标一律为 `(行, 列)`, 即 `(h, w)`. 物理尺寸 = 像素尺寸 × `metric`.
//!
//! # 开发计划
//!
//! ### 径向距离编码 (RDC) 采样 ✅
//!
//! 从实例质心出发, 沿等角间隔的射线向外生长, 直到触碰到其它标签或图像边缘.
//!
//! 实现位于 `star-berry/src/rdc`.
//!
//! ### 遮挡射线判别 ✅
//!
//! 射线端点位于图像边缘, 或其 3×3 邻域内没有背景像素, 则视为被遮挡.
//!
//! 实现位于 `star-berry/src/rdc/classify.rs`.
//!
//! ### 射线长度校正接口 ✅
//!
//! 外部学习模型通过 [`ShapeCorrector`] 接入. 只有当被遮挡射线多于一条时才调用.
//!
//! 实现位于 `star-berry/src/corrector.rs`.
//!
//! ### 长短轴与等效球径 ✅
//!
//! 穷举最远点对得到长轴, 在垂直带内再求最远点对得到短轴.
//! 候选点不足时沿多边形周长加密.
//!
//! 实现位于 `star-berry/src/geometry`.
//!
//! ### 椭圆拟合回退路径 ✅
//!
//! 直接最小二乘椭圆拟合, 面积不合理时以全部端点重试.
//!
//! 实现位于 `star-berry/src/fitting`.
//!
//! ### 整图编排 ✅
//!
//! 实现位于 `star-berry/src/reco`. 可选 `rayon` 并行.
//!
//! ### 小功能 ✅
//!
//! 1. 可视化描述符与叠加图渲染 (颜色由调用方给定种子, 无全局随机状态). ✅
//! 2. 单图统计 (气泡数, 总面积, 覆盖率). ✅
//! 3. 标签图 16-bit PNG 读写, 目录加载器. ✅

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 高精度通用坐标 `(行, 列)` / 向量.
pub type Idx2dF = (f64, f64);

/// 有符号像素坐标. 校正后的轮廓可能越出图像, 因此需要符号.
pub type Idx2dI = (i64, i64);

pub mod consts;

/// 实例标签图基础数据结构.
mod data;

pub use data::{ImgWriteRaw, ImgWriteVis, Instance, LabelImage, LabelIoError, OwnedLabelImage};

pub mod bubble;
pub mod corrector;
pub mod dataset;
pub mod fitting;
pub mod geometry;
pub mod prelude;
pub mod rdc;
pub mod reco;
pub mod stats;
pub mod visual;

pub use bubble::Bubble;
pub use corrector::ShapeCorrector;
pub use reco::{hidden_reco, Method, RecoError, RecoOptions, Reconstruction, Reconstructor};
