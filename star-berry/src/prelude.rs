//! 🫧欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx2dF, Idx2dI};

pub use crate::{ImgWriteRaw, ImgWriteVis, Instance, LabelImage, LabelIoError, OwnedLabelImage};

pub use crate::consts::{BACKGROUND, DEFAULT_RAY_COUNT};

pub use crate::bubble::{Bubble, Method, Unit};
pub use crate::corrector::{CorrectorError, FnCorrector, IdentityCorrector, ShapeCorrector};
pub use crate::fitting::{ConicFitter, DirectFitter, EllipseFit, FitError};
pub use crate::rdc::{RayPoint, RdSample, SmoothBoundary};
pub use crate::reco::{
    hidden_reco, RecoError, RecoOptions, RecoResult, Reconstruction, Reconstructor, SkipReason,
    Skipped,
};
pub use crate::stats::ImageStats;
pub use crate::visual::{render_overlay, save_overlay, ColorSource, VisualItem};

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{self, label_loader, LabelLoader};
