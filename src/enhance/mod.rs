//! Retinal image enhancement.
//!
//! Overview
//! - The green channel carries the most vessel contrast in fundus photographs
//!   and is the basis of every derived plane.
//! - Gamma correction, then CLAHE, produce `enhanced_green`, which feeds both
//!   the colour recomposition consumed by the classifier and the top-hat
//!   vessel enhancement.
//! - `denoised` is a non-local-means pass over `enhanced_green`. It is exposed
//!   for visualisation only and does not feed any later stage.
//!
//! Modules
//! - [`gamma`] – lookup-table gamma curve.
//! - [`clahe`] – tiled, contrast-limited histogram equalisation.
//! - [`denoise`] – non-local-means filter.
//! - [`morphology`] – elliptical structuring element and top-hat.

pub mod clahe;
pub mod denoise;
pub mod gamma;
pub mod morphology;

use crate::config::PreprocessingConfig;
use crate::error::ImageError;
use crate::image::{ColorImageU8, GrayImageU8, RawImage};
use clahe::{clahe, ClaheParams};
use denoise::non_local_means;
use gamma::gamma_correct;
use log::debug;
use morphology::{saturating_add, top_hat, StructuringElement};

/// Radius of the elliptical element used for vessel enhancement (5×5).
pub const VESSEL_KERNEL_RADIUS: usize = 2;

const GREEN: usize = 1;

/// Every image variant derived from one photograph. All variants share the
/// source width and height.
#[derive(Clone, Debug)]
pub struct EnhancementSet {
    /// Input as received, in its original channel order.
    pub original: RawImage,
    /// Input converted to RGB order.
    pub rgb: ColorImageU8,
    pub green_channel: GrayImageU8,
    pub gamma_corrected: GrayImageU8,
    /// CLAHE applied to `gamma_corrected`.
    pub enhanced_green: GrayImageU8,
    /// Non-local-means filtered `enhanced_green`; diagnostic output only.
    pub denoised: GrayImageU8,
    /// `enhanced_green` plus its white top-hat.
    pub vessel_enhanced: GrayImageU8,
    /// `rgb` with its green channel replaced by `enhanced_green`.
    pub enhanced_color: ColorImageU8,
}

/// Borrowed view of one named variant.
#[derive(Clone, Copy, Debug)]
pub enum Variant<'a> {
    Color(&'a ColorImageU8),
    Gray(&'a GrayImageU8),
}

impl Variant<'_> {
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Variant::Color(img) => (img.w, img.h),
            Variant::Gray(img) => (img.w, img.h),
        }
    }
}

impl EnhancementSet {
    pub fn width(&self) -> usize {
        self.original.w
    }

    pub fn height(&self) -> usize {
        self.original.h
    }

    /// All eight variants with their names.
    pub fn variants(&self) -> [(&'static str, Variant<'_>); 8] {
        [
            ("original", Variant::Color(&self.original)),
            ("rgb", Variant::Color(&self.rgb)),
            ("green_channel", Variant::Gray(&self.green_channel)),
            ("gamma_corrected", Variant::Gray(&self.gamma_corrected)),
            ("enhanced_green", Variant::Gray(&self.enhanced_green)),
            ("denoised", Variant::Gray(&self.denoised)),
            ("vessel_enhanced", Variant::Gray(&self.vessel_enhanced)),
            ("enhanced_color", Variant::Color(&self.enhanced_color)),
        ]
    }
}

/// Derive the full [`EnhancementSet`] from a photograph. Deterministic.
pub fn enhance(raw: &RawImage, params: &PreprocessingConfig) -> Result<EnhancementSet, ImageError> {
    debug!(
        "enhance start w={} h={} gamma={} clip={} grid={:?} denoise={}",
        raw.w,
        raw.h,
        params.gamma_correction,
        params.clahe_clip_limit,
        params.clahe_grid_size,
        params.denoise_strength
    );
    let rgb = raw.to_rgb();
    let green_channel = raw.green();
    let gamma_corrected = gamma_correct(&green_channel, params.gamma_correction);

    let clahe_params = ClaheParams {
        clip_limit: params.clahe_clip_limit,
        grid: params.clahe_grid_size,
    };
    let enhanced_green = clahe(gamma_corrected.as_view(), &clahe_params);
    let denoised = non_local_means(&enhanced_green, params.denoise_strength);

    let element = StructuringElement::ellipse(VESSEL_KERNEL_RADIUS);
    let vessels = top_hat(&enhanced_green, &element);
    let vessel_enhanced = saturating_add(&enhanced_green, &vessels);

    let enhanced_color = rgb.with_channel(GREEN, &enhanced_green)?;

    Ok(EnhancementSet {
        original: raw.clone(),
        rgb,
        green_channel,
        gamma_corrected,
        enhanced_green,
        denoised,
        vessel_enhanced,
        enhanced_color,
    })
}
