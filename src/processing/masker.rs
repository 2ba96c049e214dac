use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use log::Level;

use crate::models::{ManualMask, MaskRegion, OcrToken};
use crate::processing::matcher::match_token;

/// Outline thickness of the detection preview boxes, in pixels.
const PREVIEW_THICKNESS: i64 = 2;

/// Picks the tokens whose normalized text is an NRIC/FIN and returns one
/// region per match, in token order.
///
/// Each token is logged (raw, normalized, and the box on a match) at `debug`
/// level, or at `info` when `verbose` is set.
pub fn detect_identifiers(tokens: &[OcrToken], verbose: bool) -> Vec<MaskRegion> {
    let level = if verbose { Level::Info } else { Level::Debug };
    let mut regions = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let Some(result) = match_token(&token.text) else {
            continue;
        };
        log::log!(
            level,
            "OCR[{}]: raw='{}' | normalized='{}'",
            i,
            token.text,
            result.normalized
        );
        if result.matched {
            let b = &token.bounding_box;
            log::log!(
                level,
                "  matched, masking at ({}, {}, {}, {})",
                b.left,
                b.top,
                b.width,
                b.height
            );
            regions.push(MaskRegion::from_box(b));
        }
    }

    regions
}

/// Paints `region` with an opaque `fill`, clipped to the image. Degenerate or
/// fully off-image regions paint nothing.
pub fn paint_region(image: &mut RgbImage, region: &MaskRegion, fill: Rgb<u8>) {
    if let Some(rect) = region.clip(image.width(), image.height()) {
        draw_filled_rect_mut(image, rect, fill);
    }
}

/// Masks every NRIC/FIN token in place and returns how many were masked.
pub fn mask_identifiers(
    image: &mut RgbImage,
    tokens: &[OcrToken],
    fill: Rgb<u8>,
    verbose: bool,
) -> usize {
    let regions = detect_identifiers(tokens, verbose);
    for region in &regions {
        paint_region(image, region, fill);
    }
    regions.len()
}

/// Paints user-drawn rectangles on top of an already masked image.
pub fn apply_manual_masks(image: &mut RgbImage, masks: &[ManualMask], fill: Rgb<u8>) -> usize {
    for mask in masks {
        paint_region(image, &MaskRegion::from_box(&mask.bounding_box), fill);
    }
    log::debug!("Applied {} manual mask(s)", masks.len());
    masks.len()
}

/// Copy of `image` with a hollow outline around each suspected NRIC/FIN.
pub fn draw_detection_preview(
    image: &RgbImage,
    tokens: &[OcrToken],
    outline: Rgb<u8>,
) -> RgbImage {
    let mut preview = image.clone();
    for region in detect_identifiers(tokens, false) {
        for inset in 0..PREVIEW_THICKNESS {
            let ring = MaskRegion {
                x0: region.x0 + inset,
                y0: region.y0 + inset,
                x1: region.x1 - inset,
                y1: region.y1 - inset,
            };
            if let Some(rect) = ring.clip(preview.width(), preview.height()) {
                draw_hollow_rect_mut(&mut preview, rect, outline);
            }
        }
    }
    preview
}
