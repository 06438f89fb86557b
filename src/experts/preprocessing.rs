// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scan preprocessing for the classifier backbones

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use super::architecture::Architecture;

/// Mean values for normalization (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Preprocess a decoded scan into the backbone's input tensor
///
/// Steps:
/// 1. Stretch-resize to the backbone's square input edge (no padding, the
///    training transform distorts aspect ratio the same way)
/// 2. For grayscale backbones, collapse to luma and replicate to 3 channels
/// 3. Normalize with ImageNet mean/std: (pixel/255 - mean) / std
/// 4. Emit NCHW tensor [1, 3, H, W]
pub fn preprocess_scan(image: &DynamicImage, architecture: Architecture) -> Array4<f32> {
    let edge = architecture.input_resolution();

    // Bilinear, matching the training-time transform
    let resized = image.resize_exact(edge, edge, FilterType::Triangle);

    let rgb = if architecture.grayscale_input() {
        resized.grayscale().to_rgb8()
    } else {
        resized.to_rgb8()
    };

    let edge = edge as usize;
    let mut tensor = Array4::zeros((1, 3, edge, edge));

    for y in 0..edge {
        for x in 0..edge {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            }
        }
    }

    tensor
}
