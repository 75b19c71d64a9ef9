// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use quarry_core::{AssetError, AssetResult};
use std::path::Path;

const HEADER_LEN: usize = 12;

/// A raw pixel buffer with its dimensions.
///
/// The bytes are uninterpreted. By convention 3 channels means RGB and 4 means
/// RGBA, but the cache never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    width: u32,
    height: u32,
    channels: u32,
    pixels: Vec<u8>,
}

impl Artifact {
    /// Wraps `pixels`, returning `None` if its length is not
    /// `width * height * channels` or a dimension does not fit the on-disk header.
    pub fn new(width: u32, height: u32, channels: u32, pixels: Vec<u8>) -> Option<Self> {
        let fits = |v: u32| i32::try_from(v).is_ok();
        if !(fits(width) && fits(height) && fits(channels)) {
            return None;
        }
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(channels as usize)?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// The raw pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the artifact, returning its pixel bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Encodes as `width:i32, height:i32, channels:i32` (little-endian) followed
    /// by the pixel bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.pixels.len());
        for value in [self.width, self.height, self.channels] {
            // `new` guarantees every dimension fits in an i32.
            bytes.extend_from_slice(&(value as i32).to_le_bytes());
        }
        bytes.extend_from_slice(&self.pixels);
        bytes
    }

    /// Decodes the format written by [`Artifact::to_bytes`]. `path` is only used
    /// for error reporting.
    ///
    /// # Errors
    /// [`AssetError::Decode`] if the header is truncated or negative, or if the
    /// payload length does not match the header exactly.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> AssetResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(AssetError::decode(path, "truncated artifact header"));
        }
        let (header, pixels) = bytes.split_at(HEADER_LEN);
        let mut dims = [0u32; 3];
        for (dim, chunk) in dims.iter_mut().zip(header.chunks_exact(4)) {
            let value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            *dim = u32::try_from(value)
                .map_err(|_| AssetError::decode(path, "negative artifact dimension"))?;
        }
        let [width, height, channels] = dims;
        Self::new(width, height, channels, pixels.to_vec()).ok_or_else(|| {
            AssetError::decode(
                path,
                format!(
                    "expected {width}x{height}x{channels} pixel bytes, found {}",
                    pixels.len()
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_length() {
        assert!(Artifact::new(2, 2, 4, vec![0; 15]).is_none());
        assert!(Artifact::new(2, 2, 4, vec![0; 16]).is_some());
        assert!(Artifact::new(u32::MAX, 1, 1, Vec::new()).is_none());
    }

    #[test]
    fn header_is_little_endian_i32() {
        let artifact = Artifact::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let bytes = artifact.to_bytes();
        assert_eq!(&bytes[..12], &[2, 0, 0, 0, 1, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(&bytes[12..], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(Artifact::from_bytes(Path::new("a"), &bytes).unwrap(), artifact);
    }

    #[test]
    fn trailing_or_missing_bytes_fail_to_decode() {
        let mut bytes = Artifact::new(1, 1, 4, vec![9; 4]).unwrap().to_bytes();
        bytes.push(0);
        assert!(matches!(
            Artifact::from_bytes(Path::new("a"), &bytes),
            Err(AssetError::Decode { .. })
        ));
        assert!(Artifact::from_bytes(Path::new("a"), &bytes[..8]).is_err());
    }

    #[test]
    fn negative_dimensions_fail_to_decode() {
        let mut bytes = (-1i32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 8]);
        assert!(Artifact::from_bytes(Path::new("a"), &bytes).is_err());
    }
}
