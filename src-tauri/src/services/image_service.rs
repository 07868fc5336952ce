use crate::error::AppError;
use base64::Engine;
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader};
use ndarray::Array3;
use std::io::Cursor;
use std::path::Path;

/// Both encodings of one image file, produced from a single read.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// Plain base64 payload, no `data:` prefix.
    pub base64: String,
    pub data_url: String,
}

async fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    tokio::fs::read(path).await.map_err(|e| {
        AppError::Read(format!("{}: {}", path.display(), e))
    })
}

/// Sniff the MIME type from content, then from the extension.
pub fn mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

pub fn is_image(bytes: &[u8]) -> bool {
    image::guess_format(bytes).is_ok()
}

fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn to_data_url(mime: &str, b64: &str) -> String {
    format!("data:{};base64,{}", mime, b64)
}

pub async fn encode_as_base64(path: &Path) -> Result<String, AppError> {
    let bytes = read_file(path).await?;
    Ok(to_base64(&bytes))
}

pub async fn encode_as_data_url(path: &Path) -> Result<String, AppError> {
    let bytes = read_file(path).await?;
    Ok(to_data_url(mime_type(path, &bytes), &to_base64(&bytes)))
}

pub async fn capture(path: &Path) -> Result<CapturedImage, AppError> {
    let bytes = read_file(path).await?;
    Ok(capture_bytes(path, &bytes))
}

pub fn capture_bytes(path: &Path, bytes: &[u8]) -> CapturedImage {
    let base64 = to_base64(bytes);
    let data_url = to_data_url(mime_type(path, bytes), &base64);
    CapturedImage { base64, data_url }
}

/// Decode, cover-scale so the shorter side reaches `target`, center crop to
/// `target`x`target` and return `[height][width][channel]` RGB in [0, 1].
///
/// Not used by the live request, which ships the raw file.
pub async fn normalize_for_model(path: &Path, target: u32) -> Result<Array3<f32>, AppError> {
    let bytes = read_file(path).await?;
    tokio::task::spawn_blocking(move || normalize_bytes(&bytes, target))
        .await
        .map_err(|e| AppError::Decode(format!("Preprocessing task failed: {}", e)))?
}

pub fn normalize_bytes(bytes: &[u8], target: u32) -> Result<Array3<f32>, AppError> {
    if target == 0 {
        return Err(AppError::Decode("Target size must be positive".to_string()));
    }

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::Decode(e.to_string()))?
        .decode()?;

    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(AppError::Decode("Image has no pixels".to_string()));
    }

    let (new_w, new_h) = cover_size(w, h, target);
    let resized = img.resize_exact(new_w, new_h, FilterType::Triangle);

    // Symmetric offsets; the longer side loses its edges.
    let crop_x = (new_w - target) / 2;
    let crop_y = (new_h - target) / 2;
    let rgb = resized.crop_imm(crop_x, crop_y, target, target).to_rgb8();

    let side = target as usize;
    let raw = rgb.into_raw();
    let data: Vec<f32> = raw.iter().map(|&v| v as f32 / 255.0).collect();

    Array3::from_shape_vec((side, side, 3), data)
        .map_err(|e| AppError::Decode(format!("Failed to create tensor: {}", e)))
}

/// `scale = max(target/w, target/h)`: the shorter side becomes exactly
/// `target`, the longer side is rounded up so it never falls short.
fn cover_size(w: u32, h: u32, target: u32) -> (u32, u32) {
    let t = u64::from(target);
    if w <= h {
        let long = (u64::from(h) * t).div_ceil(u64::from(w));
        (target, long as u32)
    } else {
        let long = (u64::from(w) * t).div_ceil(u64::from(h));
        (long as u32, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn cover_size_fills_the_square() {
        assert_eq!(cover_size(4000, 2000, 224), (448, 224));
        assert_eq!(cover_size(2000, 4000, 224), (224, 448));
        assert_eq!(cover_size(100, 100, 224), (224, 224));
        let (w, h) = cover_size(333, 777, 224);
        assert!(w >= 224 && h >= 224);
    }

    #[test]
    fn short_side_lands_exactly_on_target() {
        assert_eq!(cover_size(76, 25, 224), (681, 224));
        assert_eq!(cover_size(25, 76, 224), (224, 681));
        for h in 1..300u32 {
            let (w, short) = cover_size(3 * h + 1, h, 224);
            assert_eq!(short, 224, "{}x{}", 3 * h + 1, h);
            assert!(w >= 224);
        }
    }

    #[test]
    fn odd_aspect_image_crops_to_exact_square() {
        let img: RgbImage = ImageBuffer::from_fn(76, 25, |x, _| Rgb([(x * 3) as u8, 200, 40]));
        let tensor = normalize_bytes(&png_bytes(&img), 224).unwrap();
        assert_eq!(tensor.shape(), &[224, 224, 3]);
    }

    #[test]
    fn wide_image_normalizes_to_exact_square() {
        let img: RgbImage = ImageBuffer::from_fn(4000, 2000, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let tensor = normalize_bytes(&png_bytes(&img), 224).unwrap();

        assert_eq!(tensor.shape(), &[224, 224, 3]);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn center_crop_drops_the_long_edges() {
        // Left and right quarters red, middle green: only green survives the crop.
        let img: RgbImage = ImageBuffer::from_fn(400, 100, |x, _| {
            if (100..300).contains(&x) {
                Rgb([0, 255, 0])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let tensor = normalize_bytes(&png_bytes(&img), 50).unwrap();

        assert_eq!(tensor.shape(), &[50, 50, 3]);
        let center = tensor[[25, 25, 1]];
        assert!(center > 0.99);
        assert!(tensor[[25, 0, 0]] < 0.05);
        assert!(tensor[[25, 49, 0]] < 0.05);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = normalize_bytes(b"definitely not an image", 224).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn mime_type_prefers_content() {
        let bytes = png_bytes(&RgbImage::new(2, 2));
        assert_eq!(mime_type(Path::new("leaf.jpg"), &bytes), "image/png");
        assert_eq!(mime_type(Path::new("leaf.jpg"), b"???"), "image/jpeg");
        assert_eq!(mime_type(Path::new("notes.bin"), b"???"), "application/octet-stream");
    }

    #[tokio::test]
    async fn data_url_and_base64_share_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        let bytes = png_bytes(&RgbImage::new(8, 8));
        std::fs::write(&path, &bytes).unwrap();

        let b64 = encode_as_base64(&path).await.unwrap();
        let url = encode_as_data_url(&path).await.unwrap();
        assert!(!b64.starts_with("data:"));
        assert_eq!(url, format!("data:image/png;base64,{}", b64));

        let captured = capture(&path).await.unwrap();
        assert_eq!(captured.base64, b64);
        assert_eq!(captured.data_url, url);

        let tensor = normalize_for_model(&path, 4).await.unwrap();
        assert_eq!(tensor.shape(), &[4, 4, 3]);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        assert!(matches!(encode_as_base64(&path).await, Err(AppError::Read(_))));
        assert!(matches!(encode_as_data_url(&path).await, Err(AppError::Read(_))));
        assert!(matches!(normalize_for_model(&path, 224).await, Err(AppError::Read(_))));
    }
}
