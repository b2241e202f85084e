//! Software rasteriser and PNG export.
//!
//! Produces the same picture the canvas shows: background fill, then every
//! visible stroke in order. Lines get round caps and joins; arrows get a
//! filled head from [`crate::stroke::arrow_head`].

use egui::{Color32, Pos2, pos2};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::ExportError;
use crate::stroke::{StrokeKind, StrokeRef};

/// Default file name offered when saving the drawing
pub const DEFAULT_EXPORT_NAME: &str = "drawing.png";

/// Renders strokes onto a fresh `size[0]` x `size[1]` image
pub fn rasterize(
    strokes: &[StrokeRef],
    size: [u32; 2],
    background: Color32,
) -> Result<RgbaImage, ExportError> {
    let [width, height] = size;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCanvas { width, height });
    }

    let mut image = RgbaImage::from_pixel(width, height, to_rgba(background));
    for stroke in strokes {
        let color = to_rgba(stroke.color());
        let radius = (stroke.width() / 2.0).max(0.5);
        let points = stroke.points();

        match points {
            [single] => fill_capsule(&mut image, *single, *single, radius, color),
            _ => {
                for segment in points.windows(2) {
                    fill_capsule(&mut image, segment[0], segment[1], radius, color);
                }
            }
        }

        if stroke.kind() == StrokeKind::Arrow {
            if let Some(head) = stroke.arrow_head() {
                fill_triangle(&mut image, head, color);
            }
        }
    }
    Ok(image)
}

/// Encodes the strokes as PNG bytes
pub fn export_png(
    strokes: &[StrokeRef],
    size: [u32; 2],
    background: Color32,
) -> Result<Vec<u8>, ExportError> {
    let image = rasterize(strokes, size, background)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    log::debug!("Encoded {}x{} PNG ({} bytes)", size[0], size[1], bytes.len());
    Ok(bytes)
}

/// Writes the strokes to `path` as PNG
pub fn save_png(
    path: &Path,
    strokes: &[StrokeRef],
    size: [u32; 2],
    background: Color32,
) -> Result<(), ExportError> {
    let bytes = export_png(strokes, size, background)?;
    std::fs::write(path, bytes)?;
    log::info!("Saved drawing to {}", path.display());
    Ok(())
}

/// Offers PNG bytes to the browser as a download named `file_name`
#[cfg(target_arch = "wasm32")]
pub fn download_png(file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
    use eframe::wasm_bindgen::{JsCast as _, JsValue};

    let js_err = |err: JsValue| ExportError::Download(format!("{err:?}"));
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ExportError::Download("no document".to_owned()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob =
        web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| ExportError::Download("created element is not an anchor".to_owned()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
    log::info!("Offered {file_name} for download ({} bytes)", bytes.len());
    Ok(())
}

fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Pixel-center bounding box of `[min, max]`, clipped to the image
fn pixel_range(image: &RgbaImage, min: Pos2, max: Pos2) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (image.width() as f32, image.height() as f32);
    if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
        return None;
    }
    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = max.x.ceil().min(w - 1.0) as u32;
    let y1 = max.y.ceil().min(h - 1.0) as u32;
    Some((x0, y0, x1, y1))
}

fn fill_capsule(image: &mut RgbaImage, a: Pos2, b: Pos2, radius: f32, color: Rgba<u8>) {
    let min = pos2(a.x.min(b.x) - radius, a.y.min(b.y) - radius);
    let max = pos2(a.x.max(b.x) + radius, a.y.max(b.y) + radius);
    let Some((x0, y0, x1, y1)) = pixel_range(image, min, max) else {
        return;
    };

    let ab = b - a;
    let len_sq = ab.length_sq();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = pos2(x as f32 + 0.5, y as f32 + 0.5);
            let t = if len_sq > 0.0 {
                ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            if p.distance_sq(a + ab * t) <= radius * radius {
                image.put_pixel(x, y, color);
            }
        }
    }
}

fn fill_triangle(image: &mut RgbaImage, [a, b, c]: [Pos2; 3], color: Rgba<u8>) {
    let min = pos2(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
    let max = pos2(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));
    let Some((x0, y0, x1, y1)) = pixel_range(image, min, max) else {
        return;
    };

    let edge = |p: Pos2, q: Pos2, r: Pos2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = pos2(x as f32 + 0.5, y as f32 + 0.5);
            let (d0, d1, d2) = (edge(a, b, p), edge(b, c, p), edge(c, a, p));
            let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
            let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
            if !(has_neg && has_pos) {
                image.put_pixel(x, y, color);
            }
        }
    }
}
