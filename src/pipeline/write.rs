//! Page writing: OCR result → one Markdown file plus sibling image files.
//!
//! Pages are written verbatim, in order, separated by a single blank line
//! (`"\n\n"` between consecutive pages, nothing after the last). After each
//! page's text its images are decoded and saved as `<dir>/<image id>` with no
//! extension added, overwriting any existing file.
//!
//! Any error on the Markdown file itself is fatal
//! ([`Ocr2MdError::OutputWriteFailed`]), while per-image decode/write errors
//! are collected and the run continues. No atomic-write
//! guarantee is made; a fatal error can leave a partial Markdown file.

use super::decode::decode_image;
use crate::document::{OcrDocument, OcrImage};
use crate::error::{ImageError, Ocr2MdError};
use crate::output::ConversionStats;
use crate::progress::ProgressCallback;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info};

/// Separator written between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Write `document` to `output_path` and its images beside it.
///
/// Returns stats with `duration_ms`, `model` and `pages_processed` left for
/// the caller to fill in.
pub async fn write_document(
    document: &OcrDocument,
    output_path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<ConversionStats, Ocr2MdError> {
    let output_failed = |source: std::io::Error| Ocr2MdError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source,
    };

    let output_dir = output_directory(output_path);
    fs::create_dir_all(&output_dir).await.map_err(output_failed)?;

    info!("Writing OCR result to '{}'", output_path.display());
    let file = File::create(output_path).await.map_err(output_failed)?;
    let mut writer = BufWriter::new(file);

    let total = document.pages.len();
    if let Some(cb) = progress {
        cb.on_conversion_start(total);
    }

    let mut stats = ConversionStats {
        total_pages: total,
        ..Default::default()
    };

    for (i, page) in document.pages.iter().enumerate() {
        let page_num = i + 1;
        debug!("Writing page {}/{} ({} bytes)", page_num, total, page.markdown.len());

        writer
            .write_all(page.markdown.as_bytes())
            .await
            .map_err(output_failed)?;
        stats.markdown_bytes += page.markdown.len();

        if i + 1 < total {
            writer
                .write_all(PAGE_SEPARATOR.as_bytes())
                .await
                .map_err(output_failed)?;
            stats.markdown_bytes += PAGE_SEPARATOR.len();
        }

        if page.images.is_empty() {
            debug!("Page {} has no images", page_num);
        }
        for image in &page.images {
            match save_image(image, &output_dir).await {
                Ok(true) => stats.images_written += 1,
                Ok(false) => stats.images_skipped += 1,
                Err(e) => {
                    error!("Page {}: {}", page_num, e);
                    if let Some(cb) = progress {
                        cb.on_image_error(page_num, &e);
                    }
                    stats.image_errors.push(e);
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_page_complete(page_num, total, page.markdown.len(), page.images.len());
        }
    }

    writer.flush().await.map_err(output_failed)?;

    if let Some(cb) = progress {
        cb.on_conversion_complete(total, stats.images_written);
    }

    info!(
        "Wrote '{}': {} pages, {} images saved, {} image errors",
        output_path.display(),
        total,
        stats.images_written,
        stats.image_errors.len()
    );
    Ok(stats)
}

/// Directory the Markdown file (and every image) lands in.
pub fn output_directory(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Path for an image id inside `dir`, refusing ids that would escape it.
pub fn image_path(dir: &Path, id: &str) -> Option<PathBuf> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == id => Some(dir.join(name)),
        _ => None,
    }
}

/// Decode and save one image. `Ok(false)` means there was nothing to write.
async fn save_image(image: &OcrImage, dir: &Path) -> Result<bool, ImageError> {
    let Some(bytes) = decode_image(image)? else {
        return Ok(false);
    };

    let path = image_path(dir, &image.id).ok_or_else(|| ImageError::Write {
        id: image.id.clone(),
        path: dir.join(&image.id),
        detail: "image id is not a plain file name".to_string(),
    })?;

    debug!("Writing image {} ({} bytes)", path.display(), bytes.len());
    fs::write(&path, &bytes)
        .await
        .map_err(|e| ImageError::Write {
            id: image.id.clone(),
            path: path.clone(),
            detail: e.to_string(),
        })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::OcrPage;

    const TEN_BYTES: &str = "data:image/jpeg;base64,MDEyMzQ1Njc4OQ==";

    #[test]
    fn output_directory_defaults_to_cwd() {
        assert_eq!(output_directory(Path::new("out.md")), PathBuf::from("."));
        assert_eq!(
            output_directory(Path::new("out/report.md")),
            PathBuf::from("out")
        );
    }

    #[test]
    fn image_path_rejects_escapes() {
        let dir = Path::new("out");
        assert_eq!(image_path(dir, "img-0.jpeg"), Some(PathBuf::from("out/img-0.jpeg")));
        assert_eq!(image_path(dir, ""), None);
        assert_eq!(image_path(dir, ".."), None);
        assert_eq!(image_path(dir, "../evil"), None);
        assert_eq!(image_path(dir, "a/b"), None);
        assert_eq!(image_path(dir, "/etc/passwd"), None);
    }

    #[tokio::test]
    async fn pages_joined_by_single_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/doc.md");
        let doc = OcrDocument::new(vec![
            OcrPage::new(0, "# One"),
            OcrPage::new(1, "Two"),
            OcrPage::new(2, "Three"),
        ]);

        let stats = write_document(&doc, &out, None).await.unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "# One\n\nTwo\n\nThree");
        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.markdown_bytes, text.len());
    }

    #[tokio::test]
    async fn empty_document_gives_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.md");
        let stats = write_document(&OcrDocument::default(), &out, None)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), Vec::<u8>::new());
        assert_eq!(stats.total_pages, 0);
    }

    #[tokio::test]
    async fn images_saved_without_extension_and_errors_collected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc.md");
        std::fs::write(dir.path().join("img-1"), b"stale").unwrap();

        let doc = OcrDocument::new(vec![
            OcrPage::new(0, "a")
                .with_image(OcrImage::new("img-bad", Some("not a uri".into())))
                .with_image(OcrImage::new("img-1", Some(TEN_BYTES.into()))),
            OcrPage::new(1, "b").with_image(OcrImage::new("img-empty", None)),
        ]);

        let stats = write_document(&doc, &out, None).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("img-1")).unwrap(), b"0123456789");
        assert!(!dir.path().join("img-bad").exists());
        assert!(!dir.path().join("img-empty").exists());
        assert_eq!(stats.images_written, 1);
        assert_eq!(stats.images_skipped, 1);
        assert_eq!(stats.image_errors.len(), 1);
        assert_eq!(stats.image_errors[0].image_id(), "img-bad");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a\n\nb");
    }

    #[tokio::test]
    async fn unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // The output path is an existing directory: it cannot be opened as a file.
        let err = write_document(&OcrDocument::default(), dir.path(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Ocr2MdError::OutputWriteFailed { .. }));
    }
}
