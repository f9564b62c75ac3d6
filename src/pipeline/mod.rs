//! Pipeline stages for OCR-to-Markdown conversion.
//!
//! Each submodule implements exactly one step, driven in order by the
//! orchestrator in [`crate::convert`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ submit ──▶ ocr ──▶ write ──▶ decode (per image)
//! (path/URL) (locator)  (pages)  (.md)     (data URI → bytes)
//! ```
//!
//! 1. [`input`]  — validate the source; local files must exist before any
//!    network call
//! 2. [`submit`] — upload + signed URL for local files, passthrough for URLs
//! 3. [`ocr`]    — single OCR call requesting inline base64 images
//! 4. [`write`]  — Markdown file plus one file per extracted image
//! 5. [`decode`] — data-URI parsing used by the writer for each image

pub mod decode;
pub mod input;
pub mod ocr;
pub mod submit;
pub mod write;
