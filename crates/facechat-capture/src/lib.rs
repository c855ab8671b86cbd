//! Facechat Capture crate - still-image capture from the active video source.
//!
//! Provides the ImageSource trait both face flows capture through, the
//! StillImage value with its `data:` URI encoding, a LatestFrameSource that a
//! video pipeline publishes frames into, and a MockImageSource for testing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

use facechat_core::error::FacechatError;

/// MIME type used when the source does not say otherwise.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Errors from decoding captured images.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("not a data URI: {0}")]
    InvalidDataUri(String),
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl From<CaptureError> for FacechatError {
    fn from(err: CaptureError) -> Self {
        FacechatError::Capture(err.to_string())
    }
}

/// A point-in-time snapshot from the video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub captured_at: DateTime<Utc>,
}

impl StillImage {
    /// Wrap raw encoded image bytes captured now.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            captured_at: Utc::now(),
        }
    }

    /// Encode as `data:<mime>;base64,<payload>` for the face backend.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Decode a `data:<mime>;base64,<payload>` string as produced by a
    /// browser screenshot.
    pub fn from_data_uri(uri: &str) -> Result<Self, CaptureError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| CaptureError::InvalidDataUri(truncate(uri)))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptureError::InvalidDataUri(truncate(uri)))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| CaptureError::InvalidDataUri(truncate(uri)))?;
        let mime_type = if mime_type.is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            mime_type
        };
        let bytes = STANDARD.decode(payload)?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}

/// Source of still images.
///
/// Returns `None` while the source is not ready. Each call is an
/// independent snapshot; implementations must not hand back a frame cached
/// from before the call when a newer one exists.
pub trait ImageSource: Send + Sync {
    fn capture_image(&self) -> Option<StillImage>;
}

impl<T: ImageSource + ?Sized> ImageSource for Arc<T> {
    fn capture_image(&self) -> Option<StillImage> {
        (**self).capture_image()
    }
}

/// Image source fed by an external video pipeline.
///
/// The pipeline calls [`publish`](Self::publish) for every decoded frame;
/// captures return the most recent one. Before the first frame, or after
/// [`reset`](Self::reset), the source is not ready.
#[derive(Debug, Default, Clone)]
pub struct LatestFrameSource {
    latest: Arc<Mutex<Option<StillImage>>>,
}

impl LatestFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame.
    pub fn publish(&self, frame: StillImage) {
        match self.latest.lock() {
            Ok(mut slot) => *slot = Some(frame),
            Err(e) => tracing::warn!(error = %e, "Frame slot poisoned, dropping frame"),
        }
    }

    /// Mark the source as not ready (e.g. the camera was released).
    pub fn reset(&self) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = None;
        }
    }
}

impl ImageSource for LatestFrameSource {
    fn capture_image(&self) -> Option<StillImage> {
        let slot = self.latest.lock().ok()?;
        let frame = slot.as_ref()?;
        if frame.is_empty() {
            tracing::debug!("Latest frame is empty, treating source as not ready");
            return None;
        }
        Some(StillImage {
            captured_at: Utc::now(),
            ..frame.clone()
        })
    }
}

/// Mock image source for testing.
///
/// Returns a fixed JPEG-like payload while ready and counts every capture
/// attempt.
#[derive(Debug)]
pub struct MockImageSource {
    ready: AtomicBool,
    bytes: Vec<u8>,
    captures: AtomicU64,
}

impl MockImageSource {
    /// A ready source returning a small dummy payload.
    pub fn new() -> Self {
        Self::with_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }

    /// A ready source returning `bytes`.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            ready: AtomicBool::new(true),
            bytes,
            captures: AtomicU64::new(0),
        }
    }

    /// A source whose camera never becomes ready.
    pub fn not_ready() -> Self {
        let source = Self::new();
        source.set_ready(false);
        source
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Number of capture attempts, ready or not.
    pub fn captures(&self) -> u64 {
        self.captures.load(Ordering::SeqCst)
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for MockImageSource {
    fn capture_image(&self) -> Option<StillImage> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if !self.ready.load(Ordering::SeqCst) {
            return None;
        }
        Some(StillImage::new(self.bytes.clone(), DEFAULT_MIME_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_encoding() {
        let image = StillImage::new(b"abc".to_vec(), "image/png");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_data_uri_decoding() {
        let image = StillImage::from_data_uri("data:image/jpeg;base64,YWJj").unwrap();
        assert_eq!(image.bytes, b"abc");
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_data_uri_without_mime_defaults_to_jpeg() {
        let image = StillImage::from_data_uri("data:;base64,YWJj").unwrap();
        assert_eq!(image.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_data_uri_rejects_plain_text() {
        let err = StillImage::from_data_uri("hello").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidDataUri(_)));
    }

    #[test]
    fn test_data_uri_rejects_non_base64_encoding() {
        let err = StillImage::from_data_uri("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidDataUri(_)));
    }

    #[test]
    fn test_data_uri_rejects_bad_payload() {
        let err = StillImage::from_data_uri("data:image/jpeg;base64,***").unwrap_err();
        assert!(matches!(err, CaptureError::Decode(_)));
        let facechat: FacechatError = err.into();
        assert!(matches!(facechat, FacechatError::Capture(_)));
    }

    #[test]
    fn test_latest_frame_source_not_ready_before_publish() {
        let source = LatestFrameSource::new();
        assert!(source.capture_image().is_none());
    }

    #[test]
    fn test_latest_frame_source_returns_newest_frame() {
        let source = LatestFrameSource::new();
        source.publish(StillImage::new(vec![1], DEFAULT_MIME_TYPE));
        source.publish(StillImage::new(vec![2], DEFAULT_MIME_TYPE));
        assert_eq!(source.capture_image().unwrap().bytes, vec![2]);
    }

    #[test]
    fn test_latest_frame_source_reset() {
        let source = LatestFrameSource::new();
        source.publish(StillImage::new(vec![1], DEFAULT_MIME_TYPE));
        source.reset();
        assert!(source.capture_image().is_none());
    }

    #[test]
    fn test_latest_frame_source_empty_frame_is_not_ready() {
        let source = LatestFrameSource::new();
        source.publish(StillImage::new(Vec::new(), DEFAULT_MIME_TYPE));
        assert!(source.capture_image().is_none());
    }

    #[test]
    fn test_latest_frame_source_clone_is_shared() {
        let pipeline = LatestFrameSource::new();
        let camera = pipeline.clone();
        pipeline.publish(StillImage::new(vec![7], DEFAULT_MIME_TYPE));
        assert_eq!(camera.capture_image().unwrap().bytes, vec![7]);
    }

    #[test]
    fn test_mock_source_counts_captures() {
        let source = MockImageSource::new();
        assert!(source.capture_image().is_some());
        assert!(source.capture_image().is_some());
        assert_eq!(source.captures(), 2);
    }

    #[test]
    fn test_mock_source_not_ready() {
        let source = MockImageSource::not_ready();
        assert!(source.capture_image().is_none());
        assert_eq!(source.captures(), 1);

        source.set_ready(true);
        assert!(source.capture_image().is_some());
    }

    #[test]
    fn test_arc_source_delegates() {
        let source = Arc::new(MockImageSource::new());
        let shared: Arc<dyn ImageSource> = source.clone();
        assert!(shared.capture_image().is_some());
        assert_eq!(source.captures(), 1);
    }
}
