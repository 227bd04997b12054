use std::sync::Mutex;

use super::*;

struct MockRasterizer {
    result: Result<String, String>,
    calls: Mutex<Vec<(String, ThumbnailOptions)>>,
}

impl MockRasterizer {
    fn returning(result: Result<String, String>) -> Self {
        Self { result, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl Rasterizer for MockRasterizer {
    async fn rasterize(&self, surface: &SurfaceRef, options: &ThumbnailOptions) -> Result<String, RasterError> {
        self.calls.lock().unwrap().push((surface.selector.clone(), *options));
        self.result.clone().map_err(RasterError::Render)
    }
}

fn options() -> ThumbnailOptions {
    ThumbnailOptions { scale: 0.3, width: 400, height: 300 }
}

#[test]
fn default_surface_is_canvas() {
    assert_eq!(SurfaceRef::default().selector, ".mind-map-canvas");
}

#[tokio::test]
async fn capture_returns_data_url() {
    let mock = MockRasterizer::returning(Ok("data:image/png;base64,iVBOR".into()));
    let url = capture_thumbnail(Some(&mock), &SurfaceRef::default(), &options()).await;
    assert_eq!(url.as_deref(), Some("data:image/png;base64,iVBOR"));
    let calls = mock.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ".mind-map-canvas");
    assert_eq!(calls[0].1, options());
}

#[tokio::test]
async fn capture_failure_is_none() {
    let mock = MockRasterizer::returning(Err("canvas tainted".into()));
    assert!(capture_thumbnail(Some(&mock), &SurfaceRef::default(), &options()).await.is_none());
}

#[tokio::test]
async fn capture_without_rasterizer_is_none() {
    assert!(capture_thumbnail(None, &SurfaceRef::default(), &options()).await.is_none());
}
