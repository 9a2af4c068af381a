//! Controller artwork loading
//!
//! Artwork is an SVG document next to the binary (or wherever `asset_dir`
//! points). Loading reads the file on the tokio runtime, parses it with
//! `roxmltree`, checks that the root is an `<svg>` in the SVG namespace, builds
//! the `usvg` tree from that document and rasterizes it with `resvg` into
//! premultiplied RGBA ready for upload as a texture.
//!
//! Elements whose `id` is an overlay class (`button-cross`,
//! `axis-l-container`, ...) are recorded as [`AssetRegion`]s so the view can
//! highlight pressed parts and anchor the stick indicators on the artwork.
//!
//! Requests are fire-and-forget: [`AssetLoader::request`] spawns a task and the
//! result arrives later on the delivery channel, tagged with the generation it
//! was requested for. Failures are logged and delivered as `None`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use roxmltree::{Document, ParsingOptions};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

use crate::controller::overlay_classes;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Asset is not an SVG document (root element: {0})")]
    NotSvg(String),

    #[error("Malformed SVG markup: {0}")]
    Malformed(String),

    #[error("SVG has an empty canvas")]
    EmptyCanvas,
}

/// Axis-aligned box of one overlay part, in artwork pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl AssetRegion {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Rasterized artwork ready for display
#[derive(Clone, PartialEq)]
pub struct VisualAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA, row-major
    pub rgba: Vec<u8>,
    /// Overlay class -> where that part sits on the artwork
    pub regions: BTreeMap<&'static str, AssetRegion>,
}

impl VisualAsset {
    pub fn region(&self, class: &str) -> Option<&AssetRegion> {
        self.regions.get(class)
    }
}

impl std::fmt::Debug for VisualAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualAsset")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("regions", &self.regions.len())
            .finish()
    }
}

/// A finished load, tagged with the display generation that requested it
#[derive(Debug)]
pub struct AssetDelivery {
    pub generation: u64,
    pub asset: Option<VisualAsset>,
}

/// Spawns artwork loads on the tokio runtime
#[derive(Clone)]
pub struct AssetLoader {
    base_dir: PathBuf,
    runtime: Handle,
    sender: mpsc::Sender<AssetDelivery>,
}

impl AssetLoader {
    pub fn new(
        base_dir: PathBuf,
        runtime: Handle,
    ) -> (Self, mpsc::Receiver<AssetDelivery>) {
        let (sender, receiver) = mpsc::channel(16);
        debug!("Asset loader rooted at {}", base_dir.display());
        (
            Self {
                base_dir,
                runtime,
                sender,
            },
            receiver,
        )
    }

    pub fn request(&self, generation: u64, asset_ref: &str) {
        let path = self.base_dir.join(asset_ref);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let asset = load_or_log(&path).await;
            if let Err(e) = sender.send(AssetDelivery { generation, asset }).await {
                debug!("Display dropped before asset delivery: {}", e);
            }
        });
    }
}

/// Loads an asset, logging instead of propagating failures
pub async fn load_or_log(path: &Path) -> Option<VisualAsset> {
    match load_visual_asset(path).await {
        Ok(asset) => {
            info!(
                "Loaded controller artwork {} ({}x{})",
                asset.name, asset.width, asset.height
            );
            Some(asset)
        }
        Err(e) => {
            error!("Failed to load controller artwork: {}", e);
            None
        }
    }
}

pub async fn load_visual_asset(path: &Path) -> Result<VisualAsset, AssetError> {
    let data = tokio::fs::read(path).await.map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_and_rasterize(name, &data)
}

pub fn parse_and_rasterize(name: String, data: &[u8]) -> Result<VisualAsset, AssetError> {
    let text = std::str::from_utf8(data).map_err(|e| AssetError::Malformed(e.to_string()))?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document =
        Document::parse_with_options(text, options).map_err(|e| AssetError::Malformed(e.to_string()))?;

    let root = document.root_element();
    if !root.has_tag_name((SVG_NAMESPACE, "svg")) {
        let tag = root.tag_name();
        let qualified = match tag.namespace() {
            Some(ns) => format!("{{{}}}{}", ns, tag.name()),
            None => tag.name().to_string(),
        };
        return Err(AssetError::NotSvg(qualified));
    }

    let tree = Tree::from_xmltree(&document, &Options::default())
        .map_err(|e| AssetError::Malformed(e.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(AssetError::EmptyCanvas)?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Ok(VisualAsset {
        name,
        width,
        height,
        rgba: pixmap.data().to_vec(),
        regions: overlay_regions(&tree),
    })
}

/// Bounding boxes of the elements whose id names an overlay class
fn overlay_regions(tree: &Tree) -> BTreeMap<&'static str, AssetRegion> {
    let mut regions = BTreeMap::new();
    for class in overlay_classes() {
        let Some(node) = tree.node_by_id(class) else {
            continue;
        };
        let bbox = node.abs_bounding_box();
        trace!("Overlay region {} at {:?}", class, bbox);
        regions.insert(
            class,
            AssetRegion {
                x: bbox.x(),
                y: bbox.y(),
                width: bbox.width(),
                height: bbox.height(),
            },
        );
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{overlay_class, ControllerKind};
    use std::io::Write;

    const SMALL_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- controller outline -->
<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2">
  <rect id="button-cross" x="1" y="0" width="2" height="2" fill="red"/>
  <rect id="decoration" x="0" y="0" width="1" height="2" fill="red"/>
  <rect x="3" y="0" width="1" height="2" fill="red"/>
</svg>"#;

    #[test]
    fn rasterizes_to_declared_size() {
        let asset = parse_and_rasterize("pad.svg".into(), SMALL_SVG.as_bytes()).unwrap();
        assert_eq!((asset.width, asset.height), (4, 2));
        assert_eq!(asset.rgba.len(), 4 * 2 * 4);
        // opaque red fill
        assert_eq!(&asset.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn records_regions_of_overlay_ids_only() {
        let asset = parse_and_rasterize("pad.svg".into(), SMALL_SVG.as_bytes()).unwrap();
        assert_eq!(asset.regions.len(), 1);

        let cross = asset.region("button-cross").unwrap();
        assert_eq!((cross.x, cross.y, cross.width, cross.height), (1.0, 0.0, 2.0, 2.0));
        assert_eq!(cross.center(), (2.0, 1.0));
        assert!(asset.region("decoration").is_none());
    }

    #[test]
    fn doctype_with_internal_subset_is_accepted() {
        let svg = r#"<?xml version="1.0"?>
<!DOCTYPE svg [ <!ENTITY brand "padview"> <!ELEMENT svg ANY> ]>
<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2">
  <rect width="2" height="2" fill="red"/>
</svg>"#;
        let asset = parse_and_rasterize("dtd.svg".into(), svg.as_bytes()).unwrap();
        assert_eq!((asset.width, asset.height), (2, 2));
    }

    #[test]
    fn rejects_non_svg_root() {
        let err = parse_and_rasterize("page.svg".into(), b"<html><body/></html>").unwrap_err();
        assert!(matches!(err, AssetError::NotSvg(root) if root == "html"));
    }

    #[test]
    fn rejects_svg_name_in_foreign_namespace() {
        let markup = br#"<x:svg xmlns:x="urn:not-svg" width="4" height="2"/>"#;
        let err = parse_and_rasterize("fake.svg".into(), markup).unwrap_err();
        assert!(matches!(err, AssetError::NotSvg(root) if root == "{urn:not-svg}svg"));
    }

    #[test]
    fn prefixed_svg_namespace_is_accepted() {
        let markup = br#"<s:svg xmlns:s="http://www.w3.org/2000/svg" width="3" height="1"><s:rect width="3" height="1"/></s:svg>"#;
        let asset = parse_and_rasterize("prefixed.svg".into(), markup).unwrap();
        assert_eq!(asset.width, 3);
    }

    #[test]
    fn rejects_malformed_markup() {
        let err =
            parse_and_rasterize("broken.svg".into(), b"<svg width=\"4\" height=").unwrap_err();
        assert!(matches!(err, AssetError::Malformed(_)));

        let err = parse_and_rasterize("text.svg".into(), b"no markup here").unwrap_err();
        assert!(matches!(err, AssetError::Malformed(_)));
    }

    #[test]
    fn shipped_artwork_covers_its_profiles() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/svg");
        for kind in ControllerKind::ALL {
            let profile = kind.profile();
            let Some(file) = profile.visual_asset else {
                continue;
            };
            let data = std::fs::read(dir.join(file)).unwrap();
            let asset = parse_and_rasterize(file.to_string(), &data).unwrap();
            for id in profile.buttons.iter().chain(profile.axes) {
                if let Some(class) = overlay_class(id) {
                    assert!(
                        asset.region(class).is_some(),
                        "{file} has no element for {class} ({kind})"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".svg").tempfile().unwrap();
        file.write_all(SMALL_SVG.as_bytes()).unwrap();

        let asset = load_visual_asset(file.path()).await.unwrap();
        assert!(asset.name.ends_with(".svg"));
        assert_eq!(asset.width, 4);
    }

    #[tokio::test]
    async fn missing_file_is_logged_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_or_log(&dir.path().join("absent.svg")).await.is_none());
    }

    #[tokio::test]
    async fn loader_delivers_with_generation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pad.svg"), SMALL_SVG).unwrap();

        let (loader, mut receiver) =
            AssetLoader::new(dir.path().to_path_buf(), Handle::current());
        loader.request(7, "pad.svg");

        let delivery = receiver.recv().await.unwrap();
        assert_eq!(delivery.generation, 7);
        assert_eq!(delivery.asset.map(|a| a.name), Some("pad.svg".to_string()));
    }
}
