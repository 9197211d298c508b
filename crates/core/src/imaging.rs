//! Pixel-buffer attachment for reconstructed trees.
//!
//! The structural format never embeds pixel data; a parsed comic gets
//! its images back by slicing separately obtained page images with the
//! stored bounding boxes. The walk is pure and order-independent:
//! left to right across pairs, left page before right page.

use image::RgbImage;
use image::imageops;

use crate::error::{ComicError, Result};
use crate::geometry::BoundingBox;
use crate::model::Comic;

/// Slices the sub-image covered by a bounding box. The region is
/// clamped to the image bounds.
pub fn crop_region(image: &RgbImage, bbox: &BoundingBox) -> RgbImage {
    let x = bbox.x.max(0.0) as u32;
    let y = bbox.y.max(0.0) as u32;
    let width = bbox.width.max(0.0) as u32;
    let height = bbox.height.max(0.0) as u32;
    imageops::crop_imm(image, x, y, width, height).to_image()
}

/// Attaches one image per physical page, in reading order, cropping
/// panel, entity and speech-bubble regions out of their page.
///
/// Fewer images than pages is a fatal error; extra images are ignored.
pub fn attach_images(comic: &mut Comic, images: &[RgbImage]) -> Result<()> {
    let pages = comic.page_count();
    if images.len() < pages {
        return Err(ComicError::ImageCountMismatch {
            pages,
            images: images.len(),
        });
    }

    for (page, image) in comic.pages_mut().zip(images) {
        page.width = Some(f64::from(image.width()));
        page.height = Some(f64::from(image.height()));

        for panel in &mut page.panels {
            panel.image = Some(crop_region(image, &panel.bounding_box));
            for entity in &mut panel.entities {
                entity.image = Some(crop_region(image, &entity.bounding_box));
            }
            for bubble in &mut panel.speech_bubbles {
                bubble.image = Some(crop_region(image, &bubble.bounding_box));
            }
        }

        page.image = Some(image.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{AssemblyParams, assemble_panels, pair_pages};
    use crate::model::{Page, PageType};

    fn blank(w: u32, h: u32) -> RgbImage {
        RgbImage::new(w, h)
    }

    #[test]
    fn test_crop_region_clamps_to_bounds() {
        let image = blank(100, 80);
        let crop = crop_region(&image, &BoundingBox::new(90.0, 70.0, 50.0, 50.0));
        assert_eq!((crop.width(), crop.height()), (10, 10));
    }

    #[test]
    fn test_attach_images_requires_one_image_per_page() {
        let mut comic = Comic::new("short");
        comic.page_pairs = pair_pages(vec![
            Page::new(1, PageType::Single),
            Page::new(2, PageType::Single),
        ]);

        let err = attach_images(&mut comic, &[blank(10, 10)]).unwrap_err();
        assert!(matches!(
            err,
            ComicError::ImageCountMismatch { pages: 2, images: 1 }
        ));
    }

    #[test]
    fn test_attach_images_crops_panels() {
        let mut page = Page::new(1, PageType::Single);
        assemble_panels(
            &[(0.0, 0.0, 40.0, 30.0)],
            &mut page,
            &AssemblyParams::default(),
        )
        .unwrap();

        let mut comic = Comic::new("one");
        comic.page_pairs = pair_pages(vec![page]);
        attach_images(&mut comic, &[blank(100, 100)]).unwrap();

        let page = comic.page(1).unwrap();
        assert_eq!(page.width, Some(100.0));
        let panel_image = page.panels[0].image.as_ref().unwrap();
        assert_eq!((panel_image.width(), panel_image.height()), (40, 30));
    }
}
