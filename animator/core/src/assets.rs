//! Asset Loading
//!
//! Turns configured sets into registered animation sets. Every image is
//! decoded exactly once here, at registration time; frames that appear in
//! several sets share one decode.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::animation_set::AnimationSet;
use crate::config::AnimatorConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::surface::{DecodedImage, ImageService};

/// Decode every frame in `config` and build the animation sets
pub fn load_sets<I: ImageService>(
    config: &AnimatorConfig,
    images: &I,
) -> Result<Vec<AnimationSet<I::Handle>>> {
    let mut decoded: HashMap<PathBuf, DecodedImage<I::Handle>> = HashMap::new();
    let mut sets = Vec::with_capacity(config.sets.len());

    for set_config in &config.sets {
        let mut frames = Vec::with_capacity(set_config.frames.len());
        for frame_config in &set_config.frames {
            let duration = frame_config.duration()?;
            let path = config.resolve(&frame_config.path);

            let image = match decoded.get(&path) {
                Some(image) => image.clone(),
                None => {
                    let image = images.decode(&path)?;
                    debug!(
                        path = %path.display(),
                        width = image.width,
                        height = image.height,
                        "Decoded frame image"
                    );
                    decoded.insert(path, image.clone());
                    image
                }
            };

            frames.push(Frame::new(image.handle, image.width, image.height, duration));
        }
        sets.push(AnimationSet::new(set_config.name.clone(), frames)?);
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameConfig, SetConfig};
    use crate::error::AnimatorError;
    use crate::frame::FrameDuration;
    use crate::testing::FakeImages;

    fn config() -> AnimatorConfig {
        AnimatorConfig {
            asset_dir: Some(PathBuf::from("images")),
            sets: vec![
                SetConfig {
                    name: "idle".to_string(),
                    frames: vec![
                        FrameConfig::ranged("neutral.png", 500, 5000),
                        FrameConfig::fixed("blink.png", 200),
                    ],
                },
                SetConfig {
                    name: "talking".to_string(),
                    frames: vec![FrameConfig::fixed("neutral.png", 150)],
                },
            ],
            ..AnimatorConfig::default()
        }
    }

    #[test]
    fn test_loads_all_sets() {
        let images = FakeImages::new()
            .with_image("images/neutral.png", 300, 600)
            .with_image("images/blink.png", 300, 600);

        let sets = load_sets(&config(), &images).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name(), "idle");
        assert_eq!(sets[0].len(), 2);

        let neutral = sets[0].frame(0).unwrap();
        assert_eq!(neutral.image().label, "neutral");
        assert_eq!((neutral.width(), neutral.height()), (300, 600));
        assert_eq!(neutral.duration(), FrameDuration::range(500, 5000).unwrap());
        assert_eq!(sets[1].frame(0).unwrap().duration(), FrameDuration::fixed(150).unwrap());
    }

    #[test]
    fn test_missing_image_fails() {
        let images = FakeImages::new().with_image("images/neutral.png", 300, 600);
        let err = load_sets(&config(), &images).unwrap_err();
        assert!(matches!(err, AnimatorError::ImageDecode { ref path, .. } if path == &PathBuf::from("images/blink.png")));
    }

    #[test]
    fn test_invalid_duration_fails_before_decode() {
        let mut config = config();
        config.sets[0].frames[0] = FrameConfig::fixed("neutral.png", -5);
        let err = load_sets(&config, &FakeImages::new()).unwrap_err();
        assert_eq!(err, AnimatorError::InvalidDuration { min: -5, max: -5 });
    }
}
