//! Media-presence suffix appended to outbound text. Only presence flags matter.

use telegram_bot::MediaFlags;

pub const SUFFIX_IMAGE: &str = " (image attached)";
pub const SUFFIX_VIDEO: &str = " (video attached)";
pub const SUFFIX_IMAGE_AND_VIDEO: &str = " (image and video attached)";

/// Suffix for the attached media kinds; animation counts as video. Empty when nothing is attached.
pub fn media_suffix(media: &MediaFlags) -> &'static str {
    let video = media.video || media.animation;
    match (media.photo, video) {
        (true, true) => SUFFIX_IMAGE_AND_VIDEO,
        (false, true) => SUFFIX_VIDEO,
        (true, false) => SUFFIX_IMAGE,
        (false, false) => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(photo: bool, video: bool, animation: bool) -> MediaFlags {
        MediaFlags {
            photo,
            video,
            animation,
        }
    }

    #[test]
    fn test_media_suffix_cases() {
        assert_eq!(media_suffix(&flags(false, false, false)), "");
        assert_eq!(media_suffix(&flags(true, false, false)), " (image attached)");
        assert_eq!(media_suffix(&flags(false, true, false)), " (video attached)");
        assert_eq!(media_suffix(&flags(false, false, true)), " (video attached)");
        assert_eq!(
            media_suffix(&flags(true, false, true)),
            " (image and video attached)"
        );
    }
}
