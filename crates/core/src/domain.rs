use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A trip color, shared by every marker of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS-style color string, e.g. `rgb(10, 20, 30)`.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Unknown,
}

impl MediaKind {
    /// Classify a media file by its extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
            _ => return MediaKind::Unknown,
        };
        match ext.as_str() {
            "mp4" | "mov" => MediaKind::Video,
            "mp3" => MediaKind::Audio,
            _ => MediaKind::Image,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    pub name: String,
    pub kind: MediaKind,
}

/// Media files of one leaf directory, ordered by file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaGroup {
    pub files: Vec<MediaFile>,
}

impl MediaGroup {
    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let files = names
            .into_iter()
            .map(|name| MediaFile {
                kind: MediaKind::from_file_name(&name),
                name,
            })
            .collect();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn count(&self, kind: MediaKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }
}

/// Map-marker styling inherited from the owning trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub rgb_css: String,
    pub point_size: f64,
}

/// Parsed `trip_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDescriptor {
    pub region: String,
    pub country: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub members: BTreeSet<String>,
    pub rgb: Rgb,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Parsed `location_data.json`, for both locations and sub-locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDescriptor {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: Option<f64>,
    pub date: Option<NaiveDate>,
    pub sub_locations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    /// Directory name under the archive root.
    pub id: String,
    pub descriptor: TripDescriptor,
    pub label_text: String,
    pub days_spent: i64,
    pub time_spent_scale: f64,
    pub rgb_css: String,
    pub locations: Vec<Location>,
}

impl Trip {
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn media_count(&self) -> usize {
        self.locations.iter().map(Location::media_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: Option<f64>,
    pub date: Option<NaiveDate>,
    pub style: MarkerStyle,
    pub kind: LocationKind,
}

impl Location {
    pub fn sub_location(&self, id: &str) -> Option<&SubLocation> {
        match &self.kind {
            LocationKind::Leaf(_) => None,
            LocationKind::Group { sub_locations, .. } => sub_locations.iter().find(|s| s.id == id),
        }
    }

    pub fn media_count(&self) -> usize {
        match &self.kind {
            LocationKind::Leaf(media) => media.len(),
            LocationKind::Group { sub_locations, .. } => {
                sub_locations.iter().map(|s| s.media.len()).sum()
            }
        }
    }
}

/// A location holds media directly or is split into sub-locations, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationKind {
    Leaf(MediaGroup),
    Group {
        default_zoom: f64,
        sub_locations: Vec<SubLocation>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubLocation {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: Option<NaiveDate>,
    pub style: MarkerStyle,
    pub media: MediaGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_css() {
        assert_eq!(Rgb(10, 20, 30).css(), "rgb(10, 20, 30)");
        assert_eq!(Rgb(0, 0, 255).css(), "rgb(0, 0, 255)");
    }

    #[test]
    fn test_media_kind_video_case_insensitive() {
        assert_eq!(MediaKind::from_file_name("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("clip.MOV"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("clip.Mp4"), MediaKind::Video);
    }

    #[test]
    fn test_media_kind_audio() {
        assert_eq!(MediaKind::from_file_name("song.mp3"), MediaKind::Audio);
        assert_eq!(MediaKind::from_file_name("song.MP3"), MediaKind::Audio);
    }

    #[test]
    fn test_media_kind_everything_else_is_image() {
        assert_eq!(MediaKind::from_file_name("a.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("a.HEIC"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("notes.txt"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("archive.tar.mp3"), MediaKind::Audio);
    }

    #[test]
    fn test_media_kind_without_extension_is_unknown() {
        assert_eq!(MediaKind::from_file_name("README"), MediaKind::Unknown);
        assert_eq!(MediaKind::from_file_name("trailing."), MediaKind::Unknown);
    }

    #[test]
    fn test_media_group_counts() {
        let group = MediaGroup::from_names(
            ["a.jpg", "b.mp4", "c.mp3", "d.png"].map(String::from),
        );
        assert_eq!(group.len(), 4);
        assert_eq!(group.count(MediaKind::Image), 2);
        assert_eq!(group.count(MediaKind::Video), 1);
        assert_eq!(group.count(MediaKind::Audio), 1);
        assert_eq!(group.files[0].name, "a.jpg");
    }
}
