// OneHand Photo Geotag Extractor
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Reads camera, capture time and GPS position out of photo metadata:
// 1. single files or whole folders (recursive)
// 2. reverse geocoding of the GPS fix
// 3. Leaflet maps of every located photo

pub mod extractor;
pub mod geocode;
pub mod map;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use exif::{Exif, In, Tag, Value};
use tracing::debug;
use walkdir::WalkDir;

/// File extensions treated as photos.
pub const SUPPORTED_FORMATS: [&str; 6] = ["jpg", "jpeg", "png", "tiff", "bmp", "heic"];

pub const UNKNOWN: &str = "Unknown";

const EXIF_DATETIME: &str = "%Y:%m:%d %H:%M:%S";
const WORDY_DATETIME: &str = "%b %d, %Y %I:%M:%S %p";
const DATE_FORMAT: &str = "%B %d, %Y";
const TIME_FORMAT: &str = "%I:%M:%S %p";

/// Decimal degrees, rounded to six places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// The metadata fields the extractor reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoFields {
    pub make: Option<String>,
    pub model: Option<String>,
    pub datetime: Option<String>,
    pub gps: Option<GpsFix>,
}

impl PhotoFields {
    pub fn from_exif(exif: &Exif) -> Self {
        let datetime = [Tag::DateTime, Tag::DateTimeOriginal]
            .into_iter()
            .find_map(|tag| ascii_field(exif, tag));

        Self {
            make: ascii_field(exif, Tag::Make),
            model: ascii_field(exif, Tag::Model),
            datetime,
            gps: gps_fix(exif),
        }
    }

    pub fn camera(&self) -> String {
        camera_label(self.make.as_deref(), self.model.as_deref())
    }

    /// `(date, time)` for display, `Unknown` when missing or unparseable.
    pub fn date_and_time(&self) -> (String, String) {
        self.datetime
            .as_deref()
            .and_then(format_datetime)
            .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()))
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_FORMATS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Every photo below `folder`, in path order.
pub fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    images.sort();
    images
}

/// Metadata of one photo. `None` when the file has no readable EXIF block.
pub fn read_fields(path: &Path) -> Option<PhotoFields> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("[EXIF] Cannot open {:?}: {}", path, e);
            return None;
        }
    };

    match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => Some(PhotoFields::from_exif(&exif)),
        Err(e) => {
            debug!("[EXIF] No metadata in {:?}: {}", path, e);
            None
        }
    }
}

/// "Make Model", either one alone, or `Unknown`.
pub fn camera_label(make: Option<&str>, model: Option<&str>) -> String {
    let make = make.map(str::trim).filter(|s| !s.is_empty());
    let model = model.map(str::trim).filter(|s| !s.is_empty());

    match (make, model) {
        (Some(make), Some(model)) => format!("{} {}", make, model),
        (None, Some(model)) => model.to_string(),
        (Some(make), None) => make.to_string(),
        (None, None) => UNKNOWN.to_string(),
    }
}

/// Accepts `2017:04:01 18:57:18`, `Dec 8, 2018 8:14:03 AM`, or a millisecond timestamp.
pub fn format_datetime(raw: &str) -> Option<(String, String)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = if raw.chars().all(|c| c.is_ascii_digit()) {
        let millis = raw.parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis)?
            .with_timezone(&Local)
            .naive_local()
    } else if raw.chars().any(char::is_alphabetic) {
        NaiveDateTime::parse_from_str(raw, WORDY_DATETIME).ok()?
    } else {
        NaiveDateTime::parse_from_str(raw, EXIF_DATETIME).ok()?
    };

    Some((
        parsed.format(DATE_FORMAT).to_string(),
        parsed.format(TIME_FORMAT).to_string(),
    ))
}

pub fn dms_to_degrees(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part).trim_matches(['\0', ' ']).to_string())
            .find(|s| !s.is_empty()),
        _ => None,
    }
}

fn coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: &str) -> Option<f64> {
    let parts: Vec<f64> = match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(parts) => parts.iter().map(|r| r.to_f64()).collect(),
        _ => return None,
    };

    let degrees = match parts.as_slice() {
        [d, m, s, ..] => dms_to_degrees(*d, *m, *s),
        [d, m] => dms_to_degrees(*d, *m, 0.0),
        [d] => *d,
        [] => return None,
    };

    let negative = ascii_field(exif, ref_tag)
        .is_some_and(|r| r.eq_ignore_ascii_case(negative_ref));
    Some(if negative { -degrees } else { degrees })
}

fn gps_fix(exif: &Exif) -> Option<GpsFix> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S")?;
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W")?;
    Some(GpsFix {
        latitude: round6(latitude),
        longitude: round6(longitude),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Cursor;

    use exif::experimental::Writer;
    use exif::{Field, In, Rational, Tag, Value};

    /// What to put in a synthetic EXIF block.
    #[derive(Default)]
    pub struct Shot<'a> {
        pub make: Option<&'a str>,
        pub model: Option<&'a str>,
        pub datetime: Option<&'a str>,
        /// `(lat_ref, [d, m, s], lon_ref, [d, m, s])`, seconds in hundredths.
        pub gps: Option<(&'a str, [u32; 3], &'a str, [u32; 3])>,
    }

    fn ascii(tag: Tag, text: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        }
    }

    fn dms(tag: Tag, [d, m, s]: [u32; 3]) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![
                Rational { num: d, denom: 1 },
                Rational { num: m, denom: 1 },
                Rational { num: s, denom: 100 },
            ]),
        }
    }

    /// Raw little-endian TIFF holding the requested fields.
    pub fn tiff(shot: &Shot) -> Vec<u8> {
        let mut fields = Vec::new();
        if let Some(make) = shot.make {
            fields.push(ascii(Tag::Make, make));
        }
        if let Some(model) = shot.model {
            fields.push(ascii(Tag::Model, model));
        }
        if let Some(datetime) = shot.datetime {
            fields.push(ascii(Tag::DateTime, datetime));
        }
        if let Some((lat_ref, lat, lon_ref, lon)) = shot.gps {
            fields.push(ascii(Tag::GPSLatitudeRef, lat_ref));
            fields.push(dms(Tag::GPSLatitude, lat));
            fields.push(ascii(Tag::GPSLongitudeRef, lon_ref));
            fields.push(dms(Tag::GPSLongitude, lon));
        }

        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, true).unwrap();
        buf.into_inner()
    }

    /// A JPEG that is nothing but an EXIF segment.
    pub fn jpeg(shot: &Shot) -> Vec<u8> {
        let tiff = tiff(shot);
        let len = (2 + 6 + tiff.len()) as u16;

        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{jpeg, tiff, Shot};
    use super::*;

    fn fields(shot: &Shot) -> PhotoFields {
        let exif = exif::Reader::new().read_raw(tiff(shot)).unwrap();
        PhotoFields::from_exif(&exif)
    }

    #[test]
    fn test_camera_label_fallbacks() {
        assert_eq!(camera_label(Some("Canon"), Some("EOS R5")), "Canon EOS R5");
        assert_eq!(camera_label(None, Some(" Pixel 8 ")), "Pixel 8");
        assert_eq!(camera_label(Some("Apple"), Some("")), "Apple");
        assert_eq!(camera_label(None, None), "Unknown");
    }

    #[test]
    fn test_datetime_formats() {
        assert_eq!(
            format_datetime("2017:04:01 18:57:18"),
            Some(("April 01, 2017".to_string(), "06:57:18 PM".to_string()))
        );
        assert_eq!(
            format_datetime("Dec 8, 2018 8:14:03 AM"),
            Some(("December 08, 2018".to_string(), "08:14:03 AM".to_string()))
        );
        assert!(format_datetime("1616347542050").is_some());
        assert_eq!(format_datetime("2017-04-01"), None);
        assert_eq!(format_datetime("  "), None);
    }

    #[test]
    fn test_dms_conversion() {
        assert!((dms_to_degrees(14.0, 35.0, 42.72) - 14.5952).abs() < 1e-9);
        assert_eq!(round6(120.984222222), 120.984222);
    }

    #[test]
    fn test_fields_from_exif() {
        let shot = Shot {
            make: Some("Apple"),
            model: Some("iPhone 12"),
            datetime: Some("2021:03:21 09:05:42"),
            gps: Some(("N", [14, 35, 4272], "E", [120, 59, 324])),
        };
        let f = fields(&shot);

        assert_eq!(f.camera(), "Apple iPhone 12");
        assert_eq!(
            f.date_and_time(),
            ("March 21, 2021".to_string(), "09:05:42 AM".to_string())
        );
        assert_eq!(
            f.gps,
            Some(GpsFix {
                latitude: 14.5952,
                longitude: 120.984233
            })
        );
    }

    #[test]
    fn test_southern_western_refs_negate() {
        let shot = Shot {
            gps: Some(("S", [33, 52, 0], "W", [70, 40, 0])),
            ..Default::default()
        };
        let gps = fields(&shot).gps.unwrap();
        assert_eq!(gps.latitude, -33.866667);
        assert_eq!(gps.longitude, -70.666667);
    }

    #[test]
    fn test_missing_fields_are_unknown() {
        let f = fields(&Shot {
            model: Some("X100V"),
            ..Default::default()
        });
        assert_eq!(f.camera(), "X100V");
        assert_eq!(f.date_and_time(), (UNKNOWN.to_string(), UNKNOWN.to_string()));
        assert_eq!(f.gps, None);
    }

    #[test]
    fn test_read_fields_from_files() {
        let tmp = tempfile::tempdir().unwrap();
        let photo = tmp.path().join("beach.JPG");
        std::fs::write(&photo, jpeg(&Shot { make: Some("Sony"), ..Default::default() })).unwrap();
        let plain = tmp.path().join("plain.png");
        std::fs::write(&plain, b"not really a png").unwrap();

        assert_eq!(read_fields(&photo).unwrap().camera(), "Sony");
        assert_eq!(read_fields(&plain), None);
        assert_eq!(read_fields(&tmp.path().join("missing.jpg")), None);
    }

    #[test]
    fn test_scan_folder_is_recursive_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("2024").join("trip");
        std::fs::create_dir_all(&nested).unwrap();
        for file in ["a.jpg", "notes.txt", "2024/b.HEIC", "2024/trip/c.tiff", "2024/trip/d.gif"] {
            std::fs::write(tmp.path().join(file), b"x").unwrap();
        }

        let found: Vec<String> = scan_folder(tmp.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(found, vec!["b.HEIC", "c.tiff", "a.jpg"]);
    }
}
