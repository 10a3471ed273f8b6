//! Wire format of the catalog's `volumes` endpoint.

use serde::Deserialize;

use crate::book::BookRecord;

#[derive(Debug, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Volume {
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: ImageLinks,
    pub info_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl From<Volume> for BookRecord {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;

        BookRecord::new(
            info.title,
            info.authors,
            info.description,
            info.image_links.thumbnail,
            info.info_link,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{UNKNOWN_AUTHOR, UNKNOWN_TITLE};

    #[test]
    fn missing_items_is_an_empty_result() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();

        assert!(response.items.is_empty());
    }

    #[test]
    fn volume_without_info_gets_fallbacks() {
        let response: VolumesResponse = serde_json::from_str(r#"{"items":[{"id":"x"}]}"#).unwrap();
        let book = BookRecord::from(response.items.into_iter().next().unwrap());

        assert_eq!(book.title(), UNKNOWN_TITLE);
        assert_eq!(book.authors(), [UNKNOWN_AUTHOR.to_string()]);
    }

    #[test]
    fn full_volume_is_mapped() {
        let json = r#"{
            "items": [{
                "volumeInfo": {
                    "title": "Fluent Python",
                    "authors": ["Luciano Ramalho"],
                    "description": "Clear, concise, and effective programming",
                    "imageLinks": { "thumbnail": "http://img.example/fp.jpg" },
                    "infoLink": "http://books.example/fp"
                }
            }]
        }"#;
        let response: VolumesResponse = serde_json::from_str(json).unwrap();
        let book = BookRecord::from(response.items.into_iter().next().unwrap());

        assert_eq!(book.title(), "Fluent Python");
        assert_eq!(book.authors(), ["Luciano Ramalho".to_string()]);
        assert_eq!(
            book.description(),
            Some("Clear, concise, and effective programming")
        );
        assert_eq!(book.thumbnail_url(), Some("http://img.example/fp.jpg"));
        assert_eq!(book.info_url(), "http://books.example/fp");
    }
}
