use super::{ole_link, push_utf16, LinkBuilder};
use crate::destinations::custom::CATEGORY_FOOTER;

/// Encodes a custom destinations file
#[derive(Debug, Clone)]
pub struct CustomDestinationsBuilder {
    version: i32,
    category_count: Option<i32>,
    categories: Vec<Vec<u8>>,
}

impl Default for CustomDestinationsBuilder {
    fn default() -> Self {
        CustomDestinationsBuilder {
            version: 2,
            category_count: None,
            categories: Vec::new(),
        }
    }
}

fn push_links(data: &mut Vec<u8>, links: Vec<LinkBuilder>) {
    data.extend_from_slice(&(links.len() as i32).to_le_bytes());
    for link in links {
        data.extend_from_slice(&ole_link(link));
    }
}

impl CustomDestinationsBuilder {
    pub fn new() -> Self {
        CustomDestinationsBuilder::default()
    }

    /// Overrides the declared number of categories
    pub fn with_category_count(mut self, count: i32) -> Self {
        self.category_count = Some(count);
        self
    }

    /// Type 0 category; an empty title is written with length 0
    pub fn with_custom_category(mut self, title: &str, links: Vec<LinkBuilder>) -> Self {
        let mut data = 0_i32.to_le_bytes().to_vec();
        data.extend_from_slice(&(title.encode_utf16().count() as i16).to_le_bytes());
        push_utf16(&mut data, title);
        push_links(&mut data, links);
        self.categories.push(data);
        self
    }

    /// Type 1 category
    pub fn with_known_category(mut self, known_category: i32) -> Self {
        let mut data = 1_i32.to_le_bytes().to_vec();
        data.extend_from_slice(&known_category.to_le_bytes());
        self.categories.push(data);
        self
    }

    /// Type 2 category
    pub fn with_tasks(mut self, links: Vec<LinkBuilder>) -> Self {
        let mut data = 2_i32.to_le_bytes().to_vec();
        push_links(&mut data, links);
        self.categories.push(data);
        self
    }

    /// A category of any type with a raw payload
    pub fn with_raw_category(mut self, category_type: i32, payload: &[u8]) -> Self {
        let mut data = category_type.to_le_bytes().to_vec();
        data.extend_from_slice(payload);
        self.categories.push(data);
        self
    }

    /// Header followed by every category and its footer
    pub fn build(&self) -> Vec<u8> {
        let count = self
            .category_count
            .unwrap_or(self.categories.len() as i32);

        let mut data = Vec::new();
        data.extend_from_slice(&self.version.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&0_i32.to_le_bytes());
        for category in &self.categories {
            data.extend_from_slice(category);
            data.extend_from_slice(&CATEGORY_FOOTER.to_le_bytes());
        }
        data
    }
}
